//! Row mapping traits and utilities

use crate::error::{DbError, DbResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct.
///
/// Columns are read by name, so `SELECT *` keeps working when the table
/// grows extra columns.
///
/// # Example
///
/// ```ignore
/// use lightbnb_db::{FromRow, RowExt};
///
/// impl FromRow for Guest {
///     fn from_row(row: &Row) -> DbResult<Self> {
///         Ok(Self { id: row.try_get_column("id")? })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> DbResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning DbError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;

    /// Like [`RowExt::try_get_column`], but `Ok(None)` when the column is not in the row at all.
    fn try_get_optional_column<T>(&self, column: &str) -> DbResult<Option<T>>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| DbError::decode(column, e.to_string()))
    }

    fn try_get_optional_column<T>(&self, column: &str) -> DbResult<Option<T>>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        if !self.columns().iter().any(|c| c.name() == column) {
            return Ok(None);
        }
        let value: Option<T> = self
            .try_get(column)
            .map_err(|e| DbError::decode(column, e.to_string()))?;
        Ok(value)
    }
}
