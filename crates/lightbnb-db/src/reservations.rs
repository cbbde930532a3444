//! `reservations` table: a guest's bookings.

use crate::client::GenericClient;
use crate::error::DbResult;
use crate::row::{FromRow, RowExt};
use crate::sql::query;
use crate::validate;
use chrono::NaiveDate;
use serde::Serialize;
use tokio_postgres::Row;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub property_id: i32,
    pub guest_id: i32,
}

impl FromRow for Reservation {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            start_date: row.try_get_column("start_date")?,
            end_date: row.try_get_column("end_date")?,
            property_id: row.try_get_column("property_id")?,
            guest_id: row.try_get_column("guest_id")?,
        })
    }
}

/// Up to `limit` reservations made by `guest_id`.
pub async fn get_all_reservations(
    conn: &impl GenericClient,
    guest_id: i32,
    limit: i64,
) -> DbResult<Vec<Reservation>> {
    let limit = validate::check_limit(limit)?;
    query("SELECT * FROM reservations WHERE guest_id = $1 LIMIT $2")
        .tag("reservations.by_guest")
        .bind(guest_id)
        .bind(limit)
        .fetch_all_as(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_LIMIT;
    use crate::test_support::RecordingClient;

    #[tokio::test]
    async fn binds_guest_then_limit() {
        let client = RecordingClient::new();
        let rows = get_all_reservations(&client, 7, DEFAULT_LIMIT).await.unwrap();
        assert!(rows.is_empty());

        let seen = client.statements();
        assert_eq!(
            seen[0].sql,
            "SELECT * FROM reservations WHERE guest_id = $1 LIMIT $2"
        );
        assert_eq!(seen[0].params, vec!["7", "10"]);
    }

    #[tokio::test]
    async fn negative_limit_is_rejected_before_sending() {
        let client = RecordingClient::new();
        assert!(get_all_reservations(&client, 7, -5).await.is_err());
        assert!(client.statements().is_empty());
    }
}
