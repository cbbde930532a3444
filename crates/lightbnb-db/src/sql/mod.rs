//! Dynamic SQL builder.
//!
//! - `query()` is for a complete SQL string with `$1, $2...` already in place.
//! - `Sql` composes SQL dynamically without manually tracking placeholder
//!   indices; the property search is built this way.
//!
//! # Example
//!
//! ```ignore
//! use lightbnb_db::sql;
//!
//! let mut q = sql("SELECT * FROM properties");
//! if let Some(city) = city {
//!     q.push(" WHERE city LIKE ").push_bind(format!("%{city}%"));
//! }
//! q.limit(10);
//!
//! let rows: Vec<Property> = q.fetch_all_as(&conn).await?;
//! ```

#[macro_use]
mod exec_macros;

mod builder;
mod query;

#[cfg(test)]
mod tests;

pub use builder::Sql;
pub use query::Query;

/// Build a SQL query from a pre-numbered SQL string (`$1, $2, ...`).
pub fn query(initial_sql: impl Into<String>) -> Query {
    Query::new(initial_sql)
}

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

/// Strip leading whitespace, SQL comments (`--` and `/* */`), and parentheses
/// from a SQL string to find the first meaningful keyword.
pub(crate) fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") {
            if let Some(pos) = s.find('\n') {
                s = &s[pos + 1..];
                continue;
            }
            return "";
        }
        if s.starts_with("/*") {
            if let Some(pos) = s.find("*/") {
                s = &s[pos + 2..];
                continue;
            }
            return "";
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            break;
        }
    }
    s
}

pub(crate) fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}
