//! # lightbnb-db
//!
//! PostgreSQL data-access layer for the LightBnB rental app.
//!
//! - **Users**: lookup by email or id, sign-up
//! - **Reservations**: a guest's bookings
//! - **Properties**: filtered search and listing creation, built with a
//!   placeholder-safe dynamic SQL builder
//!
//! Every accessor takes any [`GenericClient`] (a pooled connection, a plain
//! `tokio-postgres` client or a transaction) and returns a [`DbResult`].
//! Lookups report a missing row as `Ok(None)`, never as an error.
//!
//! ```ignore
//! use lightbnb_db::{Database, DbConfig, SearchOptions, DEFAULT_LIMIT};
//!
//! let db = Database::connect(&DbConfig::from_env()?)?;
//!
//! let cheap_in_miami = db
//!     .get_all_properties(&SearchOptions::new().city("Miami").max_price(150), DEFAULT_LIMIT)
//!     .await?;
//! let me = db.get_user_with_email("sebastianguerra@ymail.com").await?;
//! ```

pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod monitor;
pub mod pool;
pub mod properties;
pub mod reservations;
pub mod row;
pub mod sql;
pub mod users;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::GenericClient;
pub use config::DbConfig;
pub use database::Database;
pub use error::{DbError, DbResult};
pub use monitor::{LoggedClient, MonitorConfig, QueryType};
pub use pool::{create_pool, create_pool_with_config};
pub use properties::{
    NewProperty, Property, SearchOptions, add_property, build_insert_query, build_search_query,
    get_all_properties,
};
pub use reservations::{Reservation, get_all_reservations};
pub use row::{FromRow, RowExt};
pub use sql::{Query, Sql, query, sql};
pub use users::{NewUser, User, add_user, get_user_with_email, get_user_with_id};

/// Row limit used when the caller does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;
