//! Process-wide entry point: a pool plus the accessors the web layer calls.

use crate::config::DbConfig;
use crate::error::DbResult;
use crate::monitor::{LoggedClient, MonitorConfig};
use crate::pool::create_pool_with_config;
use crate::properties::{self, NewProperty, Property, SearchOptions};
use crate::reservations::{self, Reservation};
use crate::users::{self, NewUser, User};
use deadpool_postgres::Pool;

/// A cloneable handle over the shared connection pool.
///
/// Each call checks out one pooled connection, runs one statement through a
/// [`LoggedClient`] and returns the connection to the pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
    monitor: MonitorConfig,
}

impl Database {
    /// Build the pool described by `config`. Connections are opened lazily.
    pub fn connect(config: &DbConfig) -> DbResult<Self> {
        config.validate()?;
        let pool = create_pool_with_config(&config.database_url, config.max_connections)?;
        tracing::info!(
            target: "lightbnb.db",
            max_connections = config.max_connections,
            query_timeout_ms = ?config.query_timeout_ms,
            "database pool ready"
        );
        Ok(Self::from_pool(pool).with_monitor_config(config.monitor_config()))
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self {
            pool,
            monitor: MonitorConfig::default(),
        }
    }

    pub fn with_monitor_config(mut self, monitor: MonitorConfig) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Check out a pooled connection wrapped for logging.
    pub async fn client(&self) -> DbResult<LoggedClient<deadpool_postgres::Client>> {
        let client = self.pool.get().await?;
        Ok(LoggedClient::new(client).with_config(self.monitor.clone()))
    }

    pub async fn get_user_with_email(&self, email: &str) -> DbResult<Option<User>> {
        users::get_user_with_email(&self.client().await?, email).await
    }

    pub async fn get_user_with_id(&self, id: i32) -> DbResult<Option<User>> {
        users::get_user_with_id(&self.client().await?, id).await
    }

    pub async fn add_user(&self, user: &NewUser) -> DbResult<User> {
        users::add_user(&self.client().await?, user).await
    }

    pub async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> DbResult<Vec<Reservation>> {
        reservations::get_all_reservations(&self.client().await?, guest_id, limit).await
    }

    pub async fn get_all_properties(
        &self,
        options: &SearchOptions,
        limit: i64,
    ) -> DbResult<Vec<Property>> {
        properties::get_all_properties(&self.client().await?, options, limit).await
    }

    pub async fn add_property(&self, property: &NewProperty) -> DbResult<Property> {
        properties::add_property(&self.client().await?, property).await
    }
}
