//! In-memory stand-in for a Postgres connection, for unit tests.

use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use std::sync::Mutex;
use std::time::Duration;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A statement seen by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub sql: String,
    pub params: Vec<String>,
}

/// Records every statement it is asked to run and returns empty results.
///
/// `query_one` answers `NotFound`, mirroring a real client with no matching row.
#[derive(Default)]
pub struct RecordingClient {
    seen: Mutex<Vec<Recorded>>,
    delay: Option<Duration>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each statement.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            delay: Some(delay),
        }
    }

    pub fn statements(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }

    async fn record(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) {
        self.seen.lock().unwrap().push(Recorded {
            sql: sql.to_string(),
            params: params.iter().map(|p| format!("{p:?}")).collect(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl GenericClient for RecordingClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        self.record(sql, params).await;
        Ok(vec![])
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Row> {
        self.record(sql, params).await;
        Err(DbError::not_found("no rows"))
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Option<Row>> {
        self.record(sql, params).await;
        Ok(None)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        self.record(sql, params).await;
        Ok(0)
    }
}
