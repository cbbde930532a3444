use super::config::MonitorConfig;
use super::truncate_sql_bytes;
use super::types::{QueryContext, QueryOutcome};
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

/// A client wrapper that logs every statement through `tracing` (target `lightbnb.sql`)
/// and applies the optional statement timeout from [`MonitorConfig`].
///
/// - before the statement: SQL, tag, query type, parameter count at `sql_log_level`
/// - after it: duration and outcome at `TRACE`, or `WARN` when above the slow threshold
/// - on failure: the error at `ERROR`
///
/// Bound values are never logged; user rows carry password hashes.
pub struct LoggedClient<C> {
    client: C,
    config: MonitorConfig,
}

impl<C: GenericClient> LoggedClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: MonitorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn log_statement(&self, ctx: &QueryContext) {
        let Some(level) = self.config.sql_log_level else {
            return;
        };
        let sql = self.truncate_sql(&ctx.sql);
        let tag = ctx.tag.as_deref().unwrap_or("-");
        emit_at_level!(
            level,
            target: "lightbnb.sql",
            query_type = ?ctx.query_type,
            tag,
            param_count = ctx.param_count,
            sql = %sql,
        );
    }

    fn log_outcome(&self, ctx: &QueryContext, duration: Duration, outcome: &QueryOutcome) {
        let tag = ctx.tag.as_deref().unwrap_or("-");
        let elapsed_ms = duration.as_secs_f64() * 1000.0;

        if let QueryOutcome::Error(message) = outcome {
            tracing::error!(
                target: "lightbnb.sql",
                query_type = ?ctx.query_type,
                tag,
                elapsed_ms,
                error = %message,
                sql = %self.truncate_sql(&ctx.sql),
                "statement failed"
            );
            return;
        }

        let slow = self
            .config
            .slow_query_threshold
            .is_some_and(|threshold| duration > threshold);
        if slow {
            tracing::warn!(
                target: "lightbnb.sql",
                query_type = ?ctx.query_type,
                tag,
                elapsed_ms,
                outcome = ?outcome,
                sql = %self.truncate_sql(&ctx.sql),
                "slow statement"
            );
        } else {
            tracing::trace!(
                target: "lightbnb.sql",
                query_type = ?ctx.query_type,
                tag,
                elapsed_ms,
                outcome = ?outcome,
                "statement finished"
            );
        }
    }

    async fn execute_with_timeout<T, F>(&self, future: F) -> DbResult<T>
    where
        F: std::future::Future<Output = DbResult<T>> + Send,
    {
        match self.config.query_timeout {
            Some(timeout) => {
                tokio::pin!(future);
                tokio::select! {
                    result = &mut future => result,
                    _ = tokio::time::sleep(timeout) => {
                        if let Some(cancel_token) = self.client.cancel_token() {
                            tokio::spawn(async move {
                                let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
                            });
                        }
                        Err(DbError::Timeout(timeout))
                    }
                }
            }
            None => future.await,
        }
    }

    async fn run<T, F>(
        &self,
        ctx: QueryContext,
        future: F,
        outcome: fn(&DbResult<T>) -> QueryOutcome,
    ) -> DbResult<T>
    where
        F: std::future::Future<Output = DbResult<T>> + Send,
    {
        self.log_statement(&ctx);

        let start = Instant::now();
        let result = self.execute_with_timeout(future).await;
        let duration = start.elapsed();

        self.log_outcome(&ctx, duration, &outcome(&result));
        result
    }

    async fn query_inner(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        tag: Option<&str>,
    ) -> DbResult<Vec<Row>> {
        let ctx = QueryContext::new(sql, params.len(), tag);
        self.run(ctx, self.client.query(sql, params), |r| match r {
            Ok(rows) => QueryOutcome::Rows(rows.len()),
            Err(e) => QueryOutcome::Error(e.to_string()),
        })
        .await
    }

    async fn query_one_inner(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        tag: Option<&str>,
    ) -> DbResult<Row> {
        let ctx = QueryContext::new(sql, params.len(), tag);
        self.run(ctx, self.client.query_one(sql, params), |r| match r {
            Ok(_) => QueryOutcome::OptionalRow(true),
            Err(DbError::NotFound(_)) => QueryOutcome::OptionalRow(false),
            Err(e) => QueryOutcome::Error(e.to_string()),
        })
        .await
    }

    async fn query_opt_inner(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        tag: Option<&str>,
    ) -> DbResult<Option<Row>> {
        let ctx = QueryContext::new(sql, params.len(), tag);
        self.run(ctx, self.client.query_opt(sql, params), |r| match r {
            Ok(row) => QueryOutcome::OptionalRow(row.is_some()),
            Err(e) => QueryOutcome::Error(e.to_string()),
        })
        .await
    }

    async fn execute_inner(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        tag: Option<&str>,
    ) -> DbResult<u64> {
        let ctx = QueryContext::new(sql, params.len(), tag);
        self.run(ctx, self.client.execute(sql, params), |r| match r {
            Ok(n) => QueryOutcome::Affected(*n),
            Err(e) => QueryOutcome::Error(e.to_string()),
        })
        .await
    }
}

impl<C: GenericClient> GenericClient for LoggedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        self.query_inner(sql, params, None).await
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Vec<Row>> {
        self.query_inner(sql, params, Some(tag)).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Row> {
        self.query_one_inner(sql, params, None).await
    }

    async fn query_one_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Row> {
        self.query_one_inner(sql, params, Some(tag)).await
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Option<Row>> {
        self.query_opt_inner(sql, params, None).await
    }

    async fn query_opt_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Option<Row>> {
        self.query_opt_inner(sql, params, Some(tag)).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        self.execute_inner(sql, params, None).await
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<u64> {
        self.execute_inner(sql, params, Some(tag)).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        self.client.cancel_token()
    }
}
