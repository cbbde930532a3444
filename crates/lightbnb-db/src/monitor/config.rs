use std::time::Duration;
use tracing::Level;

/// Configuration for statement logging and timeouts.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Statement timeout. `None` means no timeout (default).
    pub query_timeout: Option<Duration>,
    /// Statements slower than this are logged at `WARN`.
    pub slow_query_threshold: Option<Duration>,
    /// Level for the per-statement SQL log line. `None` disables it.
    pub sql_log_level: Option<Level>,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            query_timeout: None,
            slow_query_threshold: None,
            sql_log_level: Some(Level::DEBUG),
            max_sql_length: Some(200),
        }
    }
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the statement timeout.
    ///
    /// Statements exceeding this duration are cancelled and return
    /// [`DbError::Timeout`](crate::DbError::Timeout).
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub fn with_sql_log_level(mut self, level: Level) -> Self {
        self.sql_log_level = Some(level);
        self
    }

    /// Stop emitting the per-statement SQL line. Slow statements and failures are still logged.
    pub fn without_sql_log(mut self) -> Self {
        self.sql_log_level = None;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}
