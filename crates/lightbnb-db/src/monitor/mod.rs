//! Statement logging and timeouts.
//!
//! # Example
//!
//! ```rust,ignore
//! use lightbnb_db::monitor::{LoggedClient, MonitorConfig};
//! use std::time::Duration;
//!
//! let config = MonitorConfig::new()
//!     .with_query_timeout(Duration::from_secs(30))
//!     .with_slow_query_threshold(Duration::from_millis(250));
//!
//! let client = LoggedClient::new(pool.get().await?).with_config(config);
//! let user = lightbnb_db::users::get_user_with_id(&client, 1).await?;
//! ```

mod config;
mod logged;
mod types;


pub use config::MonitorConfig;
pub use logged::LoggedClient;
pub use types::{QueryContext, QueryOutcome, QueryType};

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
