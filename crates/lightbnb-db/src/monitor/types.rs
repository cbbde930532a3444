/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    /// Other SQL (e.g., DDL, custom)
    Other,
}

impl QueryType {
    /// Detect query type from the first meaningful keyword of a SQL string.
    pub fn from_sql(sql: &str) -> Self {
        use crate::sql::{starts_with_keyword, strip_sql_prefix};

        let trimmed = strip_sql_prefix(sql);
        if starts_with_keyword(trimmed, "SELECT") {
            QueryType::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            QueryType::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            QueryType::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

/// Context information about the statement being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub sql: String,
    pub param_count: usize,
    pub query_type: QueryType,
    /// Optional query name/tag for identification.
    pub tag: Option<String>,
}

impl QueryContext {
    pub fn new(sql: &str, param_count: usize, tag: Option<&str>) -> Self {
        Self {
            sql: sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(sql),
            tag: tag.map(str::to_string),
        }
    }
}

/// What a finished statement produced, for the completion log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Rows(usize),
    Affected(u64),
    /// `query_opt`/`query_one` style lookups: whether a row came back.
    OptionalRow(bool),
    Error(String),
}
