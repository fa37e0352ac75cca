/*!
 * Database entity models.
 */

use serde::{Deserialize, Serialize};

/// One row of `query_history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// SHA-256 of the queried text
    pub text_hash: String,
    pub query_text: String,
    /// Unix milliseconds of the latest lookup
    pub last_queried_at: i64,
    pub query_count: i64,
}

/// Row counts of the history store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub entries: i64,
    pub total_queries: i64,
}

impl std::fmt::Display for HistoryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "History entries: {}, Total lookups: {}", self.entries, self.total_queries)
    }
}
