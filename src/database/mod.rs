/*!
 * Database module for the persistent query history.
 *
 * SQLite-backed "last seen" timestamps per queried text, used to suppress
 * repeated automatic lookups of the same clipboard text.
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{HistoryStats, QueryRecord};
pub use repository::Repository;

/// Last-seen timestamps per queried text
///
/// Timestamps are unix milliseconds.
#[async_trait]
pub trait QueryHistory: Send + Sync + Debug {
    async fn last_queried_at(&self, text: &str) -> Result<Option<i64>>;

    async fn record_query(&self, text: &str, at_ms: i64) -> Result<()>;
}
