/*!
 * Query history store.
 *
 * Rows are keyed by the SHA-256 of the trimmed query text, so the same
 * word looked up twice updates one row.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};

use super::QueryHistory;
use super::connection::DatabaseConnection;
use super::models::{HistoryStats, QueryRecord};

/// Query history backed by SQLite
#[derive(Clone, Debug)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// History in the user's data directory
    pub fn new_default() -> Result<Self> {
        DatabaseConnection::new_default().map(Self::new)
    }

    /// History that lives only as long as the process
    pub fn new_in_memory() -> Result<Self> {
        DatabaseConnection::new_in_memory().map(Self::new)
    }

    /// Row key for `text`, lowercase hex
    pub fn hash_text(text: &str) -> String {
        let digest = Sha256::digest(text.as_bytes());
        digest.iter().map(|byte| format!("{:02x}", byte)).collect()
    }

    /// Write through a lookup of `text` at `at_ms`
    pub async fn record_query(&self, text: &str, at_ms: i64) -> Result<()> {
        let text_hash = Self::hash_text(text);
        let text = text.to_string();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO query_history (text_hash, query_text, last_queried_at, query_count)
                    VALUES (?1, ?2, ?3, 1)
                    ON CONFLICT(text_hash)
                    DO UPDATE SET last_queried_at = excluded.last_queried_at,
                                  query_count = query_history.query_count + 1
                    "#,
                    params![text_hash, text, at_ms],
                )?;
                Ok(())
            })
            .await
    }

    /// Timestamp of the latest lookup of `text`, if any
    pub async fn last_queried_at(&self, text: &str) -> Result<Option<i64>> {
        Ok(self.get_record(text).await?.map(|record| record.last_queried_at))
    }

    /// Full history row for `text`
    pub async fn get_record(&self, text: &str) -> Result<Option<QueryRecord>> {
        let text_hash = Self::hash_text(text);

        self.db
            .execute_async(move |conn| {
                let record = conn
                    .query_row(
                        r#"
                        SELECT text_hash, query_text, last_queried_at, query_count
                        FROM query_history
                        WHERE text_hash = ?1
                        "#,
                        [text_hash],
                        |row| {
                            Ok(QueryRecord {
                                text_hash: row.get(0)?,
                                query_text: row.get(1)?,
                                last_queried_at: row.get(2)?,
                                query_count: row.get(3)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(record)
            })
            .await
    }

    /// Delete rows last queried before `cutoff_ms`
    pub async fn prune_older_than(&self, cutoff_ms: i64) -> Result<i64> {
        let deleted = self
            .db
            .execute_async(move |conn| {
                let deleted = conn.execute("DELETE FROM query_history WHERE last_queried_at < ?1", [cutoff_ms])?;
                Ok(deleted as i64)
            })
            .await?;

        debug!("Pruned {} history entries older than {}", deleted, cutoff_ms);
        Ok(deleted)
    }

    /// Delete every row
    pub async fn clear(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let deleted = conn.execute("DELETE FROM query_history", [])?;
                Ok(deleted as i64)
            })
            .await
    }

    /// Get history statistics
    pub async fn stats(&self) -> Result<HistoryStats> {
        self.db
            .execute_async(|conn| {
                let (entries, total_queries) = conn.query_row(
                    "SELECT COUNT(*), COALESCE(SUM(query_count), 0) FROM query_history",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;
                Ok(HistoryStats { entries, total_queries })
            })
            .await
    }
}

#[async_trait]
impl QueryHistory for Repository {
    async fn last_queried_at(&self, text: &str) -> Result<Option<i64>> {
        Repository::last_queried_at(self, text).await
    }

    async fn record_query(&self, text: &str, at_ms: i64) -> Result<()> {
        Repository::record_query(self, text, at_ms).await
    }
}
