/*!
 * Tests for the SQLite query history
 */

use std::sync::Arc;
use tempfile::TempDir;

use wordlens::database::{DatabaseConnection, QueryHistory, Repository};

#[tokio::test]
async fn test_record_query_withRepeatedText_shouldCountAndUpdateTimestamp() {
    let repo = Repository::new_in_memory().unwrap();

    repo.record_query("hello", 1_000).await.unwrap();
    repo.record_query("hello", 2_500).await.unwrap();
    repo.record_query("world", 3_000).await.unwrap();

    let record = repo.get_record("hello").await.unwrap().unwrap();
    assert_eq!(record.query_text, "hello");
    assert_eq!(record.query_count, 2);
    assert_eq!(record.last_queried_at, 2_500);

    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.total_queries, 3);
}

#[tokio::test]
async fn test_prune_older_than_withMixedAges_shouldKeepRecentEntries() {
    let repo = Repository::new_in_memory().unwrap();
    repo.record_query("old", 1_000).await.unwrap();
    repo.record_query("new", 9_000).await.unwrap();

    assert_eq!(repo.prune_older_than(5_000).await.unwrap(), 1);
    assert!(repo.last_queried_at("old").await.unwrap().is_none());
    assert_eq!(repo.last_queried_at("new").await.unwrap(), Some(9_000));

    assert_eq!(repo.clear().await.unwrap(), 1);
    assert_eq!(repo.stats().await.unwrap().entries, 0);
}

#[tokio::test]
async fn test_query_history_trait_withFileDatabase_shouldPersistAcrossConnections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.db");

    {
        let history: Arc<dyn QueryHistory> = Arc::new(Repository::new(DatabaseConnection::new(&path).unwrap()));
        history.record_query("persist me", 42).await.unwrap();
    }

    let reopened = Repository::new(DatabaseConnection::new(&path).unwrap());
    assert_eq!(reopened.last_queried_at("persist me").await.unwrap(), Some(42));
}
