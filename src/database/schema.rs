/*!
 * Query history schema.
 *
 * Migrations are applied in order inside one transaction; the number of
 * applied steps is stored in `schema_version`.
 */

use anyhow::{Context, Result, bail};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

/// One entry per schema version; index 0 upgrades v0 to v1
const MIGRATIONS: &[&str] = &[
    // v1: timestamps are unix milliseconds
    r#"
    CREATE TABLE IF NOT EXISTS query_history (
        text_hash TEXT PRIMARY KEY,
        query_text TEXT NOT NULL,
        last_queried_at INTEGER NOT NULL,
        query_count INTEGER NOT NULL DEFAULT 1
    );
    CREATE INDEX IF NOT EXISTS idx_query_history_last_queried ON query_history(last_queried_at);
    "#,
];

/// Version a freshly initialized database ends up at
pub const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

/// Bring the schema up to `SCHEMA_VERSION`
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
    .context("Cannot create schema_version table")?;

    let current = schema_version(conn)?;
    if current > SCHEMA_VERSION {
        bail!(
            "Query history was written by a newer wordlens (schema v{}, supported v{})",
            current,
            SCHEMA_VERSION
        );
    }
    if current == SCHEMA_VERSION {
        debug!("Query history schema is current (v{})", current);
        return Ok(());
    }

    info!("Upgrading query history schema v{} -> v{}", current, SCHEMA_VERSION);
    let tx = conn.unchecked_transaction()?;
    for (step, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        tx.execute_batch(sql)
            .with_context(|| format!("Schema migration to v{} failed", step + 1))?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [SCHEMA_VERSION],
    )?;
    tx.commit()?;

    Ok(())
}

/// Stored schema version, 0 when nothing was applied yet
fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| row.get(0))
        .optional()?;
    Ok(version.unwrap_or(0))
}
