/*!
 * SQLite handle for the query history.
 *
 * One connection is shared behind a mutex; async callers hop onto the
 * blocking pool so lookups never stall the runtime on disk I/O.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::schema;

/// Directory created under the platform data dir
const HISTORY_DIRNAME: &str = "wordlens";

const HISTORY_FILENAME: &str = "wordlens.db";

/// How long a writer waits on a locked database file (a second CLI process)
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared SQLite connection with its on-disk location
#[derive(Clone, Debug)]
pub struct DatabaseConnection {
    db_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the history under the user's local data directory
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_database_path()?)
    }

    /// Open (or create) the history file at `db_path`
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create history directory {}", parent.display()))?;
        }

        info!("Opening query history at {}", db_path.display());
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Cannot open query history {}", db_path.display()))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Self::prepared(conn, db_path)
    }

    /// Throwaway history kept in memory
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory query history");
        let conn = Connection::open_in_memory().context("Cannot open in-memory query history")?;
        Self::prepared(conn, PathBuf::from(":memory:"))
    }

    fn prepared(conn: Connection, db_path: PathBuf) -> Result<Self> {
        schema::initialize_schema(&conn)?;
        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// `<data_local_dir>/wordlens/wordlens.db`, falling back to `~/.local/share`
    pub fn default_database_path() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .context("No data directory available for the query history")?;

        Ok(base.join(HISTORY_DIRNAME).join(HISTORY_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` against the connection on the current thread
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.connection.lock())
    }

    /// Run `f` against the connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || f(&connection.lock()))
            .await
            .context("Query history task panicked")?
    }
}
