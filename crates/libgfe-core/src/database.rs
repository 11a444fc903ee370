//! Results database backed by sled
//!
//! Holds the parameters of the run and the result rows produced by the
//! experiments. The database is opened under an exclusive filesystem lock
//! so two drivers never write to the same file.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{ConfigurationError, Result};

const PARAMETERS_TREE: &str = "parameters";
const RESULTS_TREE: &str = "results";

/// Handle to the results database.
///
/// Pending writes are flushed when the handle is dropped; the lock file is
/// released right after.
pub struct Database {
    path: PathBuf,
    db: sled::Db,
    parameters: sled::Tree,
    results: sled::Tree,
    /// flock released on drop, after `db`
    _lock_file: File,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Open or create the database at `path`.
    ///
    /// The lock file lives at `<path>.lock`. Returns
    /// `ConfigurationError::DatabaseBusy` if another process holds it.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let lock_path = lock_path(path);
        let lock_file = File::create(&lock_path)?;
        lock_file.try_lock_exclusive().map_err(|e| {
            ConfigurationError::DatabaseBusy(format!(
                "{} locked by another process: {}",
                path.display(),
                e
            ))
        })?;

        let db = sled::open(path)?;
        let parameters = db.open_tree(PARAMETERS_TREE)?;
        let results = db.open_tree(RESULTS_TREE)?;
        debug!(path = %path.display(), "opened results database");

        Ok(Self {
            path: path.to_path_buf(),
            db,
            parameters,
            results,
            _lock_file: lock_file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a configuration snapshot, overwriting earlier values of the same names
    pub fn store_parameters(&self, params: &[(String, String)]) -> Result<()> {
        let mut batch = sled::Batch::default();
        for (name, value) in params {
            batch.insert(name.as_bytes(), value.as_bytes());
        }
        self.parameters.apply_batch(batch)?;
        Ok(())
    }

    /// All stored parameters, sorted by name
    pub fn parameters(&self) -> Result<Vec<(String, String)>> {
        let mut params = Vec::new();
        for entry in self.parameters.iter() {
            let (key, value) = entry?;
            params.push((
                String::from_utf8_lossy(&key).into_owned(),
                String::from_utf8_lossy(&value).into_owned(),
            ));
        }
        Ok(params)
    }

    /// Append a result row to `table`, returning its id
    pub fn store_result(&self, table: &str, row: &serde_json::Value) -> Result<u64> {
        if table.is_empty() || table.contains('/') {
            return Err(ConfigurationError::invalid(
                "table",
                format!("'{}' is not a valid table name", table),
            ));
        }
        let id = self.db.generate_id()?;
        let value = serde_json::to_vec(row)?;
        self.results.insert(result_key(table, id), value)?;
        Ok(id)
    }

    /// Rows of `table`, in insertion order
    pub fn results(&self, table: &str) -> Result<Vec<serde_json::Value>> {
        let mut prefix = table.as_bytes().to_vec();
        prefix.push(b'/');

        let mut rows = Vec::new();
        for entry in self.results.scan_prefix(&prefix) {
            let (_, value) = entry?;
            rows.push(serde_json::from_slice(&value)?);
        }
        Ok(rows)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Err(e) = self.db.flush() {
            warn!(path = %self.path.display(), error = %e, "failed to flush results database");
        }
    }
}

// Big-endian id keeps rows ordered by insertion under a prefix scan
fn result_key(table: &str, id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(table.len() + 9);
    key.extend_from_slice(table.as_bytes());
    key.push(b'/');
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// `<path>.lock`, keeping any extension `path` already has
fn lock_path(path: &Path) -> PathBuf {
    let mut lock = path.as_os_str().to_owned();
    lock.push(".lock");
    PathBuf::from(lock)
}
