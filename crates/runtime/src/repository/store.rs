//! Table store backing the repositories.
//!
//! A [`Store`] holds named tables of [`Fields`] rows keyed by an
//! auto-assigned integer id. It is either purely in memory or backed by one
//! JSON document on disk, rewritten atomically (temp file + rename) after
//! every committed mutation.
//!
//! All access is serialized behind one mutex. A mutation runs against a copy
//! of its table and only replaces the live table when it reports at least
//! one affected row and, for file-backed stores, the flush succeeded.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use cultivation_core::Fields;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use super::error::{RepositoryError, Result};

/// One table: rows keyed by id plus the id sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Fields>,
}

impl Table {
    /// Appends a row under a fresh id, writing the id into its `id` column.
    pub fn insert(&mut self, mut row: Fields) -> i64 {
        self.next_id = self.next_id.max(0) + 1;
        let id = self.next_id;
        row.insert("id".into(), json!(id));
        self.rows.insert(id, row);
        id
    }

    pub fn get(&self, id: i64) -> Option<&Fields> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Fields> {
        self.rows.get_mut(&id)
    }

    /// Rows in id order.
    pub fn rows(&self) -> impl Iterator<Item = &Fields> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Database {
    tables: BTreeMap<String, Table>,
}

/// Shared handle to the table store.
///
/// Opened once at startup, injected into repositories through `Arc<Store>`
/// and closed at shutdown. Operations on a closed store fail with
/// [`RepositoryError::StoreClosed`].
pub struct Store {
    path: Option<PathBuf>,
    database: Mutex<Option<Database>>,
}

impl Store {
    /// Opens (or creates) a file-backed store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }

        let database = if path.exists() {
            let json = fs::read_to_string(&path).map_err(RepositoryError::Io)?;
            let database: Database =
                serde_json::from_str(&json).map_err(|e| RepositoryError::Json(e.to_string()))?;
            info!(
                target: "runtime::store",
                path = %path.display(),
                tables = database.tables.len(),
                "opened store"
            );
            database
        } else {
            info!(target: "runtime::store", path = %path.display(), "created store");
            Database::default()
        };

        Ok(Self {
            path: Some(path),
            database: Mutex::new(Some(database)),
        })
    }

    /// Creates a store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            database: Mutex::new(Some(Database::default())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Creates `name` if it does not exist yet.
    pub fn create_table(&self, name: &str) -> Result<()> {
        let mut guard = self.lock()?;
        let database = guard.as_mut().ok_or(RepositoryError::StoreClosed)?;
        if database.tables.contains_key(name) {
            return Ok(());
        }

        let mut next = database.clone();
        next.tables.insert(name.to_string(), Table::default());
        self.flush(&next)?;
        *database = next;

        debug!(target: "runtime::store", table = name, "created table");
        Ok(())
    }

    /// Runs a read-only closure against `table`.
    pub fn query<T, F>(&self, table: &str, read: F) -> Result<T>
    where
        F: FnOnce(&Table) -> T,
    {
        let guard = self.lock()?;
        let database = guard.as_ref().ok_or(RepositoryError::StoreClosed)?;
        let table = database
            .tables
            .get(table)
            .ok_or_else(|| RepositoryError::MissingTable(table.to_string()))?;
        Ok(read(table))
    }

    /// Runs a mutation against `table`.
    ///
    /// The closure returns the number of affected rows together with its
    /// output. Zero affected rows leaves the table untouched; otherwise the
    /// change is flushed and committed, or discarded if the flush fails.
    pub fn execute<T, F>(&self, table: &str, mutate: F) -> Result<(usize, T)>
    where
        F: FnOnce(&mut Table) -> (usize, T),
    {
        let mut guard = self.lock()?;
        let database = guard.as_mut().ok_or(RepositoryError::StoreClosed)?;
        let current = database
            .tables
            .get(table)
            .ok_or_else(|| RepositoryError::MissingTable(table.to_string()))?;

        let mut working = current.clone();
        let (affected, output) = mutate(&mut working);
        if affected == 0 {
            return Ok((0, output));
        }

        let previous = database.tables.insert(table.to_string(), working);
        if let Err(err) = self.flush(database) {
            warn!(target: "runtime::store", table, error = %err, "flush failed, rolling back");
            if let Some(previous) = previous {
                database.tables.insert(table.to_string(), previous);
            }
            return Err(err);
        }

        Ok((affected, output))
    }

    /// Flushes and releases the store. Later calls fail with `StoreClosed`.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.lock()?;
        if let Some(database) = guard.take() {
            self.flush(&database)?;
            info!(target: "runtime::store", "store closed");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.lock().map(|guard| guard.is_none()).unwrap_or(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Database>>> {
        self.database
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)
    }

    fn flush(&self, database: &Database) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let temp_path = path.with_extension("json.tmp");

        // Write to temp file
        let json = serde_json::to_string_pretty(database)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;
        fs::write(&temp_path, json).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, path).map_err(RepositoryError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn row(name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), json!(name));
        fields
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = Store::in_memory();
        store.create_table("t").unwrap();

        let (_, a) = store.execute("t", |t| (1, t.insert(row("a")))).unwrap();
        let (_, b) = store.execute("t", |t| (1, t.insert(row("b")))).unwrap();
        assert_eq!((a, b), (1, 2));

        let id = store
            .query("t", |t| t.get(2).map(|r| r["id"].clone()))
            .unwrap();
        assert_eq!(id, Some(json!(2)));
    }

    #[test]
    fn zero_affected_rows_is_not_committed() {
        let store = Store::in_memory();
        store.create_table("t").unwrap();

        let (affected, _) = store
            .execute("t", |t| {
                t.insert(row("ghost"));
                (0, ())
            })
            .unwrap();
        assert_eq!(affected, 0);
        assert_eq!(store.query("t", Table::len).unwrap(), 0);
    }

    #[test]
    fn missing_table_and_closed_store() {
        let store = Store::in_memory();
        assert!(matches!(
            store.query("nope", Table::len),
            Err(RepositoryError::MissingTable(_))
        ));

        store.create_table("t").unwrap();
        store.close().unwrap();
        assert!(store.is_closed());
        assert!(matches!(
            store.execute("t", |t| (1, t.insert(row("x")))),
            Err(RepositoryError::StoreClosed)
        ));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("sect.json");

        {
            let store = Store::open(&path).unwrap();
            store.create_table("t").unwrap();
            store.execute("t", |t| (1, t.insert(row("a")))).unwrap();
            store.close().unwrap();
        }

        let store = Store::open(&path).unwrap();
        store.create_table("t").unwrap();
        assert_eq!(store.query("t", Table::len).unwrap(), 1);
        let (_, id) = store.execute("t", |t| (1, t.insert(row("b")))).unwrap();
        assert_eq!(id, 2);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_flush_rolls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sect.json");
        let store = Store::open(&path).unwrap();
        store.create_table("t").unwrap();

        // a directory squatting on the temp path makes the write fail
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(matches!(
            store.execute("t", |t| (1, t.insert(row("a")))),
            Err(RepositoryError::Io(_))
        ));
        assert_eq!(store.query("t", Table::len).unwrap(), 0);
    }
}
