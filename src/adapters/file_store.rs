//! File-backed key/value store.
//!
//! All keys live in one JSON object at `<data_dir>/storage.json`, which plays
//! the role browser local storage plays for a web console: it outlives the
//! process and holds only short strings.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::traits::{KeyValueStore, StorageError};

/// The storage file name inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// JSON-file implementation of [`KeyValueStore`].
///
/// Every operation re-reads the file so two processes sharing a data
/// directory see each other's writes. The mutex serializes
/// read-modify-write cycles within this process.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store inside `data_dir`. The directory is created lazily on
    /// the first write.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORAGE_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let file = File::open(&self.path)
            .map_err(|e| StorageError::ReadFailed(format!("{}: {}", self.path.display(), e)))?;

        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::WriteFailed(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let write_err =
            |e: std::io::Error| StorageError::WriteFailed(format!("{}: {}", self.path.display(), e));

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only: the file holds the session token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&self.path).map_err(write_err)?;
        // `mode` only applies on creation; tighten files written by older builds.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        writer.flush().map_err(write_err)
    }

    /// Read-modify-write under the process lock.
    fn update<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Entries) -> bool,
    {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            // A corrupt file is replaced rather than blocking every write forever.
            Err(StorageError::Corrupt(msg)) => {
                tracing::warn!("Discarding corrupt storage file: {}", msg);
                Entries::new()
            }
            Err(e) => return Err(e),
        };

        if f(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| entries.remove(key).is_some())
    }
}
