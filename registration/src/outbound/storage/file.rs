//! File-backed key-value store.
//!
//! Each key maps to `<key>.json` inside a single directory opened through
//! `cap_std`, so the adapter cannot reach outside it. Writes go to a hidden
//! staging file first and are renamed into place, leaving either the old or
//! the new value on disk.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

const VALUE_EXTENSION: &str = "json";

/// Store persisting each key as a JSON file in one directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
    dir: Dir,
}

impl FileKeyValueStore {
    /// Open (creating if needed) the store directory at `root`.
    ///
    /// # Errors
    /// Returns [`KeyValueStoreError::Unavailable`] when the directory cannot
    /// be created or opened.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use registration_form::domain::ports::KeyValueStore;
    /// use registration_form::outbound::storage::FileKeyValueStore;
    ///
    /// let store = FileKeyValueStore::open("/tmp/registration-form")?;
    /// store.set("userData", "{}")?;
    /// # Ok::<(), registration_form::domain::ports::KeyValueStoreError>(())
    /// ```
    pub fn open(root: impl AsRef<Path>) -> Result<Self, KeyValueStoreError> {
        let root = root.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|error| Self::unavailable(&root, &error))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|error| Self::unavailable(&root, &error))?;
        Ok(Self { root, dir })
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn unavailable(root: &Path, error: &io::Error) -> KeyValueStoreError {
        KeyValueStoreError::unavailable(format!("{}: {error}", root.display()))
    }

    fn value_path(key: &str) -> Result<PathBuf, KeyValueStoreError> {
        let is_plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !is_plain {
            return Err(KeyValueStoreError::invalid_key(key));
        }
        Ok(PathBuf::from(format!("{key}.{VALUE_EXTENSION}")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let path = Self::value_path(key)?;
        debug!(key, root = %self.root.display(), "reading stored value");
        match self.dir.read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(KeyValueStoreError::read(key, error.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let path = Self::value_path(key)?;
        let staging = PathBuf::from(format!(".{key}.{VALUE_EXTENSION}.tmp"));
        debug!(key, root = %self.root.display(), "writing stored value");
        self.dir
            .write(&staging, value.as_bytes())
            .map_err(|error| KeyValueStoreError::write(key, error.to_string()))?;
        self.dir
            .rename(&staging, &self.dir, &path)
            .map_err(|error| KeyValueStoreError::write(key, error.to_string()))
    }
}
