use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::storage::errors::StorageError;
use crate::storage::KeyValueStore;

/// Keeps each key in its own `<key>.json` file under a data directory.
pub struct FileStorage {
    root: PathBuf
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into()
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::io(key, error))
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|error| StorageError::io(key, error))?;

        //NOTE: Staged write followed by rename, readers never observe a truncated value
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value).map_err(|error| StorageError::io(key, error))?;
        fs::rename(&staging, &path).map_err(|error| StorageError::io(key, error))?;

        debug!("Stored key [{key}] at {}", path.display());

        Ok(())
    }
}
