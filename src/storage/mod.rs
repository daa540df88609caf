mod errors;
mod file_storage;
mod memory_storage;
mod persistence;
mod transfer;

use std::sync::Arc;

pub use errors::{ExportError, ImportError, StorageError};
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use persistence::{Persistence, CAP_KEY, RATES_KEY, RECORDS_KEY};
pub use transfer::{export_csv, export_json, import_file, parse_import, write_export, ExportFormat};

/// An opaque string-keyed, string-valued store. Every key is independent.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.as_ref().get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.as_ref().set(key, value)
    }
}
