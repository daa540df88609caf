use std::io;

use thiserror::Error;

use crate::types::RecordId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed for key [{key}]: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error
    },
    #[error("Could not encode value for key [{key}]: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error
    },
    #[error("Could not decode value for key [{key}]: {reason}")]
    Decode {
        key: String,
        reason: String
    }
}

impl StorageError {
    pub fn io(key: &str, source: io::Error) -> Self {
        Self::Io { key: key.to_string(), source }
    }

    pub fn encode(key: &str, source: serde_json::Error) -> Self {
        Self::Encode { key: key.to_string(), source }
    }

    pub fn decode(key: &str, reason: impl ToString) -> Self {
        Self::Decode { key: key.to_string(), reason: reason.to_string() }
    }
}

/// A rejected import. No record from the file is applied when this is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read file [{path}]: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error
    },
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("File must contain an array of records")]
    NotAnArray,
    #[error("Record at index [{index}] has invalid structure: {reason}")]
    InvalidStructure {
        index: usize,
        reason: String
    },
    #[error("Record at index [{index}] has an invalid value: {reason}")]
    InvalidValue {
        index: usize,
        reason: String
    },
    #[error("Record at index [{index}] reuses id [{id}]")]
    DuplicateId {
        index: usize,
        id: RecordId
    }
}

impl ImportError {
    pub fn invalid_structure(index: usize, reason: impl ToString) -> Self {
        Self::InvalidStructure { index, reason: reason.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Export encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("Export I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to write file [{path}]: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error
    }
}
