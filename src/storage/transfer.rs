use std::collections::HashSet;
use std::path::Path;

use csv::WriterBuilder;
use serde_json::Value;
use tracing::{debug, info};

use crate::models::Record;
use crate::storage::errors::{ExportError, ImportError};

const STRING_FIELDS: [&str; 6] = ["id", "description", "category", "date", "createdAt", "updatedAt"];
const CSV_HEADERS: [&str; 7] = ["id", "description", "amount", "category", "date", "createdAt", "updatedAt"];

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExportFormat {
    Json,
    Csv
}

/// The full record list as indented JSON, the same layout `parse_import` accepts.
pub fn export_json(records: &[Record]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// The full record list as CSV with a header row, even when the list is empty.
pub fn export_csv(records: &[Record]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();

    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buffer);

        writer.write_record(CSV_HEADERS)?;

        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
    }

    Ok(buffer)
}

pub async fn write_export(path: impl AsRef<Path>, records: &[Record], format: ExportFormat) -> Result<(), ExportError> {
    let path = path.as_ref();
    let contents = match format {
        ExportFormat::Json => export_json(records)?.into_bytes(),
        ExportFormat::Csv => export_csv(records)?
    };

    tokio::fs::write(path, contents).await.map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source
    })?;

    info!("Exported {} records to {}", records.len(), path.display());

    Ok(())
}

/// Reads an import file. Resolves once, with every record or with the first
/// problem found. Nothing is applied anywhere by this function.
pub async fn import_file(path: impl AsRef<Path>) -> Result<Vec<Record>, ImportError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path).await.map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source
    })?;

    parse_import(&contents)
}

/// Parses and checks an import document.
///
/// The top-level value must be an array whose elements all carry string
/// `id`, `description`, `category`, `date`, `createdAt`, `updatedAt` and a
/// numeric `amount`. Ids must be unique within the file.
pub fn parse_import(contents: &str) -> Result<Vec<Record>, ImportError> {
    let Value::Array(elements) = serde_json::from_str::<Value>(contents)? else {
        return Err(ImportError::NotAnArray);
    };

    let mut records = Vec::with_capacity(elements.len());
    let mut seen_ids = HashSet::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        check_shape(index, &element)?;

        let record: Record = serde_json::from_value(element)
            .map_err(|error| ImportError::InvalidValue { index, reason: error.to_string() })?;

        if !seen_ids.insert(record.id.clone()) {
            return Err(ImportError::DuplicateId { index, id: record.id });
        }

        records.push(record);
    }

    debug!("Parsed {} records from import", records.len());

    Ok(records)
}

fn check_shape(index: usize, element: &Value) -> Result<(), ImportError> {
    let Some(object) = element.as_object() else {
        return Err(ImportError::invalid_structure(index, "expected an object"));
    };

    for field in STRING_FIELDS {
        if !object.get(field).is_some_and(Value::is_string) {
            return Err(ImportError::invalid_structure(index, format!("field `{field}` must be a string")));
        }
    }

    if !object.get("amount").is_some_and(Value::is_number) {
        return Err(ImportError::invalid_structure(index, "field `amount` must be a number"));
    }

    Ok(())
}
