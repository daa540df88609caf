use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Amount, RecordId, Timestamp};

/// A single expense entry as it is persisted, exported and imported.
///
/// Field names serialize in camelCase (`createdAt`, `updatedAt`) so stored
/// lists and exported files share one layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique token assigned at creation, never changed afterwards.
    pub id: RecordId,
    pub description: String,
    pub amount: Amount,
    pub category: String,
    /// Calendar date of the expense, stored as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Set once when the record is created.
    pub created_at: Timestamp,
    /// Set at creation and on every modification, never earlier than `created_at`.
    pub updated_at: Timestamp
}

/// The user-editable part of a record, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub description: String,
    pub amount: Amount,
    pub category: String,
    pub date: NaiveDate
}

/// A partial edit. Every `Some` field replaces the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>
}

impl Record {
    pub fn new(id: RecordId, fields: RecordFields, now: Timestamp) -> Self {
        Self {
            id,
            description: fields.description,
            amount: fields.amount,
            category: fields.category,
            date: fields.date,
            created_at: now,
            updated_at: now
        }
    }

    /// Merges `patch` over this record and stamps `updated_at`.
    ///
    /// `id` and `created_at` are untouched. A clock that went backwards is
    /// clamped so `updated_at` never precedes `created_at`.
    pub fn apply(&mut self, patch: RecordPatch, now: Timestamp) {
        if let Some(description) = patch.description {
            self.description = description;
        }

        if let Some(amount) = patch.amount {
            self.amount = amount;
        }

        if let Some(category) = patch.category {
            self.category = category;
        }

        if let Some(date) = patch.date {
            self.date = date;
        }

        self.updated_at = now.max(self.created_at);
    }
}

impl From<RecordFields> for RecordPatch {
    fn from(fields: RecordFields) -> Self {
        Self {
            description: Some(fields.description),
            amount: Some(fields.amount),
            category: Some(fields.category),
            date: Some(fields.date)
        }
    }
}
