// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Temporary storage for an unfinished task form.
//!
//! One draft is kept at a time. It is stamped with the time it was saved and a
//! format version; drafts older than [`DEFAULT_MAX_AGE_HOURS`] are discarded
//! when loaded, and unreadable drafts are cleared.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::mutation::Document;

/// Storage key of the draft.
pub const DRAFT_KEY: &str = "task_form_draft";

/// Current draft format version.
pub const DRAFT_VERSION: &str = "1.0";

/// Drafts older than this are discarded.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// A saved form draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Form fields, stored alongside the metadata.
    #[serde(flatten)]
    pub fields: Document,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl Draft {
    /// Returns how long ago the draft was saved, relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.timestamp)
    }
}

/// Returns true if any field holds something worth saving.
///
/// Empty strings, empty arrays and nulls do not count.
pub fn has_content(fields: &Document) -> bool {
    fields.values().any(|v| match v {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}

/// Draft persistence on top of any [`KeyValueStore`].
pub struct DraftStore<S: KeyValueStore> {
    store: S,
    max_age: Duration,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub fn new(store: S) -> Self {
        DraftStore {
            store,
            max_age: Duration::hours(DEFAULT_MAX_AGE_HOURS),
        }
    }

    /// Overrides the maximum draft age.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Saves `fields` as the current draft, replacing any previous one.
    pub fn save(&self, fields: Document) -> Result<Draft> {
        self.save_at(fields, Utc::now())
    }

    /// Saves `fields` with an explicit timestamp.
    pub fn save_at(&self, fields: Document, now: DateTime<Utc>) -> Result<Draft> {
        let draft = Draft {
            fields,
            timestamp: now,
            version: DRAFT_VERSION.to_string(),
        };
        let json = serde_json::to_string(&draft)?;
        self.store.set(DRAFT_KEY, &json)?;
        Ok(draft)
    }

    /// Loads the draft if one exists and is still fresh.
    ///
    /// Expired and unreadable drafts are cleared and reported as absent.
    pub fn load(&self) -> Option<Draft> {
        self.load_at(Utc::now())
    }

    /// Like [`DraftStore::load`], evaluated at `now`.
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Draft> {
        match self.try_load_at(now) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!("discarding draft: {}", e);
                self.clear_quietly();
                None
            }
        }
    }

    /// Loads the draft at `now`, reporting why it could not be used.
    pub fn try_load_at(&self, now: DateTime<Utc>) -> Result<Option<Draft>> {
        let Some(json) = self.store.get(DRAFT_KEY)? else {
            return Ok(None);
        };

        let draft: Draft = serde_json::from_str(&json)
            .map_err(|e| Error::CorruptedData(format!("draft: {e}")))?;

        let age = draft.age(now);
        if age > self.max_age {
            return Err(Error::DraftExpired {
                age_hours: age.num_hours(),
            });
        }

        Ok(Some(draft))
    }

    /// Returns true if a fresh draft exists.
    pub fn has_draft(&self) -> bool {
        self.load().is_some()
    }

    /// Removes the draft.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(DRAFT_KEY)
    }

    fn clear_quietly(&self) {
        if let Err(e) = self.clear() {
            tracing::warn!("failed to clear draft: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;
