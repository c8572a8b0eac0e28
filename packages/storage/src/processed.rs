//! The set of races whose results are already folded into the stats.
//!
//! The canonical on-disk form is a flat JSON array of race names. Older
//! files come in two richer shapes which are still accepted on read:
//!
//! * an array of `{"raceName": ..., "date": ...}` records, and
//! * an object mapping driver ids to such arrays (the per-driver race
//!   index that early full runs wrote into this file).
//!
//! Either way only the race names are kept. Writing always produces the
//! canonical form.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::StorageError;

/// Names of processed races. Membership only; order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProcessedSet(BTreeSet<String>);

impl ProcessedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, race_name: &str) -> bool {
        self.0.contains(race_name)
    }

    /// Adds `race_name`. Returns `false` if it was already present.
    pub fn insert(&mut self, race_name: impl Into<String>) -> bool {
        self.0.insert(race_name.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Interprets any supported on-disk shape.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Malformed`] if `value` matches none of the
    /// accepted shapes.
    pub fn from_json(value: &serde_json::Value, path: &Path) -> Result<Self, StorageError> {
        let mut set = Self::new();

        match value {
            serde_json::Value::Array(entries) => {
                for entry in entries {
                    set.insert(race_name(entry, path)?);
                }
            }
            serde_json::Value::Object(per_driver) => {
                log::debug!(
                    "{} holds a per-driver race index, reading race names from it",
                    path.display()
                );
                for races in per_driver.values() {
                    let entries = races
                        .as_array()
                        .ok_or_else(|| malformed(path, "expected an array of races per driver"))?;
                    for entry in entries {
                        set.insert(race_name(entry, path)?);
                    }
                }
            }
            _ => return Err(malformed(path, "expected a JSON array of race names")),
        }

        Ok(set)
    }
}

impl<S: Into<String>> FromIterator<S> for ProcessedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

fn race_name(entry: &serde_json::Value, path: &Path) -> Result<String, StorageError> {
    match entry {
        serde_json::Value::String(name) => Ok(name.clone()),
        serde_json::Value::Object(record) => record
            .get("raceName")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| malformed(path, "race record without a raceName")),
        other => Err(malformed(
            path,
            &format!("unexpected processed race entry: {other}"),
        )),
    }
}

fn malformed(path: &Path, message: &str) -> StorageError {
    StorageError::Malformed {
        path: path.to_path_buf(),
        message: message.to_owned(),
    }
}
