//! The in-memory gazetteer dictionary.
//!
//! Two read-only indexes over the accepted locations: a unique index by
//! identifier and a many-to-many index by lower-cased label. The
//! dictionary is built once, then only consulted; it is `Sync` and can
//! back any number of concurrent engine runs.
//!
//! Acquiring the raw records (reading and validating the line-delimited
//! JSON gazetteer file) is the caller's business; this module only
//! decides which records are admitted:
//!
//! ```
//! use toponym::{Dictionary, LocationRecord};
//!
//! let lines = [
//!     r#"{"id": "1000000000000", "name": "Europe"}"#,
//!     r#"{"id": "1308000000000", "name": "United Kingdom"}"#,
//! ];
//! let records = lines
//!     .iter()
//!     .map(|line| serde_json::from_str::<LocationRecord>(line).unwrap());
//! let dictionary = Dictionary::from_records(records).unwrap();
//!
//! assert_eq!(dictionary.len(), 2);
//! assert!(dictionary.get_by_label("Europe").is_some());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::entity::normalize;
use crate::error::{Error, Result};
use crate::id::LocationId;
use crate::location::{Location, LocationRecord};

/// Subtypes too small to disambiguate against; their records are never
/// admitted.
const EXCLUDED_SUB_TYPES: &[&str] = &["hamlet", "village"];

/// Read-only gazetteer indexes.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    by_id: HashMap<LocationId, Arc<Location>>,
    by_label: HashMap<String, Vec<Arc<Location>>>,
}

impl Dictionary {
    /// Build the dictionary from raw gazetteer records.
    ///
    /// Records with no name or with an excluded subtype (`"hamlet"`,
    /// `"village"`) are skipped; duplicate identifiers keep the first
    /// record seen. A malformed identifier fails the whole build: the
    /// load step is the only place such ids can be caught.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = LocationRecord>,
    {
        let mut dictionary = Dictionary::default();
        for record in records {
            if record
                .name
                .as_deref()
                .map_or(true, |n| n.trim().is_empty())
            {
                log::debug!("skipping unnamed gazetteer record {}", record.id);
                continue;
            }
            if record
                .sub_type
                .as_deref()
                .is_some_and(|s| EXCLUDED_SUB_TYPES.contains(&s))
            {
                log::debug!(
                    "skipping {} record {}",
                    record.sub_type.as_deref().unwrap_or_default(),
                    record.id
                );
                continue;
            }
            let location = Arc::new(Location::new(record)?);
            if dictionary.by_id.contains_key(&location.id()) {
                log::warn!("duplicate gazetteer id {}, keeping first record", location.id());
                continue;
            }
            for label in location.labels() {
                dictionary
                    .by_label
                    .entry(label.clone())
                    .or_default()
                    .push(Arc::clone(&location));
            }
            dictionary.by_id.insert(location.id(), location);
        }
        Ok(dictionary)
    }

    /// Number of locations stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the dictionary holds no locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Look a location up by identifier, case-insensitively.
    ///
    /// Malformed input is simply not present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Location>> {
        let id = LocationId::parse(id).ok()?;
        self.by_id.get(&id)
    }

    /// Look a location up by parsed identifier.
    #[must_use]
    pub fn get_by_id(&self, id: &LocationId) -> Option<&Arc<Location>> {
        self.by_id.get(id)
    }

    /// Every location matching a label, case-insensitively, in the order
    /// the records were loaded. `None` when nothing matches.
    #[must_use]
    pub fn get_by_label(&self, label: &str) -> Option<&[Arc<Location>]> {
        self.by_label.get(&normalize(label)).map(Vec::as_slice)
    }

    /// Look a location up by identifier when its presence is an
    /// invariant, e.g. while walking `parent_ids` of a stored location.
    ///
    /// Fails with [`Error::LocationNotFound`]: a miss means the
    /// dictionary is corrupt.
    pub fn require(&self, id: &LocationId) -> Result<Arc<Location>> {
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(id.as_str()))
    }
}
