//! Dirty-field tracking for edited requests.
//!
//! `EditedFields` records *which* template fields changed since the last
//! administrator review, not what they changed to. Renderers highlight the
//! listed fields; the lifecycle engine clears the set when an admin approves
//! the request. Membership is exact string match on the field name, and
//! unknown names are accepted opaquely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The set of field names edited since the last administrator review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditedFields(BTreeSet<String>);

impl EditedFields {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add `field` to the set. Returns `true` when the name was not already
    /// present. Adding twice is a no-op; nothing is ever removed here —
    /// reset is an engine side effect of review completion, not ours.
    pub fn merge(&mut self, field: &str) -> bool {
        let name = field.trim();
        if name.is_empty() {
            return false;
        }
        self.0.insert(name.to_string())
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field.trim())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Canonical persisted form: comma-delimited field names.
    #[must_use]
    pub fn to_delimited(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(",")
    }

    /// Lenient parse of the persisted form: whitespace around names and
    /// empty segments are dropped rather than rejected.
    #[must_use]
    pub fn from_delimited(raw: &str) -> Self {
        let names = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self(names)
    }
}

impl fmt::Display for EditedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_delimited())
    }
}

impl FromIterator<String> for EditedFields {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.merge(&name);
        }
        set
    }
}
