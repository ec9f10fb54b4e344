//! Insertion-ordered map keyed by cut-off date.

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A map from cut-off date to `T` that keeps insertion order.
///
/// Serializes as a JSON object whose keys are `YYYY-MM-DD` dates in the order
/// they were first inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct DateMap<T> {
    entries: Vec<(NaiveDate, T)>,
}

impl<T> Default for DateMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> DateMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. The caller guarantees `date` is not already present.
    pub fn push(&mut self, date: NaiveDate, value: T) {
        self.entries.push((date, value));
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&T> {
        self.entries
            .iter()
            .find(|(d, _)| d == date)
            .map(|(_, value)| value)
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.entries.iter().map(|(d, _)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &T)> {
        self.entries.iter().map(|(d, value)| (d, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> Serialize for DateMap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (date, value) in &self.entries {
            map.serialize_entry(&date.format("%Y-%m-%d").to_string(), value)?;
        }
        map.end()
    }
}
