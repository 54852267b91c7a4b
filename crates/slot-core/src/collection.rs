use crate::error::SlotError;
use crate::slot::Slot;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Ordered collection of uniquely named slots.
///
/// Storage order is insertion order and is what gets written to disk. The
/// name index is derived state, rebuilt whenever positions shift.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Vec<Slot>")]
pub struct Slots {
    entries: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Slot] {
        &self.entries
    }

    /// Append a slot. Callers check `exists` first; a duplicate name here
    /// shadows nothing and the index keeps pointing at the first entry.
    pub fn add(&mut self, slot: Slot) {
        self.index
            .entry(slot.name.clone())
            .or_insert(self.entries.len());
        self.entries.push(slot);
    }

    /// Replace the slot with the same name in place, or append it.
    /// Returns true when an existing slot was replaced.
    pub fn upsert(&mut self, slot: Slot) -> bool {
        match self.index.get(&slot.name) {
            Some(&i) => {
                self.entries[i] = slot;
                true
            }
            None => {
                self.add(slot);
                false
            }
        }
    }

    /// Remove the slot with the given name. Returns false when absent.
    pub fn delete(&mut self, name: &str) -> bool {
        let Some(i) = self.index.get(name).copied() else {
            return false;
        };
        self.entries.remove(i);
        self.reindex();
        true
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// The stored name closest to `name` by edit distance. Advisory only.
    pub fn closest(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(|s| (strsim::levenshtein(name, &s.name), s.name.as_str()))
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, n)| n)
    }

    /// Slots carrying every tag in `required`. An empty filter keeps all.
    pub fn filter_by_tags(&self, required: &[String]) -> Vec<&Slot> {
        self.entries
            .iter()
            .filter(|s| s.has_all_tags(required))
            .collect()
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, slot) in self.entries.iter().enumerate() {
            self.index.entry(slot.name.clone()).or_insert(i);
        }
    }
}

impl PartialEq for Slots {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Slots {}

impl TryFrom<Vec<Slot>> for Slots {
    type Error = SlotError;

    fn try_from(entries: Vec<Slot>) -> Result<Self, Self::Error> {
        let mut slots = Slots::new();
        for slot in entries {
            if slots.exists(&slot.name) {
                return Err(SlotError::DuplicateSlot(slot.name));
            }
            slots.add(slot);
        }
        Ok(slots)
    }
}

impl Serialize for Slots {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Slots {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
