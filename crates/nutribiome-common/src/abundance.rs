//! Canonical species → relative abundance vector.
//!
//! Every caller (the OTU loader, the simulator, HTTP handlers) converts its own
//! representation into this one type at the boundary. A `None` amount is a
//! missing observation; `NaN` is stored as `None`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbundanceVector {
    entries: BTreeMap<String, Option<f64>>,
}

impl AbundanceVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the amount for a species, replacing any previous value.
    pub fn insert(&mut self, species: impl Into<String>, amount: f64) {
        let amount = if amount.is_nan() { None } else { Some(amount) };
        self.entries.insert(species.into(), amount);
    }

    /// Record a species with no observed amount.
    pub fn insert_missing(&mut self, species: impl Into<String>) {
        self.entries.insert(species.into(), None);
    }

    /// Amount for a species; `None` when absent or missing.
    pub fn get(&self, species: &str) -> Option<f64> {
        self.entries.get(species).copied().flatten()
    }

    pub fn contains(&self, species: &str) -> bool {
        self.entries.contains_key(species)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in species order, including missing ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.entries.iter().map(|(s, a)| (s.as_str(), *a))
    }

    pub fn species(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Entries with an observed amount (any sign).
    pub fn present(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries
            .iter()
            .filter_map(|(s, a)| a.map(|a| (s.as_str(), a)))
    }

    /// Sum of every observed amount, non-positive values included.
    pub fn total(&self) -> f64 {
        self.present().map(|(_, a)| a).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for AbundanceVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut v = Self::new();
        for (species, amount) in iter {
            v.insert(species, amount);
        }
        v
    }
}

impl<S: Into<String>> FromIterator<(S, Option<f64>)> for AbundanceVector {
    fn from_iter<I: IntoIterator<Item = (S, Option<f64>)>>(iter: I) -> Self {
        let mut v = Self::new();
        for (species, amount) in iter {
            match amount {
                Some(a) => v.insert(species, a),
                None => v.insert_missing(species),
            }
        }
        v
    }
}
