//! Species-level functional trait table.
//!
//! Traits are assigned from genus-level priors: every species of a known genus
//! receives a copy of that genus' vector, every other species receives the
//! default prior. The table is built once per species universe and is
//! read-only afterwards.

use std::collections::{BTreeMap, HashMap};

use nutribiome_common::Trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::genus;

// ── Trait vector ─────────────────────────────────────────────────────────────

/// Trait → value map. A vector need not carry every trait; absent traits
/// contribute nothing to a score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitVector {
    values: BTreeMap<Trait, f64>,
}

impl TraitVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full vector in [`Trait::ALL`] order:
    /// SCFA, pH_reduction, Barrier_support, Vitamin_Biosynthesis, Siderophore.
    pub fn from_array(values: [f64; 5]) -> Self {
        Self {
            values: Trait::ALL.iter().copied().zip(values).collect(),
        }
    }

    pub fn with(mut self, t: Trait, value: f64) -> Self {
        self.values.insert(t, value);
        self
    }

    pub fn get(&self, t: Trait) -> Option<f64> {
        self.values.get(&t).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        self.values.iter().map(|(t, v)| (*t, *v))
    }

    /// Values in [`Trait::ALL`] order; absent traits read as 0.0.
    pub fn as_array(&self) -> [f64; 5] {
        Trait::ALL.map(|t| self.get(t).unwrap_or(0.0))
    }

    /// Prior used for every species whose genus has no literature entry.
    pub fn default_prior() -> Self {
        Self::from_array([0.2, 0.1, 0.1, 0.1, 0.2])
    }
}

// ── Genus priors ─────────────────────────────────────────────────────────────

/// Genus → trait prior dictionary. Keys are stored lowercase and looked up
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct GenusPriors {
    priors: HashMap<String, TraitVector>,
}

impl GenusPriors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, genus: &str, traits: TraitVector) -> Self {
        self.priors.insert(genus.to_lowercase(), traits);
        self
    }

    pub fn get(&self, genus: &str) -> Option<&TraitVector> {
        self.priors.get(&genus.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.priors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }

    /// Literature-derived priors for the 16 well-characterised gut genera.
    /// Columns: SCFA, pH_reduction, Barrier_support, Vitamin_Biosynthesis, Siderophore.
    pub fn builtin() -> Self {
        const TABLE: [(&str, [f64; 5]); 16] = [
            ("lactobacillus",    [0.9,  0.9, 0.8, 0.6, 0.0]),
            ("bifidobacterium",  [0.8,  0.7, 0.8, 0.7, 0.0]),
            ("faecalibacterium", [0.95, 0.9, 0.9, 0.4, 0.0]),
            ("roseburia",        [0.9,  0.8, 0.7, 0.2, 0.0]),
            ("bacteroides",      [0.6,  0.3, 0.5, 0.5, 0.1]),
            ("prevotella",       [0.7,  0.4, 0.6, 0.3, 0.0]),
            ("streptococcus",    [0.3,  0.5, 0.3, 0.3, 0.0]),
            ("clostridium",      [0.8,  0.6, 0.4, 0.2, 0.0]),
            ("ruminococcus",     [0.85, 0.7, 0.6, 0.3, 0.0]),
            ("escherichia",      [0.1,  0.0, 0.1, 0.1, 0.9]),
            ("enterobacter",     [0.1,  0.0, 0.1, 0.1, 0.8]),
            ("eubacterium",      [0.5,  0.4, 0.3, 0.2, 0.0]),
            ("haemophilus",      [0.2,  0.2, 0.2, 0.2, 0.3]),
            ("megasphaera",      [0.7,  0.5, 0.4, 0.1, 0.0]),
            ("parasutterella",   [0.3,  0.2, 0.2, 0.2, 0.2]),
            ("gemmiger",         [0.6,  0.4, 0.5, 0.3, 0.0]),
        ];
        TABLE
            .iter()
            .fold(Self::new(), |p, (g, v)| p.with(g, TraitVector::from_array(*v)))
    }
}

// ── Trait table ──────────────────────────────────────────────────────────────

/// Where a species' trait vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitSource {
    GenusPrior,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    pub genus: String,
    pub source: TraitSource,
    pub traits: TraitVector,
}

/// How many species were matched to a known genus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitCoverage {
    pub total: usize,
    pub genus_prior: usize,
    pub defaulted: usize,
}

impl TraitCoverage {
    pub fn matched_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.genus_prior as f64 / self.total as f64
        }
    }
}

/// Species → trait vector, one entry per distinct species.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraitTable {
    rows: BTreeMap<String, SpeciesTraits>,
}

impl TraitTable {
    /// Assign every species its genus prior, or `default` when the genus is unknown.
    pub fn build<I, S>(species: I, priors: &GenusPriors, default: &TraitVector) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows = BTreeMap::new();
        for sp in species {
            let sp = sp.as_ref();
            let genus = genus::resolve(sp);
            let (source, traits) = match priors.get(&genus) {
                Some(prior) => (TraitSource::GenusPrior, prior.clone()),
                None => (TraitSource::Default, default.clone()),
            };
            rows.insert(sp.to_string(), SpeciesTraits { genus, source, traits });
        }

        let table = Self { rows };
        let coverage = table.coverage();
        debug!(
            "Built trait table: {} species, {} from genus priors, {} defaulted",
            coverage.total, coverage.genus_prior, coverage.defaulted
        );
        table
    }

    /// Build with the builtin genus priors and default prior.
    pub fn with_builtin_priors<I, S>(species: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(species, &GenusPriors::builtin(), &TraitVector::default_prior())
    }

    pub fn get(&self, species: &str) -> Option<&TraitVector> {
        self.rows.get(species).map(|r| &r.traits)
    }

    pub fn entry(&self, species: &str) -> Option<&SpeciesTraits> {
        self.rows.get(species)
    }

    pub fn contains(&self, species: &str) -> bool {
        self.rows.contains_key(species)
    }

    pub fn genus_of(&self, species: &str) -> Option<&str> {
        self.rows.get(species).map(|r| r.genus.as_str())
    }

    pub fn value(&self, species: &str, t: Trait) -> Option<f64> {
        self.get(species).and_then(|v| v.get(t))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn species(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpeciesTraits)> + '_ {
        self.rows.iter().map(|(s, r)| (s.as_str(), r))
    }

    pub fn coverage(&self) -> TraitCoverage {
        let genus_prior = self
            .rows
            .values()
            .filter(|r| r.source == TraitSource::GenusPrior)
            .count();
        TraitCoverage {
            total: self.rows.len(),
            genus_prior,
            defaulted: self.rows.len() - genus_prior,
        }
    }

    /// Species with the highest value for one trait, descending, ties by name.
    pub fn top_by_trait(&self, t: Trait, n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .rows
            .iter()
            .filter_map(|(s, r)| r.traits.get(t).map(|v| (s.clone(), v)))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(n);
        ranked
    }
}
