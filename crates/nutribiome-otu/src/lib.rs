//! OTU abundance table loading.
//!
//! Reads a tab-separated species × samples table and derives the baseline
//! community used by the scoring engine.
//!
//! # File layout
//!
//! ```text
//! species             S001    S002    S003
//! Lactobacillus_sp    0.012   0.020   NA
//! Escherichia_coli    0.101           0.087
//! ```
//!
//! The first row names the samples; the first column is the species identifier.
//! Cells that do not parse as numbers become missing values. Rows with no numeric
//! cell at all are dropped.
//!
//! # Example
//!
//! ```rust,no_run
//! use nutribiome_otu::OtuTable;
//!
//! #[tokio::main]
//! async fn main() -> nutribiome_common::Result<()> {
//!     let table = OtuTable::load("india_species_abundance_clean.tsv").await?;
//!     let baseline = table.baseline();
//!     println!("{} species across {} samples", baseline.len(), table.sample_count());
//!     Ok(())
//! }
//! ```

pub mod stats;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use nutribiome_common::{AbundanceVector, NutribiomeError, Result};
use tracing::{debug, info, warn};

/// A loaded species × samples abundance table.
#[derive(Debug, Clone)]
pub struct OtuTable {
    /// Per-sample column names, in file order
    samples: Vec<String>,
    /// species -> one value per sample (None = missing)
    rows: BTreeMap<String, Vec<Option<f64>>>,
}

impl OtuTable {
    /// Load a table from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading OTU table from {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            NutribiomeError::DataLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        let table = Self::from_reader(content.as_bytes())?;

        info!(
            "Loaded OTU table {:?}: {} species, {} samples",
            path,
            table.species_count(),
            table.sample_count()
        );
        Ok(table)
    }

    /// Parse a table from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| NutribiomeError::DataLoad(format!("unreadable header: {}", e)))?
            .clone();

        // First column is the species index, rest are samples
        let samples: Vec<String> = headers.iter().skip(1).map(|s| s.trim().to_string()).collect();
        if samples.is_empty() {
            return Err(NutribiomeError::DataLoad(
                "table has no sample columns".to_string(),
            ));
        }

        let mut rows = BTreeMap::new();
        let mut dropped = 0usize;

        for result in reader.records() {
            let record = result
                .map_err(|e| NutribiomeError::DataLoad(format!("malformed row: {}", e)))?;

            let species = record.get(0).unwrap_or_default().trim().to_string();
            let values: Vec<Option<f64>> = (0..samples.len())
                .map(|i| record.get(i + 1).and_then(coerce))
                .collect();

            if values.iter().all(Option::is_none) {
                debug!("Dropping {:?}: no numeric values", species);
                dropped += 1;
                continue;
            }

            if rows.insert(species.clone(), values).is_some() {
                warn!("Duplicate species {:?} in OTU table; keeping the last row", species);
            }
        }

        if rows.is_empty() {
            return Err(NutribiomeError::DataLoad(
                "table is empty after numeric coercion".to_string(),
            ));
        }
        if dropped > 0 {
            info!("Dropped {} rows without numeric values", dropped);
        }

        Ok(Self { samples, rows })
    }

    pub fn species_count(&self) -> usize {
        self.rows.len()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn sample_names(&self) -> &[String] {
        &self.samples
    }

    pub fn species(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    /// Per-sample values for one species.
    pub fn row(&self, species: &str) -> Option<&[Option<f64>]> {
        self.rows.get(species).map(Vec::as_slice)
    }

    /// Per-species mean across samples, ignoring missing cells.
    pub fn baseline(&self) -> AbundanceVector {
        self.rows
            .iter()
            .map(|(species, values)| (species.as_str(), mean(values)))
            .collect()
    }
}

/// Numeric coercion of one cell; anything unparsable is missing.
fn coerce(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}
