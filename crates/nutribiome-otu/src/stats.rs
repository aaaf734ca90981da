//! Descriptive statistics over a baseline abundance vector, for the dashboard views.

use nutribiome_common::AbundanceVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesAbundance {
    pub species: String,
    pub abundance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRow {
    pub species: String,
    pub mean_abundance: f64,
    pub genus: String,
}

/// Observed amounts sorted descending, ties by species name.
fn sorted_desc(abundance: &AbundanceVector) -> Vec<SpeciesAbundance> {
    let mut rows: Vec<SpeciesAbundance> = abundance
        .present()
        .map(|(s, a)| SpeciesAbundance { species: s.to_string(), abundance: a })
        .collect();
    rows.sort_by(|a, b| {
        b.abundance
            .partial_cmp(&a.abundance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.species.cmp(&b.species))
    });
    rows
}

/// The `n` most abundant species.
pub fn top_species(abundance: &AbundanceVector, n: usize) -> Vec<SpeciesAbundance> {
    let mut rows = sorted_desc(abundance);
    rows.truncate(n);
    rows
}

/// Equal-width histogram over the observed range.
///
/// The maximum value falls in the last bin. When every value is equal, a
/// single bin holds them all. Never more bins than values.
pub fn histogram(abundance: &AbundanceVector, bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = abundance.present().map(|(_, a)| a).collect();
    if bins == 0 || values.is_empty() {
        return vec![];
    }
    let bins = bins.min(values.len());

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin { lower: min, upper: max, count: values.len() }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Cumulative share (%) of total abundance covered by the top-k species, for k = 1..N.
pub fn cumulative_percent(abundance: &AbundanceVector) -> Vec<f64> {
    let sorted = sorted_desc(abundance);
    let total: f64 = sorted.iter().map(|r| r.abundance).sum();
    if total <= 0.0 {
        return vec![];
    }

    let mut running = 0.0;
    sorted
        .iter()
        .map(|r| {
            running += r.abundance;
            running / total * 100.0
        })
        .collect()
}

/// Species table sorted by mean abundance, with each species' genus.
pub fn species_rows<F>(abundance: &AbundanceVector, genus_of: F) -> Vec<SpeciesRow>
where
    F: Fn(&str) -> String,
{
    sorted_desc(abundance)
        .into_iter()
        .map(|r| SpeciesRow {
            genus: genus_of(&r.species),
            species: r.species,
            mean_abundance: r.abundance,
        })
        .collect()
}
