//! Per-species nutrient contribution, independent of abundance.
//!
//! c(s, n) = max(0, Σ_t trait_s(t) × w_n(t))

use nutribiome_common::{Nutrient, Result};
use serde::{Deserialize, Serialize};

use crate::nutrients::NutrientModel;
use crate::traits::TraitTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesContribution {
    pub species: String,
    pub contribution: f64,
}

/// Species with a strictly positive contribution to `nutrient`, best first.
pub fn species_contributions(
    nutrient: Nutrient,
    traits: &TraitTable,
    model: &NutrientModel,
) -> Result<Vec<SpeciesContribution>> {
    let weights = model.weights(nutrient)?;

    let mut contributions: Vec<SpeciesContribution> = traits
        .iter()
        .map(|(species, entry)| {
            let score: f64 = weights
                .iter()
                .filter_map(|(t, w)| entry.traits.get(t).map(|v| v * w))
                .sum();
            SpeciesContribution {
                species: species.to_string(),
                contribution: score.max(0.0),
            }
        })
        .filter(|c| c.contribution > 0.0)
        .collect();

    contributions.sort_by(|a, b| {
        b.contribution
            .partial_cmp(&a.contribution)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.species.cmp(&b.species))
    });
    Ok(contributions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_contributors_are_dropped() {
        let traits = TraitTable::with_builtin_priors([
            "escherichia_coli",
            "faecalibacterium_prausnitzii",
            "enterobacter_cloacae",
        ]);
        let got = species_contributions(Nutrient::Iron, &traits, &NutrientModel::builtin()).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].species, "faecalibacterium_prausnitzii");
        assert!((got[0].contribution - 0.83).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_descending_with_name_tiebreak() {
        let traits = TraitTable::with_builtin_priors([
            "roseburia_b",
            "bifidobacterium_a",
            "roseburia_a",
            "clostridium_x",
        ]);
        let got = species_contributions(Nutrient::Magnesium, &traits, &NutrientModel::builtin()).unwrap();
        let names: Vec<&str> = got.iter().map(|c| c.species.as_str()).collect();
        // roseburia 0.36, bifidobacterium and clostridium 0.32
        assert_eq!(names, vec!["roseburia_a", "roseburia_b", "bifidobacterium_a", "clostridium_x"]);
    }

    #[test]
    fn test_zinc_default_prior_is_clamped_out() {
        // default: 0.1*0.4 + 0.2*-0.5 = -0.06
        let traits = TraitTable::with_builtin_priors(["unknown_taxon"]);
        let got = species_contributions(Nutrient::Zinc, &traits, &NutrientModel::builtin()).unwrap();
        assert!(got.is_empty());
    }
}
