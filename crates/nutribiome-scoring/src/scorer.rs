//! Absorption score computation.
//!
//! raw(n) = Σ_s Σ_t a_s × trait_s(t) × w_n(t)     over species with a_s > 0
//! norm(n) = raw(n) / Σ_s a_s                      over every observed a_s
//!
//! The denominator deliberately includes non-positive amounts and species
//! missing from the trait table; the numerator does not.

use nutribiome_common::{AbundanceVector, Nutrient, Result};
use serde::{Deserialize, Serialize};

use crate::nutrients::NutrientModel;
use crate::traits::TraitTable;

/// Score of one nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientScore {
    pub nutrient: Nutrient,
    pub score: f64,
}

/// Absorption score for `nutrient` given a community composition.
///
/// Species with a missing or non-positive amount, and species absent from
/// `traits`, are skipped. Returns `UnknownNutrient` if `model` lacks the nutrient.
pub fn absorption_score(
    abundance: &AbundanceVector,
    nutrient: Nutrient,
    traits: &TraitTable,
    model: &NutrientModel,
    normalize: bool,
) -> Result<f64> {
    let weights = model.weights(nutrient)?;

    let mut raw = 0.0;
    for (species, amount) in abundance.present() {
        if amount <= 0.0 {
            continue;
        }
        let Some(species_traits) = traits.get(species) else {
            continue;
        };
        for (t, w) in weights.iter() {
            if let Some(value) = species_traits.get(t) {
                raw += amount * value * w;
            }
        }
    }

    if !normalize {
        return Ok(raw);
    }

    let total = abundance.total();
    if total > 0.0 {
        Ok(raw / total)
    } else {
        Ok(0.0)
    }
}

/// Score every nutrient of the model, in model order.
pub fn score_all(
    abundance: &AbundanceVector,
    traits: &TraitTable,
    model: &NutrientModel,
    normalize: bool,
) -> Result<Vec<NutrientScore>> {
    model
        .nutrients()
        .into_iter()
        .map(|nutrient| {
            absorption_score(abundance, nutrient, traits, model, normalize)
                .map(|score| NutrientScore { nutrient, score })
        })
        .collect()
}

/// Sort scores best first.
pub fn ranked(mut scores: Vec<NutrientScore>) -> Vec<NutrientScore> {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrients::NutrientWeights;
    use crate::traits::{GenusPriors, TraitVector};
    use nutribiome_common::{NutribiomeError, Trait};

    fn vector(pairs: &[(&str, f64)]) -> AbundanceVector {
        pairs.iter().map(|(s, a)| (*s, *a)).collect()
    }

    fn table_for(abundance: &AbundanceVector) -> TraitTable {
        TraitTable::with_builtin_priors(abundance.species())
    }

    #[test]
    fn test_raw_iron_score_matches_hand_computation() {
        let ab = vector(&[("faecalibacterium_sp", 0.5), ("escherichia_coli", 0.3)]);
        let traits = table_for(&ab);
        let model = NutrientModel::builtin();

        // faecalibacterium: 0.95*0.4 + 0.9*0.3 + 0.9*0.2 + 0.0*-0.6 = 0.83
        // escherichia:      0.1*0.4  + 0.0*0.3 + 0.1*0.2 + 0.9*-0.6 = -0.48
        let expected = 0.5 * 0.83 + 0.3 * -0.48;
        let raw = absorption_score(&ab, Nutrient::Iron, &traits, &model, false).unwrap();
        assert!((raw - expected).abs() < 1e-12, "raw={}", raw);

        let norm = absorption_score(&ab, Nutrient::Iron, &traits, &model, true).unwrap();
        assert!((norm - expected / 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_siderophore_producer_lowers_normalised_iron_score() {
        let model = NutrientModel::builtin();
        let mixed = vector(&[("faecalibacterium_sp", 0.5), ("escherichia_coli", 0.3)]);
        let pure = vector(&[("faecalibacterium_sp", 0.5)]);

        let mixed_score =
            absorption_score(&mixed, Nutrient::Iron, &table_for(&mixed), &model, true).unwrap();
        let pure_score =
            absorption_score(&pure, Nutrient::Iron, &table_for(&pure), &model, true).unwrap();
        assert!(mixed_score < pure_score, "{} !< {}", mixed_score, pure_score);
    }

    #[test]
    fn test_raw_score_is_linear_in_abundance() {
        let ab = vector(&[
            ("lactobacillus_sp", 0.2),
            ("bacteroides_ovatus", 0.35),
            ("haemophilus_x", 0.05),
            ("mystery_microbe", 0.4),
        ]);
        let traits = table_for(&ab);
        let model = NutrientModel::builtin();
        for nutrient in Nutrient::ALL {
            let base = absorption_score(&ab, nutrient, &traits, &model, false).unwrap();
            for k in [0.5, 2.0, 13.0] {
                let scaled: AbundanceVector =
                    ab.present().map(|(s, a)| (s.to_string(), a * k)).collect();
                let s = absorption_score(&scaled, nutrient, &traits, &model, false).unwrap();
                assert!((s - k * base).abs() < 1e-9, "{} k={}", nutrient, k);
            }
        }
    }

    #[test]
    fn test_zero_and_negative_vectors_score_zero() {
        let ab = vector(&[("lactobacillus_sp", 0.0), ("roseburia_sp", -0.3)]);
        let traits = table_for(&ab);
        let model = NutrientModel::builtin();
        for normalize in [false, true] {
            let s = absorption_score(&ab, Nutrient::Calcium, &traits, &model, normalize).unwrap();
            assert_eq!(s, 0.0);
        }
    }

    #[test]
    fn test_empty_vector_scores_zero() {
        let ab = AbundanceVector::new();
        let s = absorption_score(&ab, Nutrient::Zinc, &TraitTable::default(), &NutrientModel::builtin(), true)
            .unwrap();
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_missing_amounts_and_untracked_species_are_skipped() {
        let mut ab = vector(&[("lactobacillus_sp", 0.5)]);
        ab.insert_missing("roseburia_sp");
        let traits = TraitTable::with_builtin_priors(["lactobacillus_sp", "roseburia_sp"]);
        let model = NutrientModel::builtin();

        let with_gap = absorption_score(&ab, Nutrient::Magnesium, &traits, &model, false).unwrap();
        assert!((with_gap - 0.5 * 0.9 * 0.4).abs() < 1e-12);

        // Species outside the trait table contribute nothing to the numerator.
        ab.insert("unlisted_species", 0.5);
        let raw = absorption_score(&ab, Nutrient::Magnesium, &traits, &model, false).unwrap();
        assert!((raw - with_gap).abs() < 1e-12);
    }

    #[test]
    fn test_normalisation_denominator_counts_every_observed_amount() {
        // The numerator sees only lactobacillus; the denominator also counts the
        // negative entry and the species missing from the trait table.
        let ab = vector(&[
            ("lactobacillus_sp", 0.6),
            ("roseburia_sp", -0.1),
            ("unlisted_species", 0.3),
        ]);
        let traits = TraitTable::with_builtin_priors(["lactobacillus_sp", "roseburia_sp"]);
        let model = NutrientModel::builtin();

        let raw = absorption_score(&ab, Nutrient::Folate, &traits, &model, false).unwrap();
        let norm = absorption_score(&ab, Nutrient::Folate, &traits, &model, true).unwrap();
        assert!((raw - 0.6 * 0.6 * 0.6).abs() < 1e-12);
        assert!((norm - raw / 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_trait_missing_from_vector_contributes_zero() {
        let priors = GenusPriors::new().with("partial", TraitVector::new().with(Trait::Scfa, 1.0));
        let traits = TraitTable::build(["partial_a"], &priors, &TraitVector::default_prior());
        let ab = vector(&[("partial_a", 1.0)]);
        let model = NutrientModel::builtin();
        // Iron also references pH, barrier and siderophore, none of which partial_a carries.
        let s = absorption_score(&ab, Nutrient::Iron, &traits, &model, false).unwrap();
        assert!((s - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_nutrient_fails_fast() {
        let model = NutrientModel::new().with(Nutrient::Iron, NutrientWeights::new());
        let ab = vector(&[("lactobacillus_sp", 1.0)]);
        let err = absorption_score(&ab, Nutrient::Zinc, &table_for(&ab), &model, true).unwrap_err();
        assert!(matches!(err, NutribiomeError::UnknownNutrient(_)));
    }

    #[test]
    fn test_score_all_and_ranked() {
        let ab = vector(&[("bifidobacterium_longum", 1.0)]);
        let traits = table_for(&ab);
        let model = NutrientModel::builtin();
        let scores = score_all(&ab, &traits, &model, true).unwrap();
        assert_eq!(scores.len(), 6);
        assert_eq!(scores[0].nutrient, Nutrient::Iron);

        let ranked = ranked(scores);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        // Bifidobacterium: Iron 0.8*0.4 + 0.7*0.3 + 0.8*0.2 = 0.69 edges out Calcium at 0.68.
        assert_eq!(ranked[0].nutrient, Nutrient::Iron);
        assert_eq!(ranked[1].nutrient, Nutrient::Calcium);
    }
}
