//! Nutrient model: which traits drive absorption of each nutrient, and how strongly.
//!
//! Weights are signed. Siderophore production competes with the host for iron
//! and zinc, so it carries a negative weight for both.

use std::collections::BTreeMap;

use nutribiome_common::{Nutrient, NutribiomeError, Result, Trait};
use serde::{Deserialize, Serialize};

/// Sparse trait → weight map for one nutrient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutrientWeights {
    weights: BTreeMap<Trait, f64>,
}

impl NutrientWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, t: Trait, weight: f64) -> Self {
        self.weights.insert(t, weight);
        self
    }

    pub fn get(&self, t: Trait) -> Option<f64> {
        self.weights.get(&t).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        self.weights.iter().map(|(t, w)| (*t, *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Nutrient → weights. Immutable once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutrientModel {
    nutrients: BTreeMap<Nutrient, NutrientWeights>,
}

impl NutrientModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, nutrient: Nutrient, weights: NutrientWeights) -> Self {
        self.nutrients.insert(nutrient, weights);
        self
    }

    /// Weights for a nutrient, or `UnknownNutrient` if the model has none.
    pub fn weights(&self, nutrient: Nutrient) -> Result<&NutrientWeights> {
        self.nutrients
            .get(&nutrient)
            .ok_or_else(|| NutribiomeError::UnknownNutrient(nutrient.to_string()))
    }

    /// Modelled nutrients in display order.
    pub fn nutrients(&self) -> Vec<Nutrient> {
        self.nutrients.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, &NutrientWeights)> + '_ {
        self.nutrients.iter().map(|(n, w)| (*n, w))
    }

    pub fn len(&self) -> usize {
        self.nutrients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nutrients.is_empty()
    }

    pub fn builtin() -> Self {
        use Trait::*;
        Self::new()
            .with(
                Nutrient::Iron,
                NutrientWeights::new()
                    .with(Scfa, 0.4)
                    .with(PhReduction, 0.3)
                    .with(BarrierSupport, 0.2)
                    .with(Siderophore, -0.6),
            )
            .with(
                Nutrient::VitaminB12,
                NutrientWeights::new()
                    .with(VitaminBiosynthesis, 0.7)
                    .with(BarrierSupport, 0.2),
            )
            .with(Nutrient::Folate, NutrientWeights::new().with(VitaminBiosynthesis, 0.6))
            .with(
                Nutrient::Calcium,
                NutrientWeights::new().with(Scfa, 0.5).with(PhReduction, 0.4),
            )
            .with(Nutrient::Magnesium, NutrientWeights::new().with(Scfa, 0.4))
            .with(
                Nutrient::Zinc,
                NutrientWeights::new()
                    .with(BarrierSupport, 0.4)
                    .with(Siderophore, -0.5),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_models_all_six_nutrients_in_order() {
        let model = NutrientModel::builtin();
        assert_eq!(model.nutrients(), Nutrient::ALL.to_vec());
    }

    #[test]
    fn test_siderophore_penalises_iron_and_zinc() {
        let model = NutrientModel::builtin();
        assert_eq!(model.weights(Nutrient::Iron).unwrap().get(Trait::Siderophore), Some(-0.6));
        assert_eq!(model.weights(Nutrient::Zinc).unwrap().get(Trait::Siderophore), Some(-0.5));
        assert_eq!(model.weights(Nutrient::Folate).unwrap().get(Trait::Siderophore), None);
    }

    #[test]
    fn test_missing_nutrient_is_unknown() {
        let model = NutrientModel::new().with(Nutrient::Iron, NutrientWeights::new());
        let err = model.weights(Nutrient::Zinc).unwrap_err();
        assert!(matches!(err, NutribiomeError::UnknownNutrient(ref n) if n == "Zinc"));
    }
}
