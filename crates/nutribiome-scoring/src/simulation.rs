//! Single-species perturbation ("what if we add/remove some of X?").

use nutribiome_common::{AbundanceVector, Nutrient, Result};
use serde::{Deserialize, Serialize};

use crate::nutrients::NutrientModel;
use crate::scorer::absorption_score;
use crate::traits::TraitTable;

/// Copy of `abundance` with `delta` added to one species, floored at zero.
///
/// An absent (or missing) species is introduced at `max(0, delta)`.
pub fn apply_delta(abundance: &AbundanceVector, species: &str, delta: f64) -> AbundanceVector {
    let mut perturbed = abundance.clone();
    let current = abundance.get(species).unwrap_or(0.0);
    perturbed.insert(species, (current + delta).max(0.0));
    perturbed
}

/// Direction of a simulated change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Positive,
    Negative,
    NoChange,
}

/// Before/after comparison of one perturbation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub species: String,
    pub nutrient: Nutrient,
    pub delta: f64,
    pub baseline_score: f64,
    pub perturbed_score: f64,
    pub absolute_change: f64,
    /// Undefined when the baseline score is exactly zero.
    pub percent_change: Option<f64>,
}

impl SimulationOutcome {
    pub fn impact(&self) -> Impact {
        if self.absolute_change > 0.0 {
            Impact::Positive
        } else if self.absolute_change < 0.0 {
            Impact::Negative
        } else {
            Impact::NoChange
        }
    }

    /// `"+1.5%"`, `"-0.3%"` or `"N/A"`.
    pub fn percent_label(&self) -> String {
        match self.percent_change {
            Some(p) if p.is_finite() => format!("{:+.1}%", p),
            _ => "N/A".to_string(),
        }
    }
}

/// Normalised score of `nutrient` before and after adding `delta` of `species`.
pub fn simulate(
    baseline: &AbundanceVector,
    species: &str,
    nutrient: Nutrient,
    delta: f64,
    traits: &TraitTable,
    model: &NutrientModel,
) -> Result<SimulationOutcome> {
    let baseline_score = absorption_score(baseline, nutrient, traits, model, true)?;
    let perturbed = apply_delta(baseline, species, delta);
    let perturbed_score = absorption_score(&perturbed, nutrient, traits, model, true)?;

    let absolute_change = perturbed_score - baseline_score;
    let percent_change = if baseline_score != 0.0 {
        Some(absolute_change / baseline_score * 100.0)
    } else {
        None
    };

    Ok(SimulationOutcome {
        species: species.to_string(),
        nutrient,
        delta,
        baseline_score,
        perturbed_score,
        absolute_change,
        percent_change,
    })
}
