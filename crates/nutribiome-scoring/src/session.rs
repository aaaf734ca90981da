//! One-time scoring setup over a loaded baseline community.
//!
//! The trait table and nutrient model are built once and shared behind `Arc`;
//! every score or simulation request works on its own abundance vector.

use std::sync::Arc;

use nutribiome_common::{AbundanceVector, Nutrient, Result};
use tracing::{debug, info};

use crate::contribution::{species_contributions, SpeciesContribution};
use crate::nutrients::NutrientModel;
use crate::scorer::{absorption_score, ranked, score_all, NutrientScore};
use crate::simulation::{simulate, SimulationOutcome};
use crate::traits::TraitTable;

#[derive(Debug, Clone)]
pub struct ScoringSession {
    baseline: AbundanceVector,
    traits: Arc<TraitTable>,
    model: Arc<NutrientModel>,
}

impl ScoringSession {
    /// Build the trait table for the baseline's species using the builtin priors
    /// and nutrient model.
    pub fn new(baseline: AbundanceVector) -> Self {
        let traits = TraitTable::with_builtin_priors(baseline.species());
        Self::with_parts(baseline, traits, NutrientModel::builtin())
    }

    pub fn with_parts(baseline: AbundanceVector, traits: TraitTable, model: NutrientModel) -> Self {
        let coverage = traits.coverage();
        info!(
            "Scoring session ready: {} species, {:.0}% matched to genus priors, {} nutrients",
            coverage.total,
            coverage.matched_fraction() * 100.0,
            model.len()
        );
        Self {
            baseline,
            traits: Arc::new(traits),
            model: Arc::new(model),
        }
    }

    pub fn baseline(&self) -> &AbundanceVector {
        &self.baseline
    }

    pub fn trait_table(&self) -> &TraitTable {
        &self.traits
    }

    pub fn nutrient_model(&self) -> &NutrientModel {
        &self.model
    }

    pub fn nutrients(&self) -> Vec<Nutrient> {
        self.model.nutrients()
    }

    pub fn score(&self, nutrient: Nutrient, abundance: &AbundanceVector, normalize: bool) -> Result<f64> {
        let score = absorption_score(abundance, nutrient, &self.traits, &self.model, normalize)?;
        debug!("Scored {} (normalize={}): {:.6}", nutrient, normalize, score);
        Ok(score)
    }

    /// Baseline scores for every nutrient, best first.
    pub fn baseline_scores(&self, normalize: bool) -> Result<Vec<NutrientScore>> {
        score_all(&self.baseline, &self.traits, &self.model, normalize).map(ranked)
    }

    pub fn simulate(&self, species: &str, nutrient: Nutrient, delta: f64) -> Result<SimulationOutcome> {
        let outcome = simulate(&self.baseline, species, nutrient, delta, &self.traits, &self.model)?;
        debug!(
            "Simulated {:+} of {} on {}: {:.6} -> {:.6}",
            delta, species, nutrient, outcome.baseline_score, outcome.perturbed_score
        );
        Ok(outcome)
    }

    pub fn contributions(&self, nutrient: Nutrient) -> Result<Vec<SpeciesContribution>> {
        species_contributions(nutrient, &self.traits, &self.model)
    }

    /// Species that can be perturbed from the dashboard, sorted by name.
    pub fn simulation_candidates(&self) -> Vec<String> {
        self.baseline
            .species()
            .filter(|s| self.traits.contains(s))
            .map(str::to_string)
            .collect()
    }
}
