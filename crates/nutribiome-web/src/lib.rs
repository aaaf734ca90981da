//! nutribiome-web: Dashboard and JSON API over the absorption scoring engine.
//! Provides:
//!   - Community overview (species, samples, top taxa)
//!   - Abundance distribution and species table
//!   - Trait coverage diagnostics
//!   - Baseline nutrient absorption scores and per-species contributions
//!   - Single-species perturbation simulator

pub mod config;
pub mod error;
pub mod router;
pub mod handlers;
pub mod state;
