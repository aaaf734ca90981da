//! nutribiome-scoring: Trait assignment and nutrient absorption scoring engine.
//!
//! species → genus → trait prior → weighted nutrient score, plus single-species
//! perturbation simulation over the baseline community.

pub mod genus;
pub mod traits;
pub mod nutrients;
pub mod scorer;
pub mod simulation;
pub mod contribution;
pub mod session;

pub use session::ScoringSession;
