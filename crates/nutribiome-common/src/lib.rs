//! nutribiome-common: Shared vocabulary and errors used across all Nutribiome crates.

pub mod error;
pub mod entities;
pub mod abundance;

// Re-export commonly used types
pub use abundance::AbundanceVector;
pub use entities::{Nutrient, Trait};
pub use error::{NutribiomeError, Result};
