use thiserror::Error;

#[derive(Debug, Error)]
pub enum NutribiomeError {
    /// Input table missing, unreadable, or empty after numeric coercion.
    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("Unknown nutrient: {0}")]
    UnknownNutrient(String),

    #[error("Unknown trait: {0}")]
    UnknownTrait(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NutribiomeError>;
