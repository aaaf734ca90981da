//! Configuration loading for Nutribiome.
//! Reads nutribiome.toml from the current directory or path in NUTRIBIOME_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use nutribiome_common::NutribiomeError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Tab-separated species × samples abundance table
    #[serde(default = "default_data_path")]
    pub path: String,
}

fn default_data_path() -> String { "india_species_abundance_clean.tsv".to_string() }

impl Default for DataConfig {
    fn default() -> Self {
        Self { path: default_data_path() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 3001 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_top_species")]
    pub top_species: usize,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    /// Largest `bins` accepted by the histogram API
    #[serde(default = "default_max_histogram_bins")]
    pub max_histogram_bins: usize,
    #[serde(default = "default_top_15")]
    pub top_trait_species: usize,
    #[serde(default = "default_top_15")]
    pub top_contributions: usize,
}

fn default_top_species()    -> usize { 10 }
fn default_histogram_bins() -> usize { 60 }
fn default_max_histogram_bins() -> usize { 500 }
fn default_top_15()         -> usize { 15 }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_species: default_top_species(),
            histogram_bins: default_histogram_bins(),
            max_histogram_bins: default_max_histogram_bins(),
            top_trait_species: default_top_15(),
            top_contributions: default_top_15(),
        }
    }
}

/// Bounds of the Δ abundance slider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_delta_min")]
    pub delta_min: f64,
    #[serde(default = "default_delta_max")]
    pub delta_max: f64,
    #[serde(default = "default_delta_default")]
    pub delta_default: f64,
    #[serde(default = "default_delta_step")]
    pub delta_step: f64,
}

fn default_delta_min()     -> f64 { -0.2 }
fn default_delta_max()     -> f64 { 0.5 }
fn default_delta_default() -> f64 { 0.05 }
fn default_delta_step()    -> f64 { 0.01 }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            delta_min: default_delta_min(),
            delta_max: default_delta_max(),
            delta_default: default_delta_default(),
            delta_step: default_delta_step(),
        }
    }
}

impl SimulationConfig {
    /// Reject a requested delta outside the slider range.
    pub fn validate_delta(&self, delta: f64) -> anyhow::Result<()> {
        if !delta.is_finite() {
            anyhow::bail!("delta must be a finite number");
        }
        if delta < self.delta_min || delta > self.delta_max {
            anyhow::bail!(
                "delta {} outside allowed range [{}, {}]",
                delta, self.delta_min, self.delta_max
            );
        }
        Ok(())
    }
}

mod tests;

impl Config {
    /// Load configuration from nutribiome.toml.
    /// Checks NUTRIBIOME_CONFIG env var first, then current directory.
    /// A missing file falls back to defaults; NUTRIBIOME_DATA overrides `data.path`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("NUTRIBIOME_CONFIG")
            .unwrap_or_else(|_| "nutribiome.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            info!("Loading configuration from {}", path);
            Self::from_file(&path)?
        } else {
            warn!(
                "Config file not found: {} (copy nutribiome.example.toml to customise); using defaults",
                path
            );
            Self::default()
        };

        if let Ok(data_path) = std::env::var("NUTRIBIOME_DATA") {
            config.data.path = data_path;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file without env overrides or validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NutribiomeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, NutribiomeError> {
        toml::from_str(content).map_err(|e| NutribiomeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NutribiomeError> {
        let sim = &self.simulation;
        if !(sim.delta_min <= sim.delta_default && sim.delta_default <= sim.delta_max) {
            return Err(NutribiomeError::Config(format!(
                "simulation.delta_default {} must lie within [{}, {}]",
                sim.delta_default, sim.delta_min, sim.delta_max
            )));
        }
        if sim.delta_step <= 0.0 {
            return Err(NutribiomeError::Config("simulation.delta_step must be positive".to_string()));
        }
        if self.display.histogram_bins == 0 {
            return Err(NutribiomeError::Config("display.histogram_bins must be at least 1".to_string()));
        }
        if self.display.histogram_bins > self.display.max_histogram_bins {
            return Err(NutribiomeError::Config(format!(
                "display.histogram_bins {} exceeds display.max_histogram_bins {}",
                self.display.histogram_bins, self.display.max_histogram_bins
            )));
        }
        Ok(())
    }
}
