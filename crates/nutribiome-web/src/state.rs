//! Shared application state for the web server.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nutribiome_common::Result;
use nutribiome_otu::OtuTable;
use nutribiome_scoring::ScoringSession;
use tracing::info;

use crate::config::Config;

/// Shared state injected into every Axum handler. Built once at startup and
/// never mutated.
pub struct AppState {
    pub config: Config,
    pub session: ScoringSession,
    pub sample_count: usize,
    /// Where the abundance table came from (file path or a test label)
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    /// Load the configured abundance table and build the scoring session.
    pub async fn load(config: Config) -> Result<Self> {
        let path = config.data.path.clone();
        let table = OtuTable::load(&path).await?;
        Ok(Self::from_table(table, config, path))
    }

    pub fn from_table(table: OtuTable, config: Config, source: impl Into<String>) -> Self {
        let session = ScoringSession::new(table.baseline());
        let state = Self {
            config,
            session,
            sample_count: table.sample_count(),
            source: source.into(),
            loaded_at: Utc::now(),
        };
        info!(
            "Dashboard state ready: {} species, {} samples from {}",
            state.species_count(),
            state.sample_count,
            state.source
        );
        state
    }

    pub fn species_count(&self) -> usize {
        self.session.baseline().len()
    }
}

pub type SharedState = Arc<AppState>;
