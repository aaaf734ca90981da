//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::error::not_found;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    overview::{overview_page, api_overview},
    otu::{otu_page, api_species, api_histogram, api_cumulative},
    traits::{traits_page, api_traits, api_top_by_trait},
    nutrients::{nutrients_page, api_nutrients, api_nutrient_scores, api_contributions},
    simulation::{simulation_page, api_simulate},
    about::about_page,
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",          get(overview_page))
        .route("/otu",       get(otu_page))
        .route("/traits",    get(traits_page))
        .route("/nutrients", get(nutrients_page))
        .route("/simulate",  get(simulation_page))
        .route("/about",     get(about_page))

        // API endpoints
        .route("/api/overview",                        get(api_overview))
        .route("/api/species",                         get(api_species))
        .route("/api/abundance/histogram",             get(api_histogram))
        .route("/api/abundance/cumulative",            get(api_cumulative))
        .route("/api/traits",                          get(api_traits))
        .route("/api/traits/top",                      get(api_top_by_trait))
        .route("/api/nutrients",                       get(api_nutrients))
        .route("/api/nutrients/scores",                get(api_nutrient_scores))
        .route("/api/nutrients/{nutrient}/contributions", get(api_contributions))
        .route("/api/simulate",                        post(api_simulate))

        // Static files
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
