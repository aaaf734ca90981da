//! Overview handler: landing page with dataset summary.

use axum::{extract::State, response::{Html, IntoResponse}, Json};
use chrono::{DateTime, Utc};
use nutribiome_otu::stats::{top_species, SpeciesAbundance};
use nutribiome_scoring::traits::TraitCoverage;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::SharedState;

/// Navigation HTML template shared across all pages
pub const NAV_HTML: &str = include_str!("../../templates/nav.html");

/// Minimal HTML escaping for species names and other user-visible text.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap a page body in the shared layout.
pub fn render_page(title: &str, subtitle: &str, body: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{} | Nutribiome</title>
    <link rel="stylesheet" href="/static/css/main.css?v=1.0.0">
</head>
<body>
<div class="app-container">
{}
<main class="main-content">
    <div class="page-header">
        <h1 class="page-title">{}</h1>
        <p class="text-muted">{}</p>
    </div>
{}
    <div class="footer text-muted small">Microbiome nutrient absorption scoring dashboard</div>
</main>
</div>
</body>
</html>"#, title, NAV_HTML, title, subtitle, body)
}

/// Inline progress bar scaled to `fraction` of the track (clamped to 0..=1).
pub fn progress_bar(fraction: f64, class: &str) -> String {
    let pct = (fraction.clamp(0.0, 1.0) * 100.0).round() as u32;
    format!(
        r#"<div class="progress-track"><div class="progress-bar {}" style="width:{}%"></div></div>"#,
        class, pct
    )
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub species_count: usize,
    pub sample_count: usize,
    pub nutrient_count: usize,
    pub top_species: Vec<SpeciesAbundance>,
    pub coverage: TraitCoverage,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

fn build_overview(state: &SharedState) -> Overview {
    Overview {
        species_count: state.species_count(),
        sample_count: state.sample_count,
        nutrient_count: state.session.nutrient_model().len(),
        top_species: top_species(state.session.baseline(), state.config.display.top_species),
        coverage: state.session.trait_table().coverage(),
        source: state.source.clone(),
        loaded_at: state.loaded_at,
    }
}

/// GET /api/overview
pub async fn api_overview(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(build_overview(&state)))
}

/// GET /
pub async fn overview_page(State(state): State<SharedState>) -> Html<String> {
    Html(render_overview(&build_overview(&state)))
}

fn render_overview(o: &Overview) -> String {
    let max = o.top_species.first().map(|r| r.abundance).unwrap_or(0.0);
    let rows: String = if o.top_species.is_empty() {
        r#"<tr><td colspan="3" class="text-muted">No species with observed abundance.</td></tr>"#.to_string()
    } else {
        o.top_species.iter().enumerate().map(|(i, r)| {
            let frac = if max > 0.0 { r.abundance / max } else { 0.0 };
            format!(r#"
            <tr>
                <td>#{}</td>
                <td>{}</td>
                <td>{}<span class="small">{:.6}</span></td>
            </tr>"#, i + 1, escape(&r.species), progress_bar(frac, ""), r.abundance)
        }).collect()
    };

    let body = format!(r#"
    <div class="stats-grid">
        <div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">Species</div></div>
        <div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">Samples</div></div>
        <div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">Nutrients modelled</div></div>
        <div class="stat-card"><div class="stat-value">{:.0}%</div><div class="stat-label">Matched to genus priors</div></div>
        <div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">Default prior</div></div>
    </div>
    <div class="card">
        <div class="card-header">Top {} species by mean abundance</div>
        <table class="table">
            <thead><tr><th>Rank</th><th>Species</th><th>Mean abundance</th></tr></thead>
            <tbody>{}</tbody>
        </table>
    </div>
    <p class="text-muted small">Source: {} · loaded {}</p>"#,
        o.species_count,
        o.sample_count,
        o.nutrient_count,
        o.coverage.matched_fraction() * 100.0,
        o.coverage.defaulted,
        o.top_species.len(),
        rows,
        escape(&o.source),
        o.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    render_page("Overview", "Gut microbiome composition at a glance", &body)
}
