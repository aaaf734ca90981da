//! Trait coverage: how species map onto genus priors, and per-trait leaders.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    Json,
};
use nutribiome_common::Trait;
use nutribiome_scoring::traits::{TraitCoverage, TraitSource};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::overview::{escape, progress_bar, render_page};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct TraitQuery {
    #[serde(rename = "trait")]
    pub trait_name: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TraitRow {
    pub species: String,
    pub genus: String,
    pub source: TraitSource,
    /// Values in SCFA, pH_reduction, Barrier_support, Vitamin_Biosynthesis, Siderophore order
    pub values: [f64; 5],
}

#[derive(Debug, Serialize)]
pub struct TraitMatrix {
    pub traits: Vec<Trait>,
    pub coverage: TraitCoverage,
    pub rows: Vec<TraitRow>,
}

#[derive(Debug, Serialize)]
pub struct TopTraitSpecies {
    pub species: String,
    pub value: f64,
}

fn parse_trait(raw: Option<&str>) -> Result<Trait, ApiError> {
    Ok(raw.map(str::parse::<Trait>).transpose()?.unwrap_or(Trait::Scfa))
}

fn trait_matrix(state: &SharedState) -> TraitMatrix {
    let table = state.session.trait_table();
    TraitMatrix {
        traits: Trait::ALL.to_vec(),
        coverage: table.coverage(),
        rows: table
            .iter()
            .map(|(species, entry)| TraitRow {
                species: species.to_string(),
                genus: entry.genus.clone(),
                source: entry.source,
                values: entry.traits.as_array(),
            })
            .collect(),
    }
}

/// GET /api/traits
pub async fn api_traits(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(trait_matrix(&state)))
}

/// GET /api/traits/top?trait=&limit=
pub async fn api_top_by_trait(
    State(state): State<SharedState>,
    Query(q): Query<TraitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let t = parse_trait(q.trait_name.as_deref())?;
    let limit = q.limit.unwrap_or(state.config.display.top_trait_species);
    let top: Vec<TopTraitSpecies> = state
        .session
        .trait_table()
        .top_by_trait(t, limit)
        .into_iter()
        .map(|(species, value)| TopTraitSpecies { species, value })
        .collect();
    Ok(Json(top))
}

/// GET /traits?trait=
pub async fn traits_page(
    State(state): State<SharedState>,
    Query(q): Query<TraitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let selected = parse_trait(q.trait_name.as_deref())?;
    let limit = q.limit.unwrap_or(state.config.display.top_trait_species);
    let matrix = trait_matrix(&state);
    let top = state.session.trait_table().top_by_trait(selected, limit);

    let options: String = Trait::ALL.iter().map(|t| format!(
        r#"<option value="{}"{}>{}</option>"#,
        t, if *t == selected { " selected" } else { "" }, t
    )).collect();

    let top_html: String = top.iter().map(|(species, value)| format!(
        "<tr><td>{}</td><td>{}<span class=\"small\">{:.2}</span></td></tr>",
        escape(species), progress_bar(*value, "success"), value
    )).collect();

    let header: String = matrix.traits.iter().map(|t| format!("<th>{}</th>", t)).collect();
    let matrix_html: String = matrix.rows.iter().map(|r| {
        let cells: String = r.values.iter().map(|v| format!("<td>{:.2}</td>", v)).collect();
        let source = match r.source {
            TraitSource::GenusPrior => "genus prior",
            TraitSource::Default => "default",
        };
        format!(
            "<tr><td>{}</td><td>{}</td><td class=\"small\">{}</td>{}</tr>",
            escape(&r.species), escape(&r.genus), source, cells
        )
    }).collect();

    let c = matrix.coverage;
    let body = format!(r#"
    <div class="stats-grid">
        <div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">Species</div></div>
        <div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">Genus prior</div></div>
        <div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">Default prior</div></div>
        <div class="stat-card"><div class="stat-value">{:.0}%</div><div class="stat-label">Matched</div></div>
    </div>
    <div class="card">
        <div class="card-header">Top {} species by trait</div>
        <form method="get" action="/traits" class="form-row">
            <select name="trait">{}</select>
            <button type="submit" class="btn">Show</button>
        </form>
        <table class="table">
            <thead><tr><th>Species</th><th>{}</th></tr></thead>
            <tbody>{}</tbody>
        </table>
    </div>
    <div class="card">
        <div class="card-header">Trait matrix</div>
        <table class="table">
            <thead><tr><th>Species</th><th>Genus</th><th>Source</th>{}</tr></thead>
            <tbody>{}</tbody>
        </table>
    </div>"#,
        c.total, c.genus_prior, c.defaulted, c.matched_fraction() * 100.0,
        limit, options, selected, top_html,
        header, matrix_html,
    );

    Ok(Html(render_page(
        "Trait Coverage",
        "Functional traits assigned from genus-level literature priors",
        &body,
    )))
}
