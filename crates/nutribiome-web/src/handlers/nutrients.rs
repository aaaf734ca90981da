//! Nutrient absorption: baseline scores and per-species contributions.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
    Json,
};
use nutribiome_common::{Nutrient, Trait};
use nutribiome_scoring::contribution::SpeciesContribution;
use nutribiome_scoring::scorer::NutrientScore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::overview::{escape, progress_bar, render_page};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ScoresQuery {
    pub normalize: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ContributionQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct NutrientPageQuery {
    pub nutrient: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NutrientInfo {
    pub nutrient: Nutrient,
    pub weights: Vec<TraitWeight>,
}

#[derive(Debug, Serialize)]
pub struct TraitWeight {
    #[serde(rename = "trait")]
    pub trait_name: Trait,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct ContributionResponse {
    pub nutrient: Nutrient,
    pub contributors: usize,
    pub top: Vec<SpeciesContribution>,
}

/// GET /api/nutrients
pub async fn api_nutrients(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let list: Vec<NutrientInfo> = state
        .session
        .nutrient_model()
        .iter()
        .map(|(nutrient, weights)| NutrientInfo {
            nutrient,
            weights: weights
                .iter()
                .map(|(t, w)| TraitWeight { trait_name: t, weight: w })
                .collect(),
        })
        .collect();
    Ok(Json(list))
}

/// GET /api/nutrients/scores?normalize=
pub async fn api_nutrient_scores(
    State(state): State<SharedState>,
    Query(q): Query<ScoresQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let scores = state.session.baseline_scores(q.normalize.unwrap_or(true))?;
    Ok(Json(scores))
}

/// GET /api/nutrients/{nutrient}/contributions?limit=
pub async fn api_contributions(
    State(state): State<SharedState>,
    Path(nutrient): Path<String>,
    Query(q): Query<ContributionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let nutrient: Nutrient = nutrient.parse()?;
    let limit = q.limit.unwrap_or(state.config.display.top_contributions);
    let mut all = state.session.contributions(nutrient)?;
    let contributors = all.len();
    all.truncate(limit);
    Ok(Json(ContributionResponse { nutrient, contributors, top: all }))
}

/// GET /nutrients?nutrient=
pub async fn nutrients_page(
    State(state): State<SharedState>,
    Query(q): Query<NutrientPageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let selected: Nutrient = match q.nutrient.as_deref() {
        Some(raw) => raw.parse()?,
        None => Nutrient::Iron,
    };
    let scores = state.session.baseline_scores(true)?;
    let mut contributions = state.session.contributions(selected)?;
    let contributors = contributions.len();
    contributions.truncate(state.config.display.top_contributions);

    let options: String = state.session.nutrients().iter().map(|n| format!(
        r#"<option value="{}"{}>{}</option>"#,
        n, if *n == selected { " selected" } else { "" }, n
    )).collect();

    let body = format!(r#"
    <div class="grid-2">
        <div class="card">
            <div class="card-header">Baseline absorption scores</div>
            <table class="table">
                <thead><tr><th>Nutrient</th><th>Score</th></tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>
        <div class="card">
            <div class="card-header">Top contributing species</div>
            <form method="get" action="/nutrients" class="form-row">
                <select name="nutrient">{}</select>
                <button type="submit" class="btn">Show</button>
            </form>
            <p class="text-muted small">{} species contribute positively to {}.</p>
            <table class="table">
                <thead><tr><th>Species</th><th>Contribution</th></tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>
    </div>"#,
        render_scores(&scores),
        options,
        contributors, selected,
        render_contributions(&contributions),
    );

    Ok(Html(render_page(
        "Nutrient Absorption",
        "Trait-weighted absorption potential of the baseline community",
        &body,
    )))
}

fn render_scores(scores: &[NutrientScore]) -> String {
    let max = scores.iter().map(|s| s.score).fold(0.0_f64, f64::max);
    scores.iter().map(|s| {
        let frac = if max > 0.0 { s.score / max } else { 0.0 };
        format!(
            "<tr><td><a href=\"/nutrients?nutrient={}\">{}</a></td><td>{}<span class=\"small\">{:.4}</span></td></tr>",
            s.nutrient, s.nutrient, progress_bar(frac, "success"), s.score
        )
    }).collect()
}

fn render_contributions(rows: &[SpeciesContribution]) -> String {
    if rows.is_empty() {
        return r#"<tr><td colspan="2" class="text-muted">No species contribute positively.</td></tr>"#.to_string();
    }
    let max = rows[0].contribution;
    rows.iter().map(|r| format!(
        "<tr><td>{}</td><td>{}<span class=\"small\">{:.3}</span></td></tr>",
        escape(&r.species), progress_bar(r.contribution / max, ""), r.contribution
    )).collect()
}
