//! What-if simulation: perturb one species and compare a nutrient score.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    Json,
};
use nutribiome_common::Nutrient;
use nutribiome_scoring::simulation::{Impact, SimulationOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::handlers::overview::{escape, render_page};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub species: String,
    pub nutrient: String,
    pub delta: f64,
}

#[derive(Debug, Deserialize)]
pub struct SimulatePageQuery {
    pub species: Option<String>,
    pub nutrient: Option<String>,
    pub delta: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    #[serde(flatten)]
    pub outcome: SimulationOutcome,
    pub impact: Impact,
    pub percent_label: String,
}

impl From<SimulationOutcome> for SimulateResponse {
    fn from(outcome: SimulationOutcome) -> Self {
        Self {
            impact: outcome.impact(),
            percent_label: outcome.percent_label(),
            outcome,
        }
    }
}

fn run(state: &SharedState, species: &str, nutrient: &str, delta: f64) -> Result<SimulationOutcome, ApiError> {
    if species.trim().is_empty() {
        return Err(ApiError::BadRequest("species must not be empty".to_string()));
    }
    let nutrient: Nutrient = nutrient.parse()?;
    state
        .config
        .simulation
        .validate_delta(delta)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(state.session.simulate(species, nutrient, delta)?)
}

/// POST /api/simulate
pub async fn api_simulate(
    State(state): State<SharedState>,
    Json(req): Json<SimulateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = run(&state, &req.species, &req.nutrient, req.delta)?;
    info!(
        "Simulation {} {:+} on {}: {}",
        outcome.species, outcome.delta, outcome.nutrient, outcome.percent_label()
    );
    Ok(Json(SimulateResponse::from(outcome)))
}

/// GET /simulate?species=&nutrient=&delta=
///
/// Without a species only the form is rendered. Rejected input is shown as
/// an alert above the form rather than a JSON error.
pub async fn simulation_page(
    State(state): State<SharedState>,
    Query(q): Query<SimulatePageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sim = &state.config.simulation;
    let candidates = state.session.simulation_candidates();
    let delta = q.delta.unwrap_or(sim.delta_default);
    let nutrient = q.nutrient.clone().unwrap_or_else(|| Nutrient::Iron.to_string());

    let result_html = match q.species.as_deref() {
        Some(species) => match run(&state, species, &nutrient, delta) {
            Ok(outcome) => render_outcome(&outcome),
            Err(e) => render_error(&e),
        },
        None => String::new(),
    };

    let selected_species = q.species.as_deref().or(candidates.first().map(String::as_str));
    let species_options: String = candidates.iter().map(|s| format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape(s), if Some(s.as_str()) == selected_species { " selected" } else { "" }, escape(s)
    )).collect();
    let nutrient_options: String = state.session.nutrients().iter().map(|n| format!(
        r#"<option value="{}"{}>{}</option>"#,
        n, if n.as_str().eq_ignore_ascii_case(&nutrient) { " selected" } else { "" }, n
    )).collect();

    let body = format!(r#"
    <div class="card">
        <div class="card-header">Perturb one species</div>
        <form method="get" action="/simulate" class="form-row">
            <label>Species<br><select name="species">{}</select></label>
            <label>Nutrient<br><select name="nutrient">{}</select></label>
            <label>Δ abundance<br><input type="number" name="delta" min="{}" max="{}" step="{}" value="{}"></label>
            <button type="submit" class="btn">Run simulation</button>
        </form>
    </div>
    {}"#,
        species_options, nutrient_options,
        sim.delta_min, sim.delta_max, sim.delta_step, delta,
        result_html,
    );

    Ok(Html(render_page(
        "Simulations",
        "Predict the effect of increasing or reducing a single species",
        &body,
    )))
}

fn render_error(err: &ApiError) -> String {
    format!(
        r#"<div class="alert alert-danger">Simulation not run: {}</div>"#,
        escape(&err.to_string())
    )
}

fn render_outcome(o: &SimulationOutcome) -> String {
    let (class, verdict) = match o.impact() {
        Impact::Positive => ("alert-success", "Positive impact on absorption"),
        Impact::Negative => ("alert-danger", "Negative impact on absorption"),
        Impact::NoChange => ("alert-info", "No change in absorption"),
    };
    format!(r#"
    <div class="stats-grid">
        <div class="stat-card"><div class="stat-value">{:.6}</div><div class="stat-label">Baseline {} score</div></div>
        <div class="stat-card"><div class="stat-value">{:.6}</div><div class="stat-label">Simulated score</div></div>
        <div class="stat-card"><div class="stat-value">{:+.6}</div><div class="stat-label">Absolute change</div></div>
        <div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">Percent change</div></div>
    </div>
    <div class="alert {}">{}: {:+} of {}</div>"#,
        o.baseline_score, o.nutrient, o.perturbed_score, o.absolute_change, o.percent_label(),
        class, verdict, o.delta, escape(&o.species),
    )
}
