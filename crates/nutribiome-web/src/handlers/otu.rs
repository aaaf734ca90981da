//! OTU analysis: per-species abundance table, distribution and cumulative curve.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    Json,
};
use nutribiome_otu::stats::{cumulative_percent, histogram, species_rows, HistogramBin};
use nutribiome_scoring::genus;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::overview::{escape, progress_bar, render_page};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct HistogramQuery {
    pub bins: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CumulativePoint {
    pub rank: usize,
    pub cumulative_percent: f64,
}

/// GET /api/species
pub async fn api_species(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(species_rows(state.session.baseline(), genus::resolve)))
}

/// GET /api/abundance/histogram?bins=
pub async fn api_histogram(
    State(state): State<SharedState>,
    Query(q): Query<HistogramQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let display = &state.config.display;
    let bins = q.bins.unwrap_or(display.histogram_bins);
    if bins == 0 || bins > display.max_histogram_bins {
        return Err(ApiError::BadRequest(format!(
            "bins must be between 1 and {}",
            display.max_histogram_bins
        )));
    }
    Ok(Json(histogram(state.session.baseline(), bins)))
}

/// GET /api/abundance/cumulative
pub async fn api_cumulative(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let points: Vec<CumulativePoint> = cumulative_percent(state.session.baseline())
        .into_iter()
        .enumerate()
        .map(|(i, p)| CumulativePoint { rank: i + 1, cumulative_percent: p })
        .collect();
    Ok(Json(points))
}

/// GET /otu
pub async fn otu_page(State(state): State<SharedState>) -> Html<String> {
    let baseline = state.session.baseline();
    let rows = species_rows(baseline, genus::resolve);
    let bins = histogram(baseline, state.config.display.histogram_bins);
    let curve = cumulative_percent(baseline);

    let species_html: String = rows.iter().map(|r| format!(
        "<tr><td>{}</td><td>{}</td><td>{:.6}</td></tr>",
        escape(&r.species), escape(&r.genus), r.mean_abundance
    )).collect();

    let body = format!(r#"
    <div class="grid-2">
        <div class="card">
            <div class="card-header">Abundance distribution</div>
            <table class="table">
                <thead><tr><th>Range</th><th>Species</th></tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>
        <div class="card">
            <div class="card-header">Species table ({} species)</div>
            <table class="table">
                <thead><tr><th>Species</th><th>Genus</th><th>Mean abundance</th></tr></thead>
                <tbody>{}</tbody>
            </table>
        </div>
    </div>
    <div class="card">
        <div class="card-header">Cumulative abundance</div>
        {}
    </div>"#,
        render_histogram(&bins),
        rows.len(),
        species_html,
        render_cumulative(&curve),
    );

    Html(render_page("OTU Analysis", "Distribution of mean species abundance across samples", &body))
}

fn render_histogram(bins: &[HistogramBin]) -> String {
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
    if max == 0 {
        return r#"<tr><td colspan="2" class="text-muted">No data.</td></tr>"#.to_string();
    }
    bins.iter()
        .filter(|b| b.count > 0)
        .map(|b| format!(
            "<tr><td class=\"small\">{:.4} – {:.4}</td><td>{}<span class=\"small\">{}</span></td></tr>",
            b.lower, b.upper, progress_bar(b.count as f64 / max as f64, ""), b.count
        ))
        .collect()
}

/// Share of total abundance held by the top 1, 5, 10, 25, 50 and all species.
fn render_cumulative(curve: &[f64]) -> String {
    if curve.is_empty() {
        return r#"<p class="text-muted">No positive abundance to accumulate.</p>"#.to_string();
    }
    let mut marks: Vec<usize> = [1, 5, 10, 25, 50]
        .into_iter()
        .filter(|&k| k < curve.len())
        .collect();
    marks.push(curve.len());

    let rows: String = marks.iter().map(|&k| {
        let pct = curve[k - 1];
        format!(
            "<tr><td>Top {}</td><td>{}<span class=\"small\">{:.1}%</span></td></tr>",
            k, progress_bar(pct / 100.0, "success"), pct
        )
    }).collect();

    format!(
        r#"<table class="table"><thead><tr><th>Species</th><th>Cumulative share</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}
