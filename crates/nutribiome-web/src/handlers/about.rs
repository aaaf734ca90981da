//! Static description of the scoring model.

use axum::{extract::State, response::Html};
use nutribiome_common::Trait;

use crate::handlers::overview::render_page;
use crate::state::SharedState;

/// GET /about
pub async fn about_page(State(state): State<SharedState>) -> Html<String> {
    let model = state.session.nutrient_model();
    let header: String = Trait::ALL.iter().map(|t| format!("<th>{}</th>", t)).collect();
    let rows: String = model.iter().map(|(n, weights)| {
        let cells: String = Trait::ALL.iter().map(|t| match weights.get(*t) {
            Some(w) => format!("<td>{:+.1}</td>", w),
            None => "<td class=\"text-muted\">·</td>".to_string(),
        }).collect();
        format!("<tr><td>{}</td>{}</tr>", n, cells)
    }).collect();

    let body = format!(r#"
    <div class="card">
        <div class="card-header">How scores are computed</div>
        <p>Each species is given a functional trait vector from the literature prior of its genus
        (the part of the species name before the first underscore). Species of uncharacterised
        genera receive a uniform default prior.</p>
        <p>The absorption score of a nutrient sums abundance × trait value × nutrient weight over
        every species present. The normalised score divides by the total abundance of the sample.</p>
        <p>Simulations add a change in abundance to one species (never dropping below zero) and
        compare the normalised score before and after.</p>
        <p>Co-occurrence between species can be explored with Spearman rank correlation of
        per-sample abundances; this dashboard does not compute correlation networks.</p>
    </div>
    <div class="card">
        <div class="card-header">Nutrient weights</div>
        <table class="table">
            <thead><tr><th>Nutrient</th>{}</tr></thead>
            <tbody>{}</tbody>
        </table>
    </div>
    <div class="alert alert-info">Scores are relative indicators for exploration, not clinical measurements.</div>"#,
        header, rows,
    );

    Html(render_page("About", "Model assumptions and nutrient weights", &body))
}
