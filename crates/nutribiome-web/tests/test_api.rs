//! Integration tests for the dashboard HTTP API.
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use nutribiome_common::NutribiomeError;
use nutribiome_otu::OtuTable;
use nutribiome_web::{config::Config, router::build_router, state::AppState};

const TABLE: &str = "species\tS1\tS2\n\
    Lactobacillus_sp\t0.10\t0.30\n\
    Escherichia_coli\t0.20\t0.20\n\
    Prevotella_copri\t0.40\t0.20\n\
    Mystery_taxon\t0.05\tNA\n";

fn app_from(table: &str) -> Router {
    let table = OtuTable::from_reader(table.as_bytes()).expect("test table should parse");
    build_router(AppState::from_table(table, Config::default(), "test"))
}

fn app() -> Router {
    app_from(TABLE)
}

async fn request(app: Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: Router, path: &str) -> (StatusCode, Value) {
    let (status, bytes) = request(app, Method::GET, path, None).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn simulate(app: Router, body: Value) -> (StatusCode, Value) {
    let (status, bytes) = request(app, Method::POST, "/api/simulate", Some(body)).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_overview_reports_dataset_shape() {
    let (status, body) = get_json(app(), "/api/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["species_count"], 4);
    assert_eq!(body["sample_count"], 2);
    assert_eq!(body["nutrient_count"], 6);
    assert_eq!(body["source"], "test");
    assert_eq!(body["top_species"][0]["species"], "Prevotella_copri");
    assert_eq!(body["coverage"]["genus_prior"], 3);
    assert_eq!(body["coverage"]["defaulted"], 1);
}

#[tokio::test]
async fn test_scores_cover_every_nutrient_in_rank_order() {
    let (status, body) = get_json(app(), "/api/nutrients/scores").await;
    assert_eq!(status, StatusCode::OK);
    let scores: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["score"].as_f64().unwrap())
        .collect();
    assert_eq!(scores.len(), 6);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_raw_scores_exceed_normalised_for_small_totals() {
    let (_, raw) = get_json(app(), "/api/nutrients/scores?normalize=false").await;
    let (_, norm) = get_json(app(), "/api/nutrients/scores?normalize=true").await;
    let find = |v: &Value, n: &str| {
        v.as_array().unwrap().iter()
            .find(|s| s["nutrient"] == n)
            .and_then(|s| s["score"].as_f64())
            .unwrap()
    };
    // Total abundance is below 1, so dividing by it inflates the score.
    assert!(find(&norm, "Calcium") > find(&raw, "Calcium"));
}

#[tokio::test]
async fn test_unknown_nutrient_is_bad_request() {
    let (status, body) = get_json(app(), "/api/nutrients/Selenium/contributions").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Selenium"));
}

#[tokio::test]
async fn test_contributions_are_limited_and_sorted() {
    let (status, body) = get_json(app(), "/api/nutrients/Folate/contributions?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contributors"], 4);
    let top = body["top"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["species"], "Lactobacillus_sp");
}

#[tokio::test]
async fn test_top_by_trait_rejects_unknown_trait() {
    let (status, _) = get_json(app(), "/api/traits/top?trait=Motility").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(app(), "/api/traits/top?trait=Siderophore&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["species"], "Escherichia_coli");
}

#[tokio::test]
async fn test_histogram_respects_bins_parameter() {
    let (status, body) = get_json(app(), "/api/abundance/histogram?bins=3").await;
    assert_eq!(status, StatusCode::OK);
    let total: u64 = body.as_array().unwrap().iter().map(|b| b["count"].as_u64().unwrap()).sum();
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(total, 4);
}

#[tokio::test]
async fn test_adding_lactobacillus_raises_b12() {
    let (status, body) = simulate(
        app(),
        json!({ "species": "Lactobacillus_sp", "nutrient": "Vitamin_B12", "delta": 0.5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let baseline = body["baseline_score"].as_f64().unwrap();
    let perturbed = body["perturbed_score"].as_f64().unwrap();
    assert!(perturbed >= baseline);
    assert_eq!(body["impact"], "positive");
}

#[tokio::test]
async fn test_delta_outside_slider_range_is_rejected() {
    let (status, body) = simulate(
        app(),
        json!({ "species": "Lactobacillus_sp", "nutrient": "Iron", "delta": 3.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("outside"));
}

#[tokio::test]
async fn test_zero_baseline_has_no_percent_change() {
    let zeros = "species\tS1\nLactobacillus_sp\t0\nEscherichia_coli\t0\n";
    let (status, body) = simulate(
        app_from(zeros),
        json!({ "species": "Lactobacillus_sp", "nutrient": "Calcium", "delta": 0.1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseline_score"], 0.0);
    assert_eq!(body["percent_change"], Value::Null);
    assert_eq!(body["percent_label"], "N/A");
}

#[tokio::test]
async fn test_pages_render() {
    for path in ["/", "/otu", "/traits", "/nutrients?nutrient=Zinc", "/about", "/simulate"] {
        let (status, bytes) = request(app(), Method::GET, path, None).await;
        assert_eq!(status, StatusCode::OK, "GET {}", path);
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("<nav class=\"sidebar\">"), "GET {} lacks navigation", path);
    }
}

#[tokio::test]
async fn test_simulation_page_shows_result() {
    let path = "/simulate?species=Escherichia_coli&nutrient=Iron&delta=0.1";
    let (status, bytes) = request(app(), Method::GET, path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(bytes).unwrap().contains("Negative impact"));
}

#[tokio::test]
async fn test_unmatched_route_is_json_not_found() {
    let (status, body) = get_json(app(), "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no route for /api/unknown");
}

#[tokio::test]
async fn test_oversized_histogram_request_is_rejected() {
    let path = format!("/api/abundance/histogram?bins={}", usize::MAX);
    let (status, body) = get_json(app(), &path).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bins must be between 1 and 500");

    let (status, body) = get_json(app(), "/api/abundance/histogram?bins=500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_simulation_page_reports_rejected_delta_inline() {
    let path = "/simulate?species=Escherichia_coli&nutrient=Iron&delta=3.0";
    let (status, bytes) = request(app(), Method::GET, path, None).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("alert-danger"));
    assert!(html.contains("outside allowed range"));
    assert!(html.contains("<form method=\"get\" action=\"/simulate\""));
}

#[tokio::test]
async fn test_state_loads_from_table_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("otu.tsv");
    std::fs::write(&path, TABLE).unwrap();

    let mut config = Config::default();
    config.data.path = path.display().to_string();
    let state = AppState::load(config).await.unwrap();
    assert_eq!(state.species_count(), 4);
    assert_eq!(state.sample_count, 2);
    assert_eq!(state.source, path.display().to_string());
}

#[tokio::test]
async fn test_missing_table_file_fails_state_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.data.path = dir.path().join("absent.tsv").display().to_string();
    let err = AppState::load(config).await.err().unwrap();
    assert!(matches!(err, NutribiomeError::DataLoad(ref m) if m.contains("absent.tsv")));
}
