use axum::body::Body;
use axum::http::{Request, StatusCode};
use emigrant_api::{app, AppState};
use emigrant_forecast::registry::ModelRegistry;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn identity_mlp() -> Value {
    json!({ "layers": [{ "weights": [[0.0, 0.0, 1.0]], "bias": [0.0] }] })
}

fn write_bundle(dir: &Path, best: &str, pack: Value, results: Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("best_model.json"),
        serde_json::to_string(&json!({ "best": best })).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join(format!("{best}.json")),
        serde_json::to_string(&pack).unwrap(),
    )
    .unwrap();
    fs::write(dir.join("results.json"), serde_json::to_string(&results).unwrap()).unwrap();
}

/// Model root and data directory with one small fixture per domain.
fn fixture_state() -> (AppState, TempDir, TempDir) {
    let model_root = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();

    write_bundle(
        &model_root.path().join("models"),
        "mlp2",
        json!({
            "window": 3,
            "categories": ["male", "female"],
            "models": { "male": identity_mlp(), "female": identity_mlp() },
            "scalers": {
                "male": { "data_min": 0.0, "data_max": 2000.0 },
                "female": { "data_min": 0.0, "data_max": 2000.0 },
            }
        }),
        json!({ "best_model": "mlp2", "mlp2": { "avg_accuracy": 91.0 } }),
    );
    write_bundle(
        &model_root.path().join("models_age"),
        "mlp1",
        json!({
            "window": 3,
            "categories": ["0_4"],
            "models": { "0_4": identity_mlp() },
            "scalers": { "0_4": { "data_min": 0.0, "data_max": 100.0 } }
        }),
        json!({ "best_model": "mlp1", "mlp1": { "avg_accuracy": 88.0 } }),
    );
    write_bundle(
        &model_root.path().join("models_education"),
        "mlp3",
        json!({
            "window": 3,
            "categories": ["primary"],
            "models": { "primary": identity_mlp() },
            "scalers": { "primary": { "data_min": 0.0, "data_max": 500.0 } }
        }),
        json!({ "best_model": "mlp3", "mlp3": { "avg_accuracy": 90.0 } }),
    );
    write_bundle(
        &model_root.path().join("models_emigrants"),
        "mlp1",
        json!({
            "window": 3,
            "categories": ["single", "notReported"],
            "clamp_negative": true,
            "tiny_categories": ["notReported"],
            "models": { "single": identity_mlp(), "notReported": identity_mlp() },
            "scalers": {
                "single": { "data_min": 0.0, "data_max": 100.0 },
                "notReported": { "data_min": 0.0, "data_max": 10.0 },
            }
        }),
        json!({ "best": "mlp1", "mlp1": { "avg_accuracy": 86.0 } }),
    );

    fs::write(
        data_dir.path().join("gender_yearly.csv"),
        "year,male,female\n\
         2016,1000,1100\n\
         2017,1200,1250\n\
         2018,1400,1300\n\
         2019,1600,1500\n\
         2020,1800,1700\n",
    )
    .unwrap();
    fs::write(
        data_dir.path().join("age_yearly.csv"),
        "year,ageGroup,count\n\
         2016,0 - 4,40\n\
         2017,0 - 4,45\n\
         2018,0 - 4,50\n\
         2019,0 - 4,55\n\
         2020,0 - 4,60\n",
    )
    .unwrap();
    fs::write(
        data_dir.path().join("education_yearly.csv"),
        "year,primary\n\
         2016,300\n\
         2017,320\n\
         2018,340\n\
         2019,360\n\
         2020,400\n",
    )
    .unwrap();
    fs::write(
        data_dir.path().join("emigrants_marital_status.csv"),
        "year,single,notReported\n\
         2016,50,25\n\
         2017,55,36\n\
         2018,60,49\n\
         2019,70,64\n\
         2020,80,81\n",
    )
    .unwrap();

    let registry = ModelRegistry::load(model_root.path()).unwrap();
    let state = AppState {
        registry: Arc::new(registry),
        data_dir: data_dir.path().to_path_buf(),
    };

    (state, model_root, data_dir)
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
    let response = app(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("alive"));
}

#[tokio::test]
async fn test_predict_gender() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/predict?gender=male").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gender"], json!("male"));
    assert_eq!(body["model_used"], json!("mlp2"));

    // Identity network repeats the newest observation
    let forecast = body["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 10);
    for value in forecast {
        assert_eq!(value.as_f64().unwrap(), 1800.0);
    }

    let years = body["future_years"].as_array().unwrap();
    assert_eq!(years.first().unwrap(), &json!(2021));
    assert_eq!(years.last().unwrap(), &json!(2030));
}

#[tokio::test]
async fn test_predict_unknown_gender() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/predict?gender=other").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_predict_without_selector() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/predict").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("missing gender/group/status"));
}

#[tokio::test]
async fn test_predict_age_group() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/predict?group=0_4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"], json!("0_4"));
    assert_eq!(body["best_model"], json!("mlp1"));
    assert!(body["allModelResults"].is_object());
    assert_eq!(body["forecast"].as_array().unwrap().len(), 10);

    let (status, _) = get(&state, "/predict?group=90_94").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_tiny_marital_status() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/predict?status=notReported").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("notReported"));

    // sqrt-compressed series: newest sqrt value is 9, squared back to 81
    let forecast = body["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 10);
    for value in forecast {
        assert_eq!(value.as_f64().unwrap(), 81.0);
    }

    let years = body["years"].as_array().unwrap();
    assert_eq!(years.first().unwrap(), &json!(2021));
}

#[tokio::test]
async fn test_predict_all_age_groups() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/predict-all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"], json!(["0_4"]));
    assert_eq!(body["best_model"], json!("mlp1"));

    let entry = &body["data"]["0_4"];
    assert_eq!(entry["years"].as_array().unwrap().len(), 10);
    assert_eq!(entry["forecast"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_predict_education() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/predict-education?category=primary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], json!("primary"));
    assert_eq!(body["model_used"], json!("mlp3"));

    let (status, _) = get(&state, "/predict-education").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&state, "/predict-education?category=doctoral").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_education_all() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/predict-education-all").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["results"]["primary"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["year"], json!(2021));
    assert!(rows[0]["predicted"].is_number());
}

#[tokio::test]
async fn test_civil_predict_all() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/civil-predict-all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statuses"], json!(["single", "notReported"]));
    assert_eq!(body["best_model"], json!("mlp1"));

    let single = &body["data"]["single"];
    assert_eq!(single["forecast"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_results_selection() {
    let (state, _models, _data) = fixture_state();

    let (status, body) = get(&state, "/results").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best_model"], json!("mlp2"));

    // The marital results document only carried "best"; the loader
    // backfills "best_model"
    let (status, body) = get(&state, "/results?civil").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best_model"], json!("mlp1"));

    let (_, body) = get(&state, "/results?age").await;
    assert_eq!(body["best_model"], json!("mlp1"));

    let (_, body) = get(&state, "/results?education").await;
    assert_eq!(body["best_model"], json!("mlp3"));
}
