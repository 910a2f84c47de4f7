//! # emigrant_api
//!
//! HTTP API serving demographic emigration forecasts from the
//! `emigrant_forecast` model bundles. All endpoints are GET and return JSON;
//! the model registry is loaded once at startup and shared read-only across
//! requests.

use axum::{routing::get, Router};
use emigrant_forecast::registry::ModelRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub data_dir: PathBuf,
}

/// Build the router with CORS and tracing middleware.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/predict", get(routes::predict))
        .route("/predict-all", get(routes::predict_all))
        .route("/predict-education", get(routes::predict_education))
        .route("/predict-education-all", get(routes::predict_education_all))
        .route("/civil-predict-all", get(routes::civil_predict_all))
        .route("/results", get(routes::results))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
