//! API route handlers

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use emigrant_forecast::error::ForecastError;
use emigrant_forecast::series;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::AppState;

/// Forecast horizon used by every endpoint.
pub const FORECAST_STEPS: usize = 10;

const GENDER_CSV: &str = "gender_yearly.csv";
const AGE_CSV: &str = "age_yearly.csv";
const EDUCATION_CSV: &str = "education_yearly.csv";
const MARITAL_CSV: &str = "emigrants_marital_status.csv";

/// Error response carrying the HTTP status to answer with.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::UnknownCategory(_) => Self::bad_request(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

fn explanation() -> Value {
    json!({
        "title": "Why this model was selected",
        "points": [
            "It achieved the highest accuracy among tested models.",
            "It produced stable and smooth multi-year forecasts.",
            "It generalized well without overfitting.",
            "It captured long-term migration/emigration trends."
        ]
    })
}

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Unified forecast endpoint, dispatching on which selector parameter is
/// present: `gender`, `group` (age) or `status` (marital).
pub async fn predict(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    if let Some(gender) = params.get("gender") {
        return predict_gender(&state, gender);
    }
    if let Some(group) = params.get("group") {
        return predict_age(&state, group);
    }
    if let Some(status) = params.get("status") {
        return predict_marital(&state, status);
    }
    Err(ApiError::bad_request("missing gender/group/status"))
}

fn predict_gender(state: &AppState, gender: &str) -> ApiResult {
    let bundle = state.registry.gender();
    if !bundle.contains(gender) {
        return Err(ApiError::bad_request("gender must be male or female"));
    }

    let history = series::load_wide_csv(&state.data_dir.join(GENDER_CSV), gender)?;
    let forecast = bundle
        .category_model(gender)?
        .forecast_from_history(history.values(), FORECAST_STEPS)?;

    Ok(Json(json!({
        "gender": gender,
        "future_years": history.future_years(FORECAST_STEPS),
        "forecast": forecast,
        "model_used": bundle.best_model(),
    })))
}

fn predict_age(state: &AppState, group: &str) -> ApiResult {
    let bundle = state.registry.age();
    if !bundle.contains(group) {
        return Err(ApiError::bad_request("invalid age group"));
    }

    let history = series::load_age_group_csv(&state.data_dir.join(AGE_CSV), group)?;
    let forecast = bundle
        .category_model(group)?
        .forecast_from_history(history.values(), FORECAST_STEPS)?;

    Ok(Json(json!({
        "group": group,
        "future_years": history.future_years(FORECAST_STEPS),
        "forecast": forecast,
        "model_used": bundle.best_model(),
        "explanation": explanation(),
        "allModelResults": bundle.results(),
        "best_model": bundle.results()["best_model"],
    })))
}

fn predict_marital(state: &AppState, status: &str) -> ApiResult {
    let bundle = state.registry.marital();
    if !bundle.contains(status) {
        return Err(ApiError::bad_request("invalid status"));
    }

    let history = series::load_wide_csv(&state.data_dir.join(MARITAL_CSV), status)?;
    let forecast = bundle
        .category_model(status)?
        .forecast_from_history(history.values(), FORECAST_STEPS)?;

    Ok(Json(json!({
        "status": status,
        "years": history.future_years(FORECAST_STEPS),
        "forecast": forecast,
        "model_used": bundle.best_model(),
        "explanation": explanation(),
        "allModelResults": bundle.results(),
        "best_model": bundle.results()["best_model"],
    })))
}

/// Forecast every age group.
pub async fn predict_all(State(state): State<AppState>) -> ApiResult {
    let bundle = state.registry.age();
    let groups = series::load_age_groups(&state.data_dir.join(AGE_CSV))?;

    let last_year = groups
        .values()
        .map(|s| s.last_year())
        .max()
        .ok_or_else(|| ApiError::internal("age series file holds no rows"))?;
    let future_years: Vec<i32> = (1..=FORECAST_STEPS as i32)
        .map(|offset| last_year + offset)
        .collect();

    let mut data = Map::new();
    for category in bundle.categories() {
        let history = groups.get(category).ok_or_else(|| {
            ApiError::internal(format!("no rows found for age group '{category}'"))
        })?;
        let forecast = bundle
            .category_model(category)?
            .forecast_from_history(history.values(), FORECAST_STEPS)?;
        data.insert(
            category.clone(),
            json!({ "years": future_years, "forecast": forecast }),
        );
    }

    Ok(Json(json!({
        "groups": bundle.categories(),
        "data": data,
        "best_model": bundle.best_model(),
    })))
}

/// Forecast one education category.
pub async fn predict_education(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    let bundle = state.registry.education();
    let category = params.get("category").map(String::as_str).unwrap_or("");
    if !bundle.contains(category) {
        return Err(ApiError::bad_request("Invalid category"));
    }

    let history = series::load_wide_csv(&state.data_dir.join(EDUCATION_CSV), category)?;
    let forecast = bundle
        .category_model(category)?
        .forecast_from_history(history.values(), FORECAST_STEPS)?;

    Ok(Json(json!({
        "category": category,
        "future_years": history.future_years(FORECAST_STEPS),
        "forecast": forecast,
        "model_used": bundle.best_model(),
    })))
}

/// Forecast every education category.
pub async fn predict_education_all(State(state): State<AppState>) -> ApiResult {
    let bundle = state.registry.education();
    let columns = series::load_wide_columns(
        &state.data_dir.join(EDUCATION_CSV),
        bundle.categories(),
    )?;

    let mut results = Map::new();
    for (category, history) in &columns {
        let forecast = bundle
            .category_model(category)?
            .forecast_from_history(history.values(), FORECAST_STEPS)?;
        let rows: Vec<Value> = history
            .future_years(FORECAST_STEPS)
            .iter()
            .zip(&forecast)
            .map(|(year, predicted)| json!({ "year": year, "predicted": predicted }))
            .collect();
        results.insert(category.clone(), Value::Array(rows));
    }

    Ok(Json(json!({
        "results": results,
        "model_used": bundle.best_model(),
    })))
}

/// Forecast every marital-status category.
pub async fn civil_predict_all(State(state): State<AppState>) -> ApiResult {
    let bundle = state.registry.marital();
    let columns = series::load_wide_columns(
        &state.data_dir.join(MARITAL_CSV),
        bundle.categories(),
    )?;

    let mut data = Map::new();
    for (category, history) in &columns {
        let forecast = bundle
            .category_model(category)?
            .forecast_from_history(history.values(), FORECAST_STEPS)?;
        data.insert(
            category.clone(),
            json!({
                "years": history.future_years(FORECAST_STEPS),
                "forecast": forecast,
            }),
        );
    }

    Ok(Json(json!({
        "statuses": bundle.categories(),
        "data": data,
        "model_used": bundle.best_model(),
        "explanation": explanation(),
        "allModelResults": bundle.results(),
        "best_model": bundle.results()["best_model"],
    })))
}

/// Raw training-time results for one domain, selected by query flag
/// (`civil`, `age`, `education`); defaults to gender.
pub async fn results(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let bundle = if params.contains_key("civil") {
        state.registry.marital()
    } else if params.contains_key("age") {
        state.registry.age()
    } else if params.contains_key("education") {
        state.registry.education()
    } else {
        state.registry.gender()
    };

    Json(bundle.results().clone())
}
