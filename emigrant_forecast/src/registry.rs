//! Immutable model registry
//!
//! Bundles are loaded once at process start and never mutated afterwards, so
//! they can be shared across request handlers without locking. Every listed
//! category is validated to have a coherent regressor/scaler pair at load
//! time; lookups for registered categories cannot fail later.

use crate::error::{ForecastError, Result};
use crate::forecast::{roll_forecast, TransformPolicy};
use crate::network::{MlpRegressor, MlpSpec};
use crate::scaler::MinMaxScaler;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// A trained regressor with its scaler and output policy for one category.
#[derive(Debug, Clone)]
pub struct CategoryModel {
    regressor: MlpRegressor,
    scaler: MinMaxScaler,
    policy: TransformPolicy,
    window: usize,
}

impl CategoryModel {
    /// Assemble a category model. The regressor's input width must equal
    /// the window size.
    pub fn new(
        regressor: MlpRegressor,
        scaler: MinMaxScaler,
        policy: TransformPolicy,
        window: usize,
    ) -> Result<Self> {
        if regressor.input_width() != window {
            return Err(ForecastError::BundleError(format!(
                "Network expects {} inputs but the bundle window is {}",
                regressor.input_width(),
                window
            )));
        }

        Ok(Self {
            regressor,
            scaler,
            policy,
            window,
        })
    }

    /// Forecast `steps` future points from a raw (un-normalized) historical
    /// series, oldest first. Applies the category's input transform,
    /// normalizes the history, and seeds the rolling window with the last
    /// `window` normalized observations.
    pub fn forecast_from_history(&self, history: &[f64], steps: usize) -> Result<Vec<f64>> {
        if history.len() < self.window {
            return Err(ForecastError::DataError(format!(
                "Series has {} observations but the model needs at least {}",
                history.len(),
                self.window
            )));
        }

        let prepared: Vec<f64> = history.iter().map(|&v| self.policy.pre_transform(v)).collect();
        let scaled = self.scaler.transform_slice(&prepared);
        let seed = &scaled[scaled.len() - self.window..];

        roll_forecast(&self.regressor, &self.scaler, seed, steps, self.policy)
    }

    /// The category's output policy.
    pub fn policy(&self) -> TransformPolicy {
        self.policy
    }

    /// The rolling window size.
    pub fn window(&self) -> usize {
        self.window
    }
}

#[derive(Debug, Deserialize)]
struct BestModelFile {
    best: String,
}

#[derive(Debug, Deserialize)]
struct BundleSpec {
    window: usize,
    categories: Vec<String>,
    /// Clamp negative de-normalized predictions for every category.
    #[serde(default)]
    clamp_negative: bool,
    /// Categories trained on sqrt-compressed series.
    #[serde(default)]
    tiny_categories: Vec<String>,
    models: HashMap<String, MlpSpec>,
    scalers: HashMap<String, MinMaxScaler>,
}

/// One domain's models: the selected architecture's per-category regressors
/// and scalers, plus the training-time evaluation results document.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    best_model: String,
    window: usize,
    categories: Vec<String>,
    models: HashMap<String, CategoryModel>,
    results: Value,
}

impl ModelBundle {
    /// Load a bundle directory: `best_model.json` names the selected
    /// architecture, `<name>.json` holds its pack, `results.json` the
    /// training-time metrics for every architecture.
    pub fn load(dir: &Path) -> Result<Self> {
        let best: BestModelFile = read_json(&dir.join("best_model.json"))?;
        let spec: BundleSpec = read_json(&dir.join(format!("{}.json", best.best)))?;
        let mut results: Value = read_json(&dir.join("results.json"))?;

        // Older results documents carry "best" instead of "best_model".
        if let Some(obj) = results.as_object_mut() {
            if !obj.contains_key("best_model") {
                if let Some(b) = obj.get("best").cloned() {
                    obj.insert("best_model".to_string(), b);
                }
            }
        }

        if spec.window == 0 {
            return Err(ForecastError::BundleError(
                "Bundle window must be positive".to_string(),
            ));
        }
        if spec.categories.is_empty() {
            return Err(ForecastError::BundleError(
                "Bundle lists no categories".to_string(),
            ));
        }
        for tiny in &spec.tiny_categories {
            if !spec.categories.contains(tiny) {
                return Err(ForecastError::BundleError(format!(
                    "Tiny category '{tiny}' is not a listed category"
                )));
            }
        }

        let mut models = HashMap::with_capacity(spec.categories.len());
        for category in &spec.categories {
            let mlp_spec = spec.models.get(category).ok_or_else(|| {
                ForecastError::BundleError(format!("Category '{category}' has no model"))
            })?;
            let scaler = spec.scalers.get(category).copied().ok_or_else(|| {
                ForecastError::BundleError(format!("Category '{category}' has no scaler"))
            })?;

            let tiny = spec.tiny_categories.iter().any(|t| t == category);
            let policy = TransformPolicy {
                clamp_negative: spec.clamp_negative || tiny,
                inverse_sqrt: tiny,
            };

            let regressor = MlpRegressor::from_spec(mlp_spec).map_err(|e| {
                ForecastError::BundleError(format!("Category '{category}': {e}"))
            })?;

            models.insert(
                category.clone(),
                CategoryModel::new(regressor, scaler, policy, spec.window)?,
            );
        }

        Ok(Self {
            best_model: best.best,
            window: spec.window,
            categories: spec.categories,
            models,
            results,
        })
    }

    /// Whether `category` is registered in this bundle.
    pub fn contains(&self, category: &str) -> bool {
        self.models.contains_key(category)
    }

    /// Look up a category's model.
    pub fn category_model(&self, category: &str) -> Result<&CategoryModel> {
        self.models
            .get(category)
            .ok_or_else(|| ForecastError::UnknownCategory(category.to_string()))
    }

    /// Registered categories, in bundle order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Name of the selected architecture.
    pub fn best_model(&self) -> &str {
        &self.best_model
    }

    /// Training-time evaluation results for every architecture.
    pub fn results(&self) -> &Value {
        &self.results
    }

    /// The rolling window size shared by every category in the bundle.
    pub fn window(&self) -> usize {
        self.window
    }
}

/// All four domain bundles, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    gender: ModelBundle,
    age: ModelBundle,
    education: ModelBundle,
    marital: ModelBundle,
}

impl ModelRegistry {
    /// Load every domain bundle from its directory under `root`.
    pub fn load(root: &Path) -> Result<Self> {
        Ok(Self {
            gender: ModelBundle::load(&root.join("models"))?,
            age: ModelBundle::load(&root.join("models_age"))?,
            education: ModelBundle::load(&root.join("models_education"))?,
            marital: ModelBundle::load(&root.join("models_emigrants"))?,
        })
    }

    /// Gender models (`male`, `female`).
    pub fn gender(&self) -> &ModelBundle {
        &self.gender
    }

    /// Age-group models, keyed by canonical group name.
    pub fn age(&self) -> &ModelBundle {
        &self.age
    }

    /// Education-level models.
    pub fn education(&self) -> &ModelBundle {
        &self.education
    }

    /// Marital-status models.
    pub fn marital(&self) -> &ModelBundle {
        &self.marital
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        ForecastError::BundleError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_reader(file)?)
}
