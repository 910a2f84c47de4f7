//! # Emigrant Forecast
//!
//! A Rust library for forecasting demographic emigration statistics with
//! small per-category neural networks.
//!
//! ## Features
//!
//! - Yearly series loading from the national-statistics CSV layouts
//! - Min-max normalization with exact inversion
//! - Feed-forward regressor inference (dense layers, ReLU hidden units)
//! - Iterative multi-step forecasting with category-specific post-processing
//! - Model bundle loading (best-model selection, per-architecture packs,
//!   training-time evaluation results)
//!
//! ## Quick Start
//!
//! ```no_run
//! use emigrant_forecast::registry::ModelRegistry;
//! use emigrant_forecast::series;
//!
//! # fn run() -> emigrant_forecast::Result<()> {
//! // Load all model bundles once at startup
//! let registry = ModelRegistry::load("public".as_ref())?;
//!
//! // Load the historical series for one category
//! let history = series::load_wide_csv("gender_yearly.csv".as_ref(), "male")?;
//!
//! // Forecast ten years ahead
//! let model = registry.gender().category_model("male")?;
//! let forecast = model.forecast_from_history(history.values(), 10)?;
//!
//! for (year, value) in history.future_years(10).iter().zip(&forecast) {
//!     println!("{year}: {value:.0}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod forecast;
pub mod metrics;
pub mod network;
pub mod registry;
pub mod scaler;
pub mod series;

// Re-export commonly used types
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{roll_forecast, OneStepRegressor, TransformPolicy};
pub use crate::network::MlpRegressor;
pub use crate::registry::{CategoryModel, ModelBundle, ModelRegistry};
pub use crate::scaler::MinMaxScaler;
pub use crate::series::YearlySeries;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
