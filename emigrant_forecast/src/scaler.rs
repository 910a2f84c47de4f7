//! Min-max normalization state, fitted per category

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Affine min-max normalization fitted once from historical data.
///
/// `transform` maps the fitted range onto `[0, 1]`; `inverse` is its exact
/// inverse. A collapsed fitted range (`data_max == data_min`) makes both
/// directions degenerate and is not guarded against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: f64,
    data_max: f64,
}

impl MinMaxScaler {
    /// Create a scaler from known bounds.
    pub fn new(data_min: f64, data_max: f64) -> Self {
        Self { data_min, data_max }
    }

    /// Fit the scaler to a non-empty slice of observations.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Cannot fit scaler to an empty series".to_string(),
            ));
        }

        let mut data_min = f64::INFINITY;
        let mut data_max = f64::NEG_INFINITY;
        for &v in values {
            data_min = data_min.min(v);
            data_max = data_max.max(v);
        }

        Ok(Self { data_min, data_max })
    }

    /// Normalize a single value into the fitted range.
    pub fn transform(&self, value: f64) -> f64 {
        (value - self.data_min) / (self.data_max - self.data_min)
    }

    /// Normalize a slice of values.
    pub fn transform_slice(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }

    /// Map a normalized value back into the original units.
    pub fn inverse(&self, value: f64) -> f64 {
        value * (self.data_max - self.data_min) + self.data_min
    }

    /// Lower bound of the fitted range.
    pub fn data_min(&self) -> f64 {
        self.data_min
    }

    /// Upper bound of the fitted range.
    pub fn data_max(&self) -> f64 {
        self.data_max
    }
}
