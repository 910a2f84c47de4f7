//! Metrics for evaluating forecast performance
//!
//! These mirror the metrics computed when the bundles are exported, so that
//! values reproduced here compare directly against the persisted
//! `results.json` documents. The forecaster never consumes them at
//! inference time.

use crate::error::{ForecastError, Result};

/// Forecast accuracy metrics for one category.
#[derive(Debug, Clone)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Safe Symmetric Mean Absolute Percentage Error
    pub smape: f64,
    /// Accuracy score derived from SMAPE, weighted for tiny series
    pub accuracy: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:      {:.4}", self.mae)?;
        writeln!(f, "  RMSE:     {:.4}", self.rmse)?;
        writeln!(f, "  SMAPE:    {:.4}%", self.smape)?;
        writeln!(f, "  Accuracy: {:.2}%", self.accuracy)?;
        Ok(())
    }
}

/// SMAPE variant that stays stable near zero: pairs where both magnitudes
/// are below 10 contribute a scaled absolute error instead of a percentage.
pub fn safe_smape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::ValidationError(
            "Actual and predicted values must have the same non-zero length".to_string(),
        ));
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&t, &p)| {
            if t < 10.0 && p < 10.0 {
                (t - p).abs() / 10.0
            } else {
                2.0 * (t - p).abs() / (t.abs() + p.abs() + 1e-8)
            }
        })
        .sum();

    Ok(sum / actual.len() as f64 * 100.0)
}

/// Evaluate a forecast against actual values.
///
/// Accuracy is `100 - SMAPE`, floored at 0; for tiny series (actual mean
/// below 20) the SMAPE penalty is quarter-weighted.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<ForecastAccuracy> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::ValidationError(
            "Actual and predicted values must have the same non-zero length".to_string(),
        ));
    }

    let n = actual.len() as f64;

    let mae = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&t, &p)| (t - p).abs())
        .sum::<f64>()
        / n;

    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&t, &p)| (t - p).powi(2))
        .sum::<f64>()
        / n;
    let rmse = mse.sqrt();

    let smape = safe_smape(actual, predicted)?;

    let mean_actual = actual.iter().sum::<f64>() / n;
    let accuracy = if mean_actual < 20.0 {
        (100.0 - smape * 0.25).max(0.0)
    } else {
        (100.0 - smape).max(0.0)
    };

    Ok(ForecastAccuracy {
        mae,
        rmse,
        smape,
        accuracy,
    })
}
