//! Iterative multi-step forecasting
//!
//! Produces N future points from a one-step-ahead regressor by repeatedly
//! predicting the next normalized value, appending it to a rolling window,
//! and un-transforming only for output. The whole autoregression runs in
//! normalized (and, for compressed categories, square-root) space; clamping
//! and square reversal apply to the emitted values only.

use crate::error::{ForecastError, Result};
use crate::scaler::MinMaxScaler;
use serde::{Deserialize, Serialize};

/// One-step-ahead prediction over a fixed-size normalized window.
pub trait OneStepRegressor {
    /// Predict the next normalized value from the given window,
    /// ordered oldest to newest.
    fn predict_next(&self, window: &[f64]) -> Result<f64>;
}

/// Category-specific output handling.
///
/// Small, noisy categories are trained on square-root-compressed series;
/// for those the forecaster squares each emitted value and clamps negatives
/// to zero both before and after squaring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformPolicy {
    /// Replace negative de-normalized predictions with 0.
    pub clamp_negative: bool,
    /// Square each emitted value (reversing the sqrt applied at training).
    pub inverse_sqrt: bool,
}

impl TransformPolicy {
    /// No clamping, no transform reversal.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Non-negativity clamp only.
    pub fn clamped() -> Self {
        Self {
            clamp_negative: true,
            inverse_sqrt: false,
        }
    }

    /// Sqrt-compressed series: clamp, square, clamp.
    pub fn sqrt_compressed() -> Self {
        Self {
            clamp_negative: true,
            inverse_sqrt: true,
        }
    }

    /// Input-side counterpart of the output handling: series for
    /// sqrt-compressed categories are square-rooted before normalization.
    pub fn pre_transform(&self, value: f64) -> f64 {
        if self.inverse_sqrt {
            value.sqrt()
        } else {
            value
        }
    }
}

/// Forecast `steps` future points from a seed window of the most recent
/// normalized observations, ordered oldest to newest.
///
/// Each step feeds the last `seed_window.len()` entries of the rolling
/// history to the regressor, de-normalizes the prediction for output, and
/// appends the raw normalized prediction back onto the history. The window
/// always advances on the unclamped normalized value, so output-side
/// corrections never feed back into the autoregressive state.
///
/// Returns exactly `steps` values in the units of the original series,
/// each >= 0 when the policy clamps.
pub fn roll_forecast<M: OneStepRegressor + ?Sized>(
    model: &M,
    scaler: &MinMaxScaler,
    seed_window: &[f64],
    steps: usize,
    policy: TransformPolicy,
) -> Result<Vec<f64>> {
    if steps == 0 {
        return Err(ForecastError::ValidationError(
            "Forecast steps must be positive".to_string(),
        ));
    }
    if seed_window.is_empty() {
        return Err(ForecastError::ValidationError(
            "Seed window must not be empty".to_string(),
        ));
    }

    let window = seed_window.len();
    let mut history = seed_window.to_vec();
    let mut forecast = Vec::with_capacity(steps);

    for _ in 0..steps {
        let tail = &history[history.len() - window..];
        let predicted_scaled = model.predict_next(tail)?;

        let mut predicted = scaler.inverse(predicted_scaled);
        if policy.clamp_negative {
            predicted = predicted.max(0.0);
        }
        if policy.inverse_sqrt {
            predicted = predicted * predicted;
        }
        if policy.clamp_negative {
            predicted = predicted.max(0.0);
        }

        forecast.push(predicted);
        history.push(predicted_scaled);
    }

    Ok(forecast)
}
