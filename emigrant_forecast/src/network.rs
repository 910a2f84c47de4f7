//! Feed-forward regressor inference
//!
//! Networks are trained elsewhere; this module only evaluates persisted
//! weights. Hidden layers use ReLU activations, the output layer is a single
//! identity unit, matching the architecture the bundles are exported from.

use crate::error::{ForecastError, Result};
use crate::forecast::OneStepRegressor;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Persisted form of a single dense layer.
///
/// `weights[i]` holds the incoming weights of output unit `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Persisted form of a whole regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpSpec {
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: DMatrix<f64>,
    bias: DVector<f64>,
}

/// One-step-ahead neural regressor over a fixed-size normalized window.
#[derive(Debug, Clone)]
pub struct MlpRegressor {
    layers: Vec<DenseLayer>,
}

impl MlpRegressor {
    /// Build a regressor from its persisted spec, validating the whole
    /// dimension chain up front so inference cannot fail on shape.
    pub fn from_spec(spec: &MlpSpec) -> Result<Self> {
        if spec.layers.is_empty() {
            return Err(ForecastError::BundleError(
                "Network has no layers".to_string(),
            ));
        }

        let mut layers = Vec::with_capacity(spec.layers.len());
        let mut prev_width: Option<usize> = None;

        for (idx, layer) in spec.layers.iter().enumerate() {
            let rows = layer.weights.len();
            if rows == 0 {
                return Err(ForecastError::BundleError(format!(
                    "Layer {idx} has no output units"
                )));
            }

            let cols = layer.weights[0].len();
            if cols == 0 || layer.weights.iter().any(|row| row.len() != cols) {
                return Err(ForecastError::BundleError(format!(
                    "Layer {idx} has ragged or empty weight rows"
                )));
            }

            if layer.bias.len() != rows {
                return Err(ForecastError::BundleError(format!(
                    "Layer {idx} bias length {} does not match {} output units",
                    layer.bias.len(),
                    rows
                )));
            }

            if let Some(width) = prev_width {
                if cols != width {
                    return Err(ForecastError::BundleError(format!(
                        "Layer {idx} expects {cols} inputs but the previous layer produces {width}"
                    )));
                }
            }
            prev_width = Some(rows);

            layers.push(DenseLayer {
                weights: DMatrix::from_row_iterator(
                    rows,
                    cols,
                    layer.weights.iter().flatten().copied(),
                ),
                bias: DVector::from_column_slice(&layer.bias),
            });
        }

        if prev_width != Some(1) {
            return Err(ForecastError::BundleError(format!(
                "Network output width is {}, expected a single regression unit",
                prev_width.unwrap_or(0)
            )));
        }

        Ok(Self { layers })
    }

    /// Number of inputs the first layer expects, i.e. the window size.
    pub fn input_width(&self) -> usize {
        self.layers[0].weights.ncols()
    }

    /// Evaluate the network on one normalized window.
    pub fn predict(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.input_width() {
            return Err(ForecastError::ValidationError(format!(
                "Window has {} values but the network expects {}",
                window.len(),
                self.input_width()
            )));
        }

        let last = self.layers.len() - 1;
        let mut activations = DVector::from_column_slice(window);

        for (idx, layer) in self.layers.iter().enumerate() {
            activations = &layer.weights * activations + &layer.bias;
            if idx < last {
                activations.apply(|v| *v = v.max(0.0));
            }
        }

        Ok(activations[0])
    }
}

impl OneStepRegressor for MlpRegressor {
    fn predict_next(&self, window: &[f64]) -> Result<f64> {
        self.predict(window)
    }
}
