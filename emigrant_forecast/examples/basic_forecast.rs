use emigrant_forecast::forecast::TransformPolicy;
use emigrant_forecast::network::{LayerSpec, MlpRegressor, MlpSpec};
use emigrant_forecast::registry::CategoryModel;
use emigrant_forecast::scaler::MinMaxScaler;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Emigrant Forecast: Basic Forecasting Example");
    println!("============================================\n");

    // Yearly emigrant counts for one category
    let history = vec![
        12400.0, 13100.0, 12950.0, 13600.0, 14200.0, 14800.0, 15100.0, 15900.0,
    ];
    println!("Historical series: {} observations", history.len());

    // A scaler fitted over the history, as the exported bundles carry it
    let scaler = MinMaxScaler::fit(&history)?;
    println!(
        "Fitted scaler range: [{:.0}, {:.0}]\n",
        scaler.data_min(),
        scaler.data_max()
    );

    // A hand-built network standing in for a trained bundle: one hidden
    // layer, three inputs (the rolling window), single output unit.
    let spec = MlpSpec {
        layers: vec![
            LayerSpec {
                weights: vec![
                    vec![0.2, 0.3, 0.5],
                    vec![0.1, 0.4, 0.4],
                    vec![0.3, 0.3, 0.3],
                ],
                bias: vec![0.02, 0.01, 0.0],
            },
            LayerSpec {
                weights: vec![vec![0.4, 0.4, 0.25]],
                bias: vec![0.01],
            },
        ],
    };
    let regressor = MlpRegressor::from_spec(&spec)?;
    println!(
        "Network ready: window size {}",
        regressor.input_width()
    );

    let model = CategoryModel::new(regressor, scaler, TransformPolicy::clamped(), 3)?;

    // Forecast ten years ahead
    let forecast = model.forecast_from_history(&history, 10)?;

    println!("\nTen-year forecast:");
    for (offset, value) in forecast.iter().enumerate() {
        println!("  year +{}: {:.0}", offset + 1, value);
    }

    println!("\nForecasting complete!");
    Ok(())
}
