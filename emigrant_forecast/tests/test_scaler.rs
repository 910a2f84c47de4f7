use assert_approx_eq::assert_approx_eq;
use emigrant_forecast::error::ForecastError;
use emigrant_forecast::scaler::MinMaxScaler;

#[test]
fn test_fit_finds_range() {
    let scaler = MinMaxScaler::fit(&[120.0, 80.0, 150.0, 95.0]).unwrap();

    assert_eq!(scaler.data_min(), 80.0);
    assert_eq!(scaler.data_max(), 150.0);
}

#[test]
fn test_transform_maps_range_to_unit_interval() {
    let scaler = MinMaxScaler::fit(&[0.0, 50.0, 100.0]).unwrap();

    assert_approx_eq!(scaler.transform(0.0), 0.0);
    assert_approx_eq!(scaler.transform(50.0), 0.5);
    assert_approx_eq!(scaler.transform(100.0), 1.0);
}

#[test]
fn test_inverse_is_exact() {
    let scaler = MinMaxScaler::fit(&[37.0, 912.0, 488.0]).unwrap();

    for value in [37.0, 100.0, 488.0, 912.0, 1500.0] {
        assert_approx_eq!(scaler.inverse(scaler.transform(value)), value);
    }
}

#[test]
fn test_values_outside_fitted_range_extrapolate() {
    let scaler = MinMaxScaler::fit(&[0.0, 100.0]).unwrap();

    assert_approx_eq!(scaler.transform(200.0), 2.0);
    assert_approx_eq!(scaler.transform(-50.0), -0.5);
    assert_approx_eq!(scaler.inverse(-0.5), -50.0);
}

#[test]
fn test_transform_slice() {
    let scaler = MinMaxScaler::new(0.0, 10.0);

    let scaled = scaler.transform_slice(&[0.0, 5.0, 10.0]);
    assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_fit_empty_series_is_rejected() {
    let result = MinMaxScaler::fit(&[]);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}
