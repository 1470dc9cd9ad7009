use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sales_forecast::models::arima::{is_stationary, Estimation};
use sales_forecast::{ArimaModel, ArimaOrder, ForecastModel, TrainedForecastModel};

/// Integrated AR(1): the first differences follow x_t = phi * x_{t-1} + e_t
fn integrated_ar1(phi: f64, len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();

    let mut level = 100.0;
    let mut diff = 0.0;
    let mut values = Vec::with_capacity(len);
    values.push(level);
    for _ in 1..len {
        diff = phi * diff + noise.sample(&mut rng);
        level += diff;
        values.push(level);
    }
    values
}

#[test]
fn test_recovers_ar_coefficients() {
    let values = integrated_ar1(0.6, 600, 42);
    let model = ArimaModel::new(ArimaOrder::DEFAULT).unwrap();
    let trained = model.train(&values).unwrap();

    let coefficients = trained.coefficients();
    assert_eq!(coefficients.len(), 5);
    assert_eq!(trained.estimation(), Estimation::ConditionalLeastSquares);
    assert_abs_diff_eq!(coefficients[0], 0.6, epsilon = 0.15);
    for &c in &coefficients[1..] {
        assert_abs_diff_eq!(c, 0.0, epsilon = 0.2);
    }
    assert!(is_stationary(coefficients));
    assert!(trained.sigma2() > 0.5 && trained.sigma2() < 1.5);
}

#[test]
fn test_forecast_starts_near_last_value() {
    let values = integrated_ar1(0.3, 200, 9);
    let trained = ArimaModel::new(ArimaOrder::DEFAULT)
        .unwrap()
        .train(&values)
        .unwrap();
    let forecast = trained.forecast(12).unwrap();

    assert_eq!(forecast.len(), 12);
    let last = *values.last().unwrap();
    // one step ahead moves by a damped version of recent changes only
    assert!((forecast[0] - last).abs() < 10.0);
}

#[test]
fn test_trained_name() {
    let trained = ArimaModel::new(ArimaOrder::new(2, 1, 0))
        .unwrap()
        .train(&integrated_ar1(0.5, 50, 1))
        .unwrap();
    assert_eq!(trained.name(), "ARIMA(2,1,0)");
    assert_eq!(trained.order(), ArimaOrder::new(2, 1, 0));
}
