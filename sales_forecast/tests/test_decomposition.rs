use approx::assert_relative_eq;
use sales_core::{MonthlyPoint, MonthlySeries, YearMonth};
use sales_forecast::decomposition::{decompose_additive, SEASONAL_PERIOD};
use sales_forecast::{DecompositionError, ForecastError};
use std::f64::consts::PI;

fn trend_plus_sine(months: usize) -> MonthlySeries {
    let values: Vec<f64> = (0..months)
        .map(|t| {
            let t = t as f64;
            100.0 + 2.0 * t + 10.0 * (2.0 * PI * t / 12.0).sin()
        })
        .collect();
    MonthlySeries::contiguous(YearMonth::new(2014, 1).unwrap(), &values)
}

#[test]
fn test_recovers_trend_and_seasonality() {
    let decomposition = decompose_additive(&trend_plus_sine(48), SEASONAL_PERIOD).unwrap();
    assert_eq!(decomposition.len(), 48);
    assert_eq!(decomposition.season_length, 12);

    for (t, point) in decomposition.points.iter().enumerate() {
        let expected_season = 10.0 * (2.0 * PI * t as f64 / 12.0).sin();
        assert_relative_eq!(point.seasonal, expected_season, epsilon = 1e-9);

        if (6..42).contains(&t) {
            assert_relative_eq!(point.trend.unwrap(), 100.0 + 2.0 * t as f64, epsilon = 1e-9);
            assert_relative_eq!(point.residual.unwrap(), 0.0, epsilon = 1e-9);
        } else {
            assert_eq!(point.trend, None);
            assert_eq!(point.residual, None);
        }
    }

    let effects = decomposition.seasonal_effects();
    assert_eq!(effects.len(), 12);
    assert_relative_eq!(effects.iter().sum::<f64>(), 0.0, epsilon = 1e-9);
}

#[test]
fn test_components_add_up_to_observed() {
    let values: Vec<f64> = (0..30).map(|t| 500.0 + ((t * 37) % 23) as f64 * 11.0).collect();
    let series = MonthlySeries::contiguous(YearMonth::new(2015, 4).unwrap(), &values);
    let decomposition = decompose_additive(&series, SEASONAL_PERIOD).unwrap();

    for (point, original) in decomposition.points.iter().zip(series.iter()) {
        assert_eq!(point.period, original.period);
        assert_eq!(point.observed, original.value);
        if let (Some(trend), Some(residual)) = (point.trend, point.residual) {
            assert_relative_eq!(trend + point.seasonal + residual, point.observed, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_keeps_month_labels_across_gaps() {
    let mut points: Vec<MonthlyPoint> = trend_plus_sine(30).points().to_vec();
    points.remove(10);
    let series = MonthlySeries::from_points(points).unwrap();
    let decomposition = decompose_additive(&series, SEASONAL_PERIOD).unwrap();

    assert_eq!(decomposition.len(), 29);
    assert_eq!(decomposition.points[10].period, YearMonth::new(2014, 12).unwrap());
}

#[test]
fn test_needs_two_full_seasons() {
    let err = decompose_additive(&trend_plus_sine(23), SEASONAL_PERIOD).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::Decomposition(DecompositionError::TooShort {
            required: 24,
            actual: 23
        })
    ));
    assert!(decompose_additive(&trend_plus_sine(24), SEASONAL_PERIOD).is_ok());
}

#[test]
fn test_empty_history() {
    assert!(matches!(
        decompose_additive(&MonthlySeries::empty(), SEASONAL_PERIOD),
        Err(ForecastError::Decomposition(DecompositionError::TooShort { actual: 0, .. }))
    ));
}
