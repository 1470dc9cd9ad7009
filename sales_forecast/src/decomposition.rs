//! Additive seasonal decomposition of the monthly sales series
//!
//! The series is split into `observed = trend + seasonal + residual`. The
//! trend is a centred moving average over one season (a 2×m average when
//! the season length is even), so it is undefined for the first and last
//! half season. Seasonal effects are the mean detrended value at each
//! position within the season, shifted to sum to zero. Positions count from
//! the first observation, so months absent from the history are not
//! skipped over.

use crate::error::{DecompositionError, Result};
use sales_core::{MonthlySeries, YearMonth};
use serde::Serialize;

/// Season length of monthly data
pub const SEASONAL_PERIOD: usize = 12;

/// One month of a decomposed series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecomposedPoint {
    pub period: YearMonth,
    pub observed: f64,
    /// `None` within half a season of either end
    pub trend: Option<f64>,
    pub seasonal: f64,
    /// `None` where the trend is undefined
    pub residual: Option<f64>,
}

/// Trend, seasonal and residual components of a monthly series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalDecomposition {
    pub season_length: usize,
    pub points: Vec<DecomposedPoint>,
}

impl SeasonalDecomposition {
    /// Seasonal effect for each position in the season, first position first
    pub fn seasonal_effects(&self) -> Vec<f64> {
        self.points
            .iter()
            .take(self.season_length)
            .map(|p| p.seasonal)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Decompose `series` additively with the given season length.
///
/// At least two full seasons of observations are required.
pub fn decompose_additive(series: &MonthlySeries, season: usize) -> Result<SeasonalDecomposition> {
    if season < 2 {
        return Err(DecompositionError::InvalidSeason(season).into());
    }
    let values = series.values();
    let required = 2 * season;
    if values.len() < required {
        return Err(DecompositionError::TooShort {
            required,
            actual: values.len(),
        }
        .into());
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(DecompositionError::NonFiniteInput.into());
    }

    let trend = centred_moving_average(&values, season);

    let mut sums = vec![0.0; season];
    let mut counts = vec![0usize; season];
    for (idx, (value, trend)) in values.iter().zip(&trend).enumerate() {
        if let Some(trend) = trend {
            sums[idx % season] += value - trend;
            counts[idx % season] += 1;
        }
    }
    // two full seasons leave every position with at least one defined trend
    let mut effects: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &count)| sum / count.max(1) as f64)
        .collect();
    let mean = effects.iter().sum::<f64>() / season as f64;
    effects.iter_mut().for_each(|e| *e -= mean);

    let points = series
        .iter()
        .zip(trend)
        .enumerate()
        .map(|(idx, (point, trend))| {
            let seasonal = effects[idx % season];
            DecomposedPoint {
                period: point.period,
                observed: point.value,
                trend,
                seasonal,
                residual: trend.map(|t| point.value - t - seasonal),
            }
        })
        .collect();

    Ok(SeasonalDecomposition {
        season_length: season,
        points,
    })
}

/// Centred moving average spanning one season.
///
/// Even seasons use `season + 1` values with half weight on both ends.
fn centred_moving_average(values: &[f64], season: usize) -> Vec<Option<f64>> {
    let half = season / 2;
    let weights: Vec<f64> = if season % 2 == 0 {
        (0..=season)
            .map(|i| if i == 0 || i == season { 0.5 } else { 1.0 })
            .collect()
    } else {
        vec![1.0; season]
    };
    let span = weights.len();

    (0..values.len())
        .map(|idx| {
            if idx < half || idx + span - half > values.len() {
                return None;
            }
            let window = &values[idx - half..idx - half + span];
            let total: f64 = window.iter().zip(&weights).map(|(v, w)| v * w).sum();
            Some(total / season as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moving_average_even_season() {
        let values: Vec<f64> = (0..6).map(|v| v as f64).collect();
        let trend = centred_moving_average(&values, 4);
        assert_eq!(trend[0], None);
        assert_eq!(trend[1], None);
        assert_relative_eq!(trend[2].unwrap(), 2.0);
        assert_relative_eq!(trend[3].unwrap(), 3.0);
        assert_eq!(trend[4], None);
        assert_eq!(trend[5], None);
    }

    #[test]
    fn test_moving_average_odd_season() {
        let trend = centred_moving_average(&[3.0, 6.0, 9.0, 0.0], 3);
        assert_eq!(trend, vec![None, Some(6.0), Some(5.0), None]);
    }

    #[test]
    fn test_invalid_season() {
        let series = MonthlySeries::contiguous(YearMonth::new(2016, 1).unwrap(), &[1.0; 30]);
        assert!(matches!(
            decompose_additive(&series, 1),
            Err(crate::ForecastError::Decomposition(
                DecompositionError::InvalidSeason(1)
            ))
        ));
    }
}
