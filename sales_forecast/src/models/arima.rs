//! ARIMA models for time series forecasting
//!
//! Only the autoregressive family with differencing (q = 0) is supported.
//! Coefficients are estimated by conditional least squares on the
//! differenced series, without a constant term. An estimate outside the
//! stationary region is replaced by the Yule-Walker solution.

use crate::error::{ForecastError, ModelFittingError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Relative cutoff below which singular values are treated as zero
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Partial autocorrelations this close to one count as a unit root
const STATIONARITY_MARGIN: f64 = 1e-8;

/// Model order (p, d, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    /// ARIMA(5,1,0)
    pub const DEFAULT: ArimaOrder = ArimaOrder::new(5, 1, 0);

    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Smallest series length the model can be fitted to.
    ///
    /// After differencing at least one value must follow the first `p`
    /// lags. Underdetermined least squares systems take the minimum-norm
    /// solution.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 1
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

/// How the AR coefficients of a trained model were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Estimation {
    ConditionalLeastSquares,
    YuleWalker,
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ArimaOrder,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    order: ArimaOrder,
    /// AR coefficients, lag 1 first
    coefficients: Vec<f64>,
    estimation: Estimation,
    /// Series after `d` rounds of differencing
    differenced: Vec<f64>,
    /// Last value of each differencing level, original series first
    tails: Vec<f64>,
    /// Innovation variance of the fit
    sigma2: f64,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ArimaOrder) -> Result<Self> {
        if order.q > 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "ARIMA{}: moving-average terms are not supported",
                order
            )));
        }

        Ok(Self {
            name: format!("ARIMA{}", order),
            order,
        })
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self {
            name: format!("ARIMA{}", ArimaOrder::DEFAULT),
            order: ArimaOrder::DEFAULT,
        }
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, values: &[f64]) -> Result<TrainedArimaModel> {
        let required = self.order.min_observations();
        if values.len() < required {
            return Err(ModelFittingError::InsufficientData {
                required,
                actual: values.len(),
            }
            .into());
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ModelFittingError::NonFiniteInput.into());
        }

        let (differenced, tails) = difference(values, self.order.d);
        let p = self.order.p;

        let (coefficients, estimation) = if p == 0 {
            (Vec::new(), Estimation::ConditionalLeastSquares)
        } else {
            let css = conditional_least_squares(&differenced, p)?;
            if is_stationary(&css) {
                (css, Estimation::ConditionalLeastSquares)
            } else {
                debug!(model = %self.name, ?css, "least squares estimate is not stationary, using Yule-Walker");
                (yule_walker(&differenced, p), Estimation::YuleWalker)
            }
        };

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelFittingError::Degenerate(format!(
                "{} produced non-finite coefficients",
                self.name
            ))
            .into());
        }

        let sigma2 = innovation_variance(&differenced, &coefficients);
        debug!(model = %self.name, ?coefficients, sigma2, observations = values.len(), "fitted");

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            coefficients,
            estimation,
            differenced,
            tails,
            sigma2,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let p = self.coefficients.len();
        let start = self.differenced.len().saturating_sub(p);
        let mut history = self.differenced[start..].to_vec();
        let mut steps = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let next: f64 = self
                .coefficients
                .iter()
                .enumerate()
                .map(|(lag, coef)| coef * history[history.len() - 1 - lag])
                .sum();
            history.push(next);
            steps.push(next);
        }

        Ok(integrate(steps, &self.tails))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// AR coefficients, lag 1 first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn estimation(&self) -> Estimation {
        self.estimation
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }
}

/// Difference `d` times, remembering the last value of every level
fn difference(values: &[f64], d: usize) -> (Vec<f64>, Vec<f64>) {
    let mut current = values.to_vec();
    let mut tails = Vec::with_capacity(d);
    for _ in 0..d {
        if let Some(&last) = current.last() {
            tails.push(last);
        }
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    (current, tails)
}

/// Undo differencing by cumulative sums seeded with the stored tails
fn integrate(mut values: Vec<f64>, tails: &[f64]) -> Vec<f64> {
    for &tail in tails.iter().rev() {
        let mut level = tail;
        for value in values.iter_mut() {
            level += *value;
            *value = level;
        }
    }
    values
}

/// Regress each value on its `p` predecessors, no intercept
fn conditional_least_squares(series: &[f64], p: usize) -> Result<Vec<f64>> {
    let rows = series.len() - p;
    let design = DMatrix::from_fn(rows, p, |i, j| series[p + i - 1 - j]);
    let target = DVector::from_iterator(rows, series[p..].iter().copied());

    let svd = design.svd(true, true);
    let eps = (svd.singular_values.max() * SINGULAR_TOLERANCE).max(f64::MIN_POSITIVE);
    let solution = svd
        .solve(&target, eps)
        .map_err(|e| ModelFittingError::Degenerate(e.to_string()))?;

    Ok(solution.iter().copied().collect())
}

/// Yule-Walker estimates via the Levinson-Durbin recursion.
///
/// Autocovariances are taken about zero, matching the no-constant model.
fn yule_walker(series: &[f64], p: usize) -> Vec<f64> {
    let n = series.len() as f64;
    let acov: Vec<f64> = (0..=p)
        .map(|k| {
            series[k.min(series.len())..]
                .iter()
                .zip(series.iter())
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n
        })
        .collect();

    let mut phi = vec![0.0; p];
    if acov[0] <= 0.0 {
        return phi;
    }

    let mut error = acov[0];
    for k in 0..p {
        let mut acc = acov[k + 1];
        for j in 0..k {
            acc -= phi[j] * acov[k - j];
        }
        let kappa = acc / error;

        let previous = phi.clone();
        phi[k] = kappa;
        for j in 0..k {
            phi[j] = previous[j] - kappa * previous[k - 1 - j];
        }

        error *= 1.0 - kappa * kappa;
        if error <= 0.0 {
            break;
        }
    }
    phi
}

/// Whether the AR polynomial has all roots outside the unit circle.
///
/// Runs the Levinson recursion backwards; every partial autocorrelation
/// must stay strictly inside (-1, 1).
pub fn is_stationary(coefficients: &[f64]) -> bool {
    let mut phi = coefficients.to_vec();
    while let Some(&kappa) = phi.last() {
        if !kappa.is_finite() || kappa.abs() >= 1.0 - STATIONARITY_MARGIN {
            return false;
        }
        let k = phi.len();
        let denom = 1.0 - kappa * kappa;
        phi = (0..k - 1)
            .map(|j| (phi[j] + kappa * phi[k - 2 - j]) / denom)
            .collect();
    }
    true
}

fn innovation_variance(series: &[f64], coefficients: &[f64]) -> f64 {
    let p = coefficients.len();
    if series.len() <= p {
        return 0.0;
    }

    let sum_sq: f64 = (p..series.len())
        .map(|t| {
            let fitted: f64 = coefficients
                .iter()
                .enumerate()
                .map(|(lag, coef)| coef * series[t - 1 - lag])
                .sum();
            (series[t] - fitted).powi(2)
        })
        .sum();
    sum_sq / (series.len() - p) as f64
}
