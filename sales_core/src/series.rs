//! Monthly time series of sales values

use crate::period::YearMonth;
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// A single (period, value) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub period: YearMonth,
    pub value: f64,
}

impl MonthlyPoint {
    pub fn new(period: YearMonth, value: f64) -> Self {
        Self { period, value }
    }
}

/// Chronologically ordered monthly series.
///
/// Periods are strictly increasing but need not be contiguous: a month
/// without observations is absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MonthlyPoint>", into = "Vec<MonthlyPoint>")]
pub struct MonthlySeries {
    points: Vec<MonthlyPoint>,
}

impl MonthlySeries {
    /// An empty series
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a series, checking that periods strictly increase
    pub fn from_points(points: Vec<MonthlyPoint>) -> Result<Self> {
        if let Some(pair) = points.windows(2).find(|w| w[0].period >= w[1].period) {
            return Err(CoreError::UnorderedPeriods {
                previous: pair[0].period,
                next: pair[1].period,
            });
        }
        Ok(Self { points })
    }

    /// Wrap points the caller already holds in strictly increasing order
    pub(crate) fn from_sorted(points: Vec<MonthlyPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].period < w[1].period));
        Self { points }
    }

    /// Values for consecutive months starting at `start`
    pub fn contiguous(start: YearMonth, values: &[f64]) -> Self {
        let points = start
            .range(values.len())
            .zip(values.iter())
            .map(|(period, &value)| MonthlyPoint::new(period, value))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[MonthlyPoint] {
        &self.points
    }

    pub fn periods(&self) -> Vec<YearMonth> {
        self.points.iter().map(|p| p.period).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_period(&self) -> Option<YearMonth> {
        self.points.first().map(|p| p.period)
    }

    pub fn last_period(&self) -> Option<YearMonth> {
        self.points.last().map(|p| p.period)
    }

    /// Value recorded for `period`, if present
    pub fn get(&self, period: YearMonth) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.period.cmp(&period))
            .ok()
            .map(|idx| self.points[idx].value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all values
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthlyPoint> {
        self.points.iter()
    }
}

impl TryFrom<Vec<MonthlyPoint>> for MonthlySeries {
    type Error = CoreError;

    fn try_from(points: Vec<MonthlyPoint>) -> Result<Self> {
        Self::from_points(points)
    }
}

impl From<MonthlySeries> for Vec<MonthlyPoint> {
    fn from(series: MonthlySeries) -> Self {
        series.points
    }
}

impl<'a> IntoIterator for &'a MonthlySeries {
    type Item = &'a MonthlyPoint;
    type IntoIter = std::slice::Iter<'a, MonthlyPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_from_points_rejects_duplicates() {
        let points = vec![
            MonthlyPoint::new(ym(2016, 1), 1.0),
            MonthlyPoint::new(ym(2016, 1), 2.0),
        ];
        assert!(matches!(
            MonthlySeries::from_points(points),
            Err(CoreError::UnorderedPeriods { .. })
        ));
    }

    #[test]
    fn test_from_points_allows_gaps() {
        let points = vec![
            MonthlyPoint::new(ym(2016, 1), 1.0),
            MonthlyPoint::new(ym(2016, 4), 2.0),
        ];
        let series = MonthlySeries::from_points(points).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last_period(), Some(ym(2016, 4)));
        assert_eq!(series.get(ym(2016, 2)), None);
        assert_eq!(series.get(ym(2016, 4)), Some(2.0));
    }

    #[test]
    fn test_contiguous() {
        let series = MonthlySeries::contiguous(ym(2016, 12), &[1.0, 2.0, 3.0]);
        assert_eq!(series.periods(), vec![ym(2016, 12), ym(2017, 1), ym(2017, 2)]);
        assert_eq!(series.total(), 6.0);
    }

    #[test]
    fn test_deserialize_validates_order() {
        let json = r#"[{"period":"2016-02","value":1.0},{"period":"2016-01","value":2.0}]"#;
        assert!(serde_json::from_str::<MonthlySeries>(json).is_err());
    }
}
