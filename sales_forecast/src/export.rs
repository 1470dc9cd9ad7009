//! Tabular and JSON output of the historical and forecast series

use crate::decomposition::SeasonalDecomposition;
use crate::error::Result;
use crate::forecaster::{ForecastConfig, ForecastSeries};
use crate::pipeline::{RowCounts, SalesReport};
use sales_core::insights::{self, CorrelationMatrix, Dimension, GroupTotal, Kpis, Measure};
use sales_core::{MonthlySeries, YearMonth};
use serde::Serialize;
use std::io::Write;

/// Which series a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Historical,
    Forecast,
}

#[derive(Debug, Serialize)]
struct SeriesRow {
    period: YearMonth,
    kind: SeriesKind,
    sales: f64,
}

/// Write `period,kind,sales` rows, history first
pub fn write_series_csv<W: Write>(
    writer: W,
    history: &MonthlySeries,
    forecast: Option<&ForecastSeries>,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let historical = history.iter().map(|p| (p, SeriesKind::Historical));
    let projected = forecast
        .into_iter()
        .flat_map(|f| f.series.iter().map(|p| (p, SeriesKind::Forecast)));

    for (point, kind) in historical.chain(projected) {
        csv.serialize(SeriesRow {
            period: point.period,
            kind,
            sales: point.value,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Dimensional breakdowns of the filtered transactions
#[derive(Debug, Clone, Serialize)]
pub struct Breakdowns {
    pub sales_by_region: Vec<GroupTotal>,
    pub sales_by_segment: Vec<GroupTotal>,
    pub top_sub_categories_by_sales: Vec<GroupTotal>,
    pub top_sub_categories_by_profit: Vec<GroupTotal>,
}

impl Breakdowns {
    pub fn compute(report: &SalesReport, top: usize) -> Self {
        let records = &report.transactions;
        Self {
            sales_by_region: insights::totals_by(records, Dimension::Region, Measure::Sales),
            sales_by_segment: insights::totals_by(records, Dimension::Segment, Measure::Sales),
            top_sub_categories_by_sales: insights::top_n(
                records,
                Dimension::SubCategory,
                Measure::Sales,
                top,
            ),
            top_sub_categories_by_profit: insights::top_n(
                records,
                Dimension::SubCategory,
                Measure::Profit,
                top,
            ),
        }
    }
}

/// Everything a front end needs to render one report
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub config: ForecastConfig,
    pub rows: RowCounts,
    pub kpis: Kpis,
    pub breakdowns: Breakdowns,
    pub correlations: CorrelationMatrix,
    pub history: MonthlySeries,
    pub forecast: Option<ForecastSeries>,
    /// Present when the forecast could not be produced
    pub forecast_error: Option<String>,
    pub decomposition: Option<SeasonalDecomposition>,
    /// Present when the history is too short to decompose
    pub decomposition_error: Option<String>,
}

impl ReportDocument {
    pub fn new(report: &SalesReport, config: ForecastConfig, top: usize) -> Self {
        let (forecast, forecast_error) = match &report.forecast {
            Ok(f) => (Some(f.clone()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let (decomposition, decomposition_error) = match &report.decomposition {
            Ok(d) => (Some(d.clone()), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            config,
            rows: report.rows,
            kpis: Kpis::compute(&report.transactions),
            breakdowns: Breakdowns::compute(report, top),
            correlations: CorrelationMatrix::compute(&report.transactions),
            history: report.history.clone(),
            forecast,
            forecast_error,
            decomposition,
            decomposition_error,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
