//! Plain text rendering of report sections

use sales_core::insights::GroupTotal;
use sales_core::{CorrelationMatrix, Kpis, MonthlySeries};
use sales_forecast::export::Breakdowns;
use sales_forecast::{RowCounts, SeasonalDecomposition};
use std::io::{self, Write};

/// Format with thousands separators and a fixed number of decimals
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn kpis(out: &mut dyn Write, kpis: &Kpis, rows: &RowCounts) -> io::Result<()> {
    writeln!(out, "== Overview ==")?;
    writeln!(out, "Rows read:     {}", rows.read)?;
    writeln!(out, "Rows dropped:  {}", rows.dropped)?;
    writeln!(out, "Transactions:  {}", kpis.transactions)?;
    writeln!(out, "Total Sales:   ${}", thousands(kpis.total_sales, 0))?;
    writeln!(out, "Total Profit:  ${}", thousands(kpis.total_profit, 0))?;
    match kpis.average_discount {
        Some(d) => writeln!(out, "Avg. Discount: {:.2}%", d * 100.0)?,
        None => writeln!(out, "Avg. Discount: n/a")?,
    }
    writeln!(out)
}

fn group_totals(out: &mut dyn Write, title: &str, totals: &[GroupTotal]) -> io::Result<()> {
    writeln!(out, "== {title} ==")?;
    let width = totals.iter().map(|t| t.group.len()).max().unwrap_or(0);
    for total in totals {
        writeln!(out, "{:<width$}  {:>14}", total.group, thousands(total.total, 2))?;
    }
    writeln!(out)
}

pub fn breakdowns(out: &mut dyn Write, breakdowns: &Breakdowns) -> io::Result<()> {
    group_totals(out, "Sales by Region", &breakdowns.sales_by_region)?;
    group_totals(out, "Sales by Segment", &breakdowns.sales_by_segment)?;
    group_totals(
        out,
        "Top Sub-Categories by Sales",
        &breakdowns.top_sub_categories_by_sales,
    )?;
    group_totals(
        out,
        "Top Sub-Categories by Profit",
        &breakdowns.top_sub_categories_by_profit,
    )
}

pub fn correlations(out: &mut dyn Write, matrix: &CorrelationMatrix) -> io::Result<()> {
    writeln!(out, "== Correlation ==")?;
    write!(out, "{:<10}", "")?;
    for label in &matrix.labels {
        write!(out, "{label:>10}")?;
    }
    writeln!(out)?;

    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        write!(out, "{label:<10}")?;
        for value in row {
            if value.is_nan() {
                write!(out, "{:>10}", "NaN")?;
            } else {
                write!(out, "{value:>10.2}")?;
            }
        }
        writeln!(out)?;
    }
    writeln!(out)
}

pub fn series(out: &mut dyn Write, title: &str, series: &MonthlySeries) -> io::Result<()> {
    writeln!(out, "== {title} ==")?;
    if series.is_empty() {
        writeln!(out, "(no data)")?;
    }
    for point in series {
        writeln!(out, "{}  {:>14}", point.period, thousands(point.value, 2))?;
    }
    writeln!(out)
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| thousands(v, 2))
}

pub fn decomposition(out: &mut dyn Write, decomposition: &SeasonalDecomposition) -> io::Result<()> {
    writeln!(
        out,
        "== Seasonal Decomposition (additive, {} months) ==",
        decomposition.season_length
    )?;
    writeln!(
        out,
        "{:<7}  {:>14}  {:>14}  {:>14}  {:>14}",
        "Period", "Observed", "Trend", "Seasonal", "Residual"
    )?;
    for point in &decomposition.points {
        writeln!(
            out,
            "{}  {:>14}  {:>14}  {:>14}  {:>14}",
            point.period,
            thousands(point.observed, 2),
            optional(point.trend),
            thousands(point.seasonal, 2),
            optional(point.residual)
        )?;
    }
    writeln!(out)
}
