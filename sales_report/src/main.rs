//! # sales_report
//!
//! Command-line front end for the retail sales pipeline. Both the batch
//! summary and the forecast view run the same shared pipeline.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sales_core::insights::DEFAULT_TOP_N;
use sales_core::CorrelationMatrix;
use sales_core::Kpis;
use sales_forecast::export::{write_series_csv, Breakdowns, ReportDocument};
use sales_forecast::{Pipeline, TransactionFilter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod render;

#[derive(Parser)]
#[command(name = "sales_report")]
#[command(version, about = "Retail sales analysis and forecasting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// KPIs, breakdowns, correlations and monthly trend
    Summary {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Number of sub-categories in the top rankings
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Monthly sales history and the 12 month ARIMA forecast
    Forecast {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ForecastFormat::Text)]
        format: ForecastFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DatasetArgs {
    /// Sales dataset, CSV with a header row
    #[arg(short, long, env = "SALES_DATASET")]
    input: PathBuf,

    /// Keep only this region (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Keep only this segment (repeatable)
    #[arg(long = "segment")]
    segments: Vec<String>,
}

impl DatasetArgs {
    fn filter(&self) -> TransactionFilter {
        let mut filter = TransactionFilter::all();
        if !self.regions.is_empty() {
            filter = filter.with_regions(self.regions.iter().cloned());
        }
        if !self.segments.is_empty() {
            filter = filter.with_segments(self.segments.iter().cloned());
        }
        filter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ForecastFormat {
    Text,
    Csv,
    Json,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_report=info,sales_forecast=info".into()),
        )
        .init();
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn run_summary(
    dataset: &DatasetArgs,
    top: usize,
    format: SummaryFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let pipeline = Pipeline::default();
    let report = pipeline
        .run(&dataset.input, &dataset.filter())
        .with_context(|| format!("Failed to load {}", dataset.input.display()))?;

    if let Err(e) = &report.forecast {
        warn!(error = %e, "summary continues without a forecast");
    }

    let mut out = open_output(output)?;
    match format {
        SummaryFormat::Json => {
            let doc = ReportDocument::new(&report, *pipeline.forecaster().config(), top);
            writeln!(out, "{}", doc.to_json()?)?;
        }
        SummaryFormat::Text => {
            let kpis = Kpis::compute(&report.transactions);
            let breakdowns = Breakdowns::compute(&report, top);
            let correlations = CorrelationMatrix::compute(&report.transactions);
            render::kpis(&mut out, &kpis, &report.rows)?;
            render::breakdowns(&mut out, &breakdowns)?;
            render::correlations(&mut out, &correlations)?;
            render::series(&mut out, "Monthly Sales Trend", &report.history)?;
            if let Some(forecast) = report.forecast() {
                render::series(&mut out, &format!("Forecast ({})", forecast.model), &forecast.series)?;
            }
        }
    }
    out.flush()?;

    info!(transactions = report.transactions.len(), "summary written");
    Ok(())
}

fn run_forecast(dataset: &DatasetArgs, format: ForecastFormat, output: Option<&PathBuf>) -> Result<()> {
    let pipeline = Pipeline::default();
    let report = pipeline
        .run(&dataset.input, &dataset.filter())
        .with_context(|| format!("Failed to load {}", dataset.input.display()))?;

    let mut out = open_output(output)?;
    match format {
        ForecastFormat::Text => {
            render::series(&mut out, "Historical Sales", &report.history)?;
            match &report.decomposition {
                Ok(decomposition) => render::decomposition(&mut out, decomposition)?,
                Err(e) => writeln!(out, "== Seasonal Decomposition ==\n({e})\n")?,
            }
            if let Some(forecast) = report.forecast() {
                render::series(&mut out, &format!("Forecasted Sales ({})", forecast.model), &forecast.series)?;
            }
        }
        ForecastFormat::Csv => write_series_csv(&mut out, &report.history, report.forecast())?,
        ForecastFormat::Json => {
            let doc = ReportDocument::new(&report, *pipeline.forecaster().config(), DEFAULT_TOP_N);
            writeln!(out, "{}", doc.to_json()?)?;
        }
    }
    out.flush()?;

    report
        .forecast
        .map(|_| ())
        .context("History was written but no forecast could be produced")
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Summary {
            dataset,
            top,
            format,
            output,
        } => run_summary(dataset, *top, *format, output.as_ref()),
        Commands::Forecast {
            dataset,
            format,
            output,
        } => run_forecast(dataset, *format, output.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeated_filters() {
        let cli = Cli::try_parse_from([
            "sales_report",
            "forecast",
            "--input",
            "data.csv",
            "--region",
            "West",
            "--region",
            "East",
            "--format",
            "csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Forecast { dataset, format, .. } => {
                assert_eq!(dataset.regions, vec!["West", "East"]);
                assert_eq!(format, ForecastFormat::Csv);
                let filter = dataset.filter();
                assert_eq!(filter.regions, Some(vec!["West".to_string(), "East".to_string()]));
                assert_eq!(filter.segments, None);
            }
            _ => panic!("Expected forecast command"),
        }
    }

    #[test]
    fn test_summary_rejects_csv_format() {
        let result = Cli::try_parse_from([
            "sales_report",
            "summary",
            "--input",
            "data.csv",
            "--format",
            "csv",
            "--output",
            "report.csv",
        ]);
        let err = result.err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
