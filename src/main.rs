//! Sales Dashboard - Main entry point
//!
//! Loads the sales CSV, applies the selectors given on the command line and
//! either renders the dashboard page(s) to SVG or prints the derived tables
//! as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sales_dashboard::config::DashboardConfig;
use sales_dashboard::context::{HeatmapGranularity, RatingDimension, Year};
use sales_dashboard::data::SalesTable;
use sales_dashboard::pipeline::{self, DashboardPage};
use sales_dashboard::properties::PropertyReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Retail sales performance dashboard
///
/// Examples:
///   sales-dashboard render --data sales.csv --year 2020
///   sales-dashboard render --data sales.csv --all-years --output out/dashboard.svg
///   sales-dashboard tables --data sales.csv --year 2019 --dimension color
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the dashboard page(s) to SVG
    Render {
        #[command(flatten)]
        selection: Selection,

        /// Render one page for every selectable year
        #[arg(long, conflicts_with = "year")]
        all_years: bool,

        /// Output SVG path; with several years, `<stem>_<year>.svg` is written instead
        #[arg(short, long, default_value = "dashboard.svg", value_name = "FILE")]
        output: PathBuf,
    },

    /// Print the six derived tables as JSON
    Tables {
        #[command(flatten)]
        selection: Selection,
    },
}

#[derive(Args, Debug)]
struct Selection {
    /// Sales CSV file
    #[arg(short, long, env = "SALES_DATA", value_name = "CSV")]
    data: PathBuf,

    /// Year of sale (2018-2022)
    #[arg(short, long)]
    year: Option<i32>,

    /// Grouping key of the rating panel: product, color or material
    #[arg(long)]
    dimension: Option<RatingDimension>,

    /// Heatmap columns: month or season
    #[arg(long)]
    granularity: Option<HeatmapGranularity>,

    /// Override a dashboard property (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    properties: Vec<String>,
}

impl Selection {
    /// Property overrides with the dedicated flags taking precedence over `--set`
    fn properties(&self) -> Result<PropertyReader> {
        let mut props = PropertyReader::from_assignments(&self.properties)?;
        if let Some(year) = self.year {
            props = props.with_value("year", &year.to_string());
        }
        if let Some(dimension) = self.dimension {
            props = props.with_value("rating.dimension", dimension.label());
        }
        if let Some(granularity) = self.granularity {
            props = props.with_value("heatmap.granularity", granularity.label());
        }
        Ok(props)
    }

    fn load(&self) -> Result<(SalesTable, DashboardConfig)> {
        let config = DashboardConfig::from_properties(&self.properties()?)
            .context("Invalid dashboard configuration")?;
        let table = SalesTable::from_csv_path(&self.data)
            .with_context(|| format!("Failed to load sales data from {}", self.data.display()))?;
        Ok((table, config))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            selection,
            all_years,
            output,
        } => render(&selection, all_years, &output),
        Command::Tables { selection } => tables(&selection),
    }
}

fn render(selection: &Selection, all_years: bool, output: &Path) -> Result<()> {
    let (table, config) = selection.load()?;
    let ctx = config.view_context();

    let years: Vec<Year> = if all_years {
        Year::all().collect()
    } else {
        vec![ctx.year]
    };

    let pages = pipeline::generate_pages(&table, &ctx, &config, &years)
        .context("Failed to generate dashboard")?;

    let several = pages.len() > 1;
    for page in &pages {
        let path = if several {
            page_path(output, page)
        } else {
            output.to_path_buf()
        };
        write_page(&path, page)?;
    }

    tracing::info!("Wrote {} page(s)", pages.len());
    Ok(())
}

fn tables(selection: &Selection) -> Result<()> {
    let (table, config) = selection.load()?;
    let data = pipeline::compute_panels(&table, &config.view_context())
        .context("Failed to compute dashboard tables")?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

/// `out/dashboard.svg` -> `out/dashboard_2019.svg`
fn page_path(output: &Path, page: &DashboardPage) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dashboard".to_string());
    output.with_file_name(format!("{}_{}.svg", stem, page.year))
}

fn write_page(path: &Path, page: &DashboardPage) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &page.svg)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Page {} written to {}", page.year, path.display());
    Ok(())
}
