//! Shared dashboard generation pipeline
//!
//! Used by both subcommands of the binary:
//! 1. Computes the six panel tables for a [`ViewContext`]
//! 2. Renders them into one SVG page
//!
//! Several years are rendered as independent pages with the same selections.

use crate::config::DashboardConfig;
use crate::context::{ViewContext, Year};
use crate::data::SalesTable;
use crate::error::Result;
use crate::memprof;
use crate::panels::{
    bubble, category_revenue, heatmap, monthly_revenue, pyramid, rating, DashboardData,
};
use crate::render;
use std::time::Instant;

/// One rendered dashboard page
#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub year: Year,
    pub svg: String,
}

/// Compute every panel table for the selected year
pub fn compute_panels(table: &SalesTable, ctx: &ViewContext) -> Result<DashboardData> {
    let m0 = memprof::checkpoint("compute_panels START");
    let t0 = Instant::now();

    let monthly_revenue = monthly_revenue::compute(table, ctx)?;
    let t = memprof::time_delta("monthly revenue", t0, t0);

    let category_revenue = category_revenue::compute(table, ctx)?;
    let t = memprof::time_delta("category revenue", t0, t);

    let rating = rating::compute(table, ctx)?;
    let t = memprof::time_delta("rating", t0, t);

    let bubbles = bubble::compute(table, ctx)?;
    let t = memprof::time_delta("price/discount bubbles", t0, t);

    let pyramid = pyramid::compute(table, ctx)?;
    let t = memprof::time_delta("demographic pyramid", t0, t);

    let heatmap = heatmap::compute(table, ctx)?;
    memprof::time_delta("heatmap", t0, t);
    memprof::delta("compute_panels END", m0);

    let data = DashboardData {
        monthly_revenue,
        category_revenue,
        rating,
        bubbles,
        pyramid,
        heatmap,
    };

    if data.is_empty() {
        tracing::warn!("No rows for {}, all panels are empty", ctx.year);
    }

    Ok(data)
}

/// Compute and render the page for `ctx.year`
pub fn generate_dashboard(
    table: &SalesTable,
    ctx: &ViewContext,
    config: &DashboardConfig,
) -> Result<DashboardPage> {
    tracing::info!(
        "Generating dashboard for {} (rating by {}, heatmap by {})",
        ctx.year,
        ctx.dimension.label(),
        ctx.granularity.label()
    );

    let data = compute_panels(table, ctx)?;

    let t0 = Instant::now();
    let svg = render::render_dashboard(&data, ctx, config)?;
    memprof::time_delta("render", t0, t0);

    tracing::info!("Rendered {} ({} bytes)", ctx.year, svg.len());
    Ok(DashboardPage {
        year: ctx.year,
        svg,
    })
}

/// Render one page per year, keeping the other selections of `ctx`
pub fn generate_pages(
    table: &SalesTable,
    ctx: &ViewContext,
    config: &DashboardConfig,
    years: &[Year],
) -> Result<Vec<DashboardPage>> {
    tracing::info!("Pages to generate: {}", years.len());
    years
        .iter()
        .map(|&year| generate_dashboard(table, &ctx.for_year(year), config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RatingDimension;
    use crate::data::record::fixtures::record;
    use crate::properties::PropertyReader;

    fn fixture_table() -> SalesTable {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/sales_sample.csv");
        SalesTable::from_csv_path(path).unwrap()
    }

    fn default_config() -> DashboardConfig {
        DashboardConfig::from_properties(&PropertyReader::new()).unwrap()
    }

    fn year(value: i32) -> Year {
        Year::new(value).unwrap()
    }

    #[test]
    fn test_generate_dashboard_captions_year() {
        let table = fixture_table();
        let config = default_config();
        let ctx = ViewContext::new(year(2019));

        let page = generate_dashboard(&table, &ctx, &config).unwrap();
        assert_eq!(page.year, year(2019));
        assert!(page.svg.starts_with("<svg"));
        assert!(page.svg.contains("Sales Revenue Performance by Month in 2019"));
        assert!(page.svg.contains("Seasonal Sales Performance by Categories in 2019"));
        assert!(!page.svg.contains("No data for"));
    }

    /// Text element with exactly this content, as written by the SVG backend
    fn has_text(svg: &str, text: &str) -> bool {
        svg.contains(&format!(">\n{}\n</text>", text))
    }

    #[test]
    fn test_page_draws_axes_and_legends() {
        let table = fixture_table();
        let page =
            generate_dashboard(&table, &ViewContext::new(year(2019)), &default_config()).unwrap();
        let svg = &page.svg;

        // Fixed pyramid ticks, sign dropped
        for label in ["100%", "20%", "15%", "10%", "5%", "0%"] {
            assert!(has_text(svg, label), "missing tick {}", label);
        }
        assert!(has_text(svg, "Demographic in %"));
        assert!(has_text(svg, "Bubble size: Discount(%)"));
        assert!(has_text(svg, "Sales Count"));

        // Age-group legend of the stacked bar
        for age_group in ["18-25", "26-35", "36-45", "56+"] {
            assert!(has_text(svg, age_group), "missing legend {}", age_group);
        }
    }

    #[test]
    fn test_empty_year_renders() {
        let table = SalesTable::from_records(&[record(2019, 1)]).unwrap();
        let ctx = ViewContext::new(year(2021));

        let data = compute_panels(&table, &ctx).unwrap();
        assert!(data.is_empty());

        let page = generate_dashboard(&table, &ctx, &default_config()).unwrap();
        assert!(page.svg.contains("No data for 2021"));
    }

    #[test]
    fn test_generate_pages_per_year() {
        let table = fixture_table();
        let ctx = ViewContext::new(year(2018)).with_dimension(RatingDimension::Material);
        let years: Vec<Year> = Year::all().collect();

        let pages = generate_pages(&table, &ctx, &default_config(), &years).unwrap();
        assert_eq!(pages.len(), 5);
        for (page, expected) in pages.iter().zip(&years) {
            assert_eq!(page.year, *expected);
            assert!(page.svg.contains(&format!("Average Rating by Customer in {}", expected)));
        }
    }

    #[test]
    fn test_compute_panels_exports_json() {
        let table = fixture_table();
        let data = compute_panels(&table, &ViewContext::new(year(2020))).unwrap();
        assert!(!data.is_empty());

        let json = serde_json::to_value(&data).unwrap();
        for key in [
            "monthly_revenue",
            "category_revenue",
            "rating",
            "bubbles",
            "pyramid",
            "heatmap",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
