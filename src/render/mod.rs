//! Dashboard page rendering
//!
//! Lays the six panels out in a fixed 2×3 grid under the page title and draws
//! them to an SVG document.
//!
//! Structure:
//! - `charts.rs`: One plotters drawing function per panel
//! - `palettes.rs`: Embedded palette registry

pub mod charts;
pub mod palettes;

use crate::config::DashboardConfig;
use crate::context::ViewContext;
use crate::error::{DashboardError, Result};
use crate::panels::DashboardData;
use charts::{Area, DrawResult};
use palettes::{
    PaletteKind, DEFAULT_CATEGORICAL_PALETTE, DEFAULT_SEQUENTIAL_PALETTE, PALETTE_REGISTRY,
};
use plotters::prelude::*;

/// Render one dashboard page to an SVG string
pub fn render_dashboard(
    data: &DashboardData,
    ctx: &ViewContext,
    config: &DashboardConfig,
) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.plot_width, config.plot_height))
            .into_drawing_area();
        draw_page(&root, data, ctx, config).map_err(|e| DashboardError::Render(e.to_string()))?;
        root.present()
            .map_err(|e| DashboardError::Render(e.to_string()))?;
    }
    Ok(svg)
}

/// Grid order: line, stacked bar, scatter on top; bubble, pyramid, heatmap below
fn draw_page(
    root: &Area,
    data: &DashboardData,
    ctx: &ViewContext,
    config: &DashboardConfig,
) -> DrawResult<()> {
    let categorical = PALETTE_REGISTRY.resolve(
        &config.categorical_palette,
        PaletteKind::Categorical,
        DEFAULT_CATEGORICAL_PALETTE,
    )?;
    let sequential = PALETTE_REGISTRY.resolve(
        &config.sequential_palette,
        PaletteKind::Sequential,
        DEFAULT_SEQUENTIAL_PALETTE,
    )?;

    root.fill(&WHITE)?;
    let body = root.titled(&config.title, ("sans-serif", 28))?;

    let cells = body.split_evenly((2, 3));
    let year = ctx.year;

    charts::draw_monthly_revenue(&cells[0], &data.monthly_revenue, year, categorical)?;
    charts::draw_category_revenue(&cells[1], &data.category_revenue, year, categorical)?;
    charts::draw_rating(&cells[2], &data.rating, year, categorical)?;
    charts::draw_bubbles(&cells[3], &data.bubbles, year, categorical)?;
    charts::draw_pyramid(&cells[4], &data.pyramid, year, categorical)?;
    charts::draw_heatmap(&cells[5], &data.heatmap, year, sequential)?;

    Ok(())
}
