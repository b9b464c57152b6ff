//! Dashboard configuration from properties
//!
//! Defaults come from dashboard.json via [`PropertyReader`]; this module only
//! turns property strings into typed selectors and page settings.

use crate::context::{HeatmapGranularity, RatingDimension, ViewContext, Year};
use crate::error::Result;
use crate::properties::PropertyReader;

/// Smallest accepted page edge in pixels
pub const MIN_PLOT_SIZE: i32 = 400;
/// Largest accepted page edge in pixels
pub const MAX_PLOT_SIZE: i32 = 10_000;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Selected year of sale
    pub year: Year,

    /// Grouping key of the rating panel
    pub dimension: RatingDimension,

    /// Column buckets of the heatmap panel
    pub granularity: HeatmapGranularity,

    /// Page width in pixels
    pub plot_width: u32,

    /// Page height in pixels
    pub plot_height: u32,

    /// Page title above the grid
    pub title: String,

    /// Palette for series and stacks
    pub categorical_palette: String,

    /// Palette for heatmap cells
    pub sequential_palette: String,
}

impl DashboardConfig {
    /// Build the config. Fails only if the selected year is outside the
    /// selector range; other invalid values fall back to their defaults.
    pub fn from_properties(props: &PropertyReader) -> Result<Self> {
        let year = Year::new(props.get_i32("year"))?;

        // Enum values are validated by the reader, so parsing cannot fail
        let dimension = props
            .get_enum("rating.dimension")
            .parse::<RatingDimension>()
            .unwrap_or_default();
        let granularity = props
            .get_enum("heatmap.granularity")
            .parse::<HeatmapGranularity>()
            .unwrap_or_default();

        let plot_width = props.get_i32_in_range("plot.width", MIN_PLOT_SIZE, MAX_PLOT_SIZE) as u32;
        let plot_height =
            props.get_i32_in_range("plot.height", MIN_PLOT_SIZE, MAX_PLOT_SIZE) as u32;

        let title = props.get_string("dashboard.title");
        let categorical_palette = props.get_string("palette.categorical");
        let sequential_palette = props.get_string("palette.sequential");

        Ok(Self {
            year,
            dimension,
            granularity,
            plot_width,
            plot_height,
            title,
            categorical_palette,
            sequential_palette,
        })
    }

    /// Selector state for the configured year
    pub fn view_context(&self) -> ViewContext {
        ViewContext::new(self.year)
            .with_dimension(self.dimension)
            .with_granularity(self.granularity)
    }
}
