//! View context passed to every panel
//!
//! The selector values (year, rating dimension, heatmap granularity) are
//! bundled into one immutable value. Panels never read global state; a new
//! selection means a new `ViewContext`.

use crate::data::columns;
use crate::error::{DashboardError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// First year offered by the year selector
pub const MIN_YEAR: i32 = 2018;
/// Last year offered by the year selector
pub const MAX_YEAR: i32 = 2022;

/// A selected year within the selector range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Year(i32);

impl Year {
    pub fn new(year: i32) -> Result<Self> {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(Year(year))
        } else {
            Err(DashboardError::Config(format!(
                "year {} outside selector range {}-{}",
                year, MIN_YEAR, MAX_YEAR
            )))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Every year the selector offers, ascending
    pub fn all() -> impl Iterator<Item = Year> {
        (MIN_YEAR..=MAX_YEAR).map(Year)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grouping key for the average-rating panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum RatingDimension {
    #[default]
    Product,
    Color,
    Material,
}

impl RatingDimension {
    pub const ALL: [RatingDimension; 3] = [
        RatingDimension::Product,
        RatingDimension::Color,
        RatingDimension::Material,
    ];

    /// Source column grouped on
    pub fn column(self) -> &'static str {
        match self {
            RatingDimension::Product => columns::PRODUCT_NAME,
            RatingDimension::Color => columns::COLOR,
            RatingDimension::Material => columns::MATERIAL,
        }
    }

    /// Display label, also used as the x-axis title
    pub fn label(self) -> &'static str {
        match self {
            RatingDimension::Product => "Product",
            RatingDimension::Color => "Color",
            RatingDimension::Material => "Material",
        }
    }
}

impl FromStr for RatingDimension {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        RatingDimension::ALL
            .iter()
            .copied()
            .find(|d| d.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DashboardError::Config(format!(
                    "unknown rating dimension '{}' (expected Product, Color or Material)",
                    s
                ))
            })
    }
}

/// Time bucket used as the heatmap column axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum HeatmapGranularity {
    #[default]
    Month,
    Season,
}

impl HeatmapGranularity {
    pub fn label(self) -> &'static str {
        match self {
            HeatmapGranularity::Month => "Month",
            HeatmapGranularity::Season => "Season",
        }
    }
}

impl FromStr for HeatmapGranularity {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(HeatmapGranularity::Month),
            "season" => Ok(HeatmapGranularity::Season),
            _ => Err(DashboardError::Config(format!(
                "unknown heatmap granularity '{}' (expected Month or Season)",
                s
            ))),
        }
    }
}

/// Immutable selector state for one rendering pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewContext {
    pub year: Year,
    pub dimension: RatingDimension,
    pub granularity: HeatmapGranularity,
}

impl ViewContext {
    pub fn new(year: Year) -> Self {
        ViewContext {
            year,
            dimension: RatingDimension::default(),
            granularity: HeatmapGranularity::default(),
        }
    }

    pub fn with_dimension(self, dimension: RatingDimension) -> Self {
        ViewContext { dimension, ..self }
    }

    pub fn with_granularity(self, granularity: HeatmapGranularity) -> Self {
        ViewContext {
            granularity,
            ..self
        }
    }

    /// Same selections for another year
    pub fn for_year(self, year: Year) -> Self {
        ViewContext { year, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range() {
        assert!(Year::new(2017).is_err());
        assert_eq!(Year::new(2018).unwrap().value(), 2018);
        assert_eq!(Year::new(2022).unwrap().value(), 2022);
        assert!(Year::new(2023).is_err());
        assert_eq!(Year::all().count(), 5);
    }

    #[test]
    fn test_dimension_mapping() {
        assert_eq!(RatingDimension::Product.column(), "product_name");
        assert_eq!(RatingDimension::Color.column(), "color");
        assert_eq!(RatingDimension::Material.column(), "material");
        assert_eq!(
            "material".parse::<RatingDimension>().unwrap(),
            RatingDimension::Material
        );
        assert!("price".parse::<RatingDimension>().is_err());
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!(
            "Season".parse::<HeatmapGranularity>().unwrap(),
            HeatmapGranularity::Season
        );
        assert!("week".parse::<HeatmapGranularity>().is_err());
    }

    #[test]
    fn test_context_builders() {
        let ctx = ViewContext::new(Year::new(2019).unwrap())
            .with_dimension(RatingDimension::Color)
            .with_granularity(HeatmapGranularity::Season);
        let next = ctx.for_year(Year::new(2020).unwrap());
        assert_eq!(next.year.value(), 2020);
        assert_eq!(next.dimension, RatingDimension::Color);
        assert_eq!(next.granularity, HeatmapGranularity::Season);
    }
}
