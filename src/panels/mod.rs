//! Panel transforms
//!
//! Each panel is a pure function of the source table and a [`ViewContext`],
//! returning a small typed table ready for the chart renderer.
//!
//! Structure:
//! - `monthly_revenue.rs`: revenue per month (line)
//! - `category_revenue.rs`: revenue per category stacked by age group (bar)
//! - `rating.rs`: mean rating per product/color/material (scatter)
//! - `bubble.rs`: sales per rounded price and discount (bubble)
//! - `pyramid.rs`: demographic shares by gender and age group (diverging bar)
//! - `heatmap.rs`: sales per category and month/season (heatmap)
//!
//! [`ViewContext`]: crate::context::ViewContext

pub mod bubble;
pub mod category_revenue;
pub mod frame;
pub mod heatmap;
pub mod monthly_revenue;
pub mod pyramid;
pub mod rating;

pub use bubble::{BubblePoint, PriceDiscountBubbles};
pub use category_revenue::{CategoryRevenue, CategoryRevenueRow};
pub use heatmap::HeatmapMatrix;
pub use monthly_revenue::{MonthlyRevenue, MonthlyRevenuePoint};
pub use pyramid::{DemographicPyramid, PyramidBar};
pub use rating::{RatingByDimension, RatingPoint};

use serde::Serialize;

/// The six derived tables behind one dashboard page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub monthly_revenue: MonthlyRevenue,
    pub category_revenue: CategoryRevenue,
    pub rating: RatingByDimension,
    pub bubbles: PriceDiscountBubbles,
    pub pyramid: DemographicPyramid,
    pub heatmap: HeatmapMatrix,
}

impl DashboardData {
    /// True when no panel has any data (the selected year has no rows)
    pub fn is_empty(&self) -> bool {
        self.monthly_revenue.is_empty()
            && self.category_revenue.is_empty()
            && self.rating.is_empty()
            && self.bubbles.is_empty()
            && self.pyramid.is_empty()
            && self.heatmap.is_empty()
    }
}
