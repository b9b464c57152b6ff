//! Average rating by product, color or material (scatter chart)

use super::frame;
use crate::context::{RatingDimension, ViewContext};
use crate::data::{columns, SalesTable};
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingPoint {
    /// Value of the grouping field (a product name, color or material)
    pub value: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingByDimension {
    pub year: i32,
    pub dimension: RatingDimension,
    /// Sorted ascending by mean rating
    pub points: Vec<RatingPoint>,
}

impl RatingByDimension {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn axis_label(&self) -> &'static str {
        self.dimension.label()
    }
}

/// Mean rating per value of `ctx.dimension` for the selected year
pub fn compute(table: &SalesTable, ctx: &ViewContext) -> Result<RatingByDimension> {
    let key = ctx.dimension.column();

    let grouped = frame::year_rows(table, ctx.year)
        .group_by([col(key), col(columns::YEAR)])
        .agg([col(columns::AVERAGE_RATING).mean()])
        .sort_by_exprs(
            [col(columns::AVERAGE_RATING), col(key)],
            frame::stable_sort(),
        )
        .collect()?;

    let values = frame::str_values(&grouped, key)?;
    let ratings = frame::f64_values(&grouped, columns::AVERAGE_RATING)?;

    let points = values
        .into_iter()
        .zip(ratings)
        .map(|(value, rating)| RatingPoint { value, rating })
        .collect();

    Ok(RatingByDimension {
        year: ctx.year.value(),
        dimension: ctx.dimension,
        points,
    })
}
