//! Demographic pyramid (back-to-back horizontal bars)
//!
//! Product occurrences are counted per (gender, age group) and turned into a
//! share of the year's total. Female shares are negated so the two series
//! extend in opposite directions from zero.

use super::frame;
use crate::context::ViewContext;
use crate::data::{columns, Gender, SalesTable};
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// Fixed x-axis tick positions (percent)
pub const PYRAMID_TICKS: [f64; 11] = [
    -100.0, -20.0, -15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0, 100.0,
];

/// Symmetric x-axis extent (percent)
pub const PYRAMID_AXIS_LIMIT: f64 = 100.0;

const COUNT: &str = "count";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PyramidBar {
    pub age_group: String,
    pub count: i64,
    /// Share of the year's total, negated for the Female series
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicPyramid {
    pub year: i32,
    pub male: Vec<PyramidBar>,
    pub female: Vec<PyramidBar>,
}

impl DemographicPyramid {
    pub fn is_empty(&self) -> bool {
        self.male.is_empty() && self.female.is_empty()
    }

    /// Shared y-axis: union of age groups from both series, ascending
    pub fn age_groups(&self) -> Vec<&str> {
        self.male
            .iter()
            .chain(self.female.iter())
            .map(|b| b.age_group.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sum of |percent| over both series (100 whenever any row was counted)
    #[cfg(test)]
    pub fn total_share(&self) -> f64 {
        self.male
            .iter()
            .chain(self.female.iter())
            .map(|b| b.percent.abs())
            .sum()
    }
}

/// Tick label for an axis position: sign dropped, percent suffix
pub fn tick_label(value: f64) -> String {
    format!("{}%", value.abs().round() as i64)
}

pub fn compute(table: &SalesTable, ctx: &ViewContext) -> Result<DemographicPyramid> {
    let grouped = frame::year_rows(table, ctx.year)
        .group_by([
            col(columns::GENDER),
            col(columns::AGE_GROUP),
            col(columns::YEAR),
        ])
        .agg([col(columns::PRODUCT_ID).count().alias(COUNT)])
        .sort_by_exprs(
            [col(columns::GENDER), col(columns::AGE_GROUP)],
            frame::stable_sort(),
        )
        .collect()?;

    let genders = frame::str_values(&grouped, columns::GENDER)?;
    let age_groups = frame::str_values(&grouped, columns::AGE_GROUP)?;
    let counts = frame::i64_values(&grouped, COUNT)?;

    let total: i64 = counts.iter().sum();
    let mut pyramid = DemographicPyramid {
        year: ctx.year.value(),
        male: Vec::new(),
        female: Vec::new(),
    };

    if total == 0 {
        return Ok(pyramid);
    }

    for ((gender, age_group), count) in genders.into_iter().zip(age_groups).zip(counts) {
        let share = count as f64 / total as f64 * 100.0;
        if gender == Gender::Male.as_str() {
            pyramid.male.push(PyramidBar {
                age_group,
                count,
                percent: share,
            });
        } else if gender == Gender::Female.as_str() {
            pyramid.female.push(PyramidBar {
                age_group,
                count,
                percent: -share,
            });
        }
    }

    Ok(pyramid)
}
