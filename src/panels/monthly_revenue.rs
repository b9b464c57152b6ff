//! Monthly revenue series (line chart)
//!
//! Revenue summed per month of the selected year, in calendar order. Months
//! without sales are left out rather than zero-filled.

use super::frame;
use crate::context::ViewContext;
use crate::data::{columns, Month, SalesTable};
use crate::error::{DashboardError, Result};
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenuePoint {
    pub month: Month,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub points: Vec<MonthlyRevenuePoint>,
}

impl MonthlyRevenue {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// (month label, revenue) pairs in calendar order
    pub fn labeled(&self) -> Vec<(&'static str, f64)> {
        self.points
            .iter()
            .map(|p| (p.month.abbr(), p.revenue))
            .collect()
    }

    #[cfg(test)]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.revenue).sum()
    }
}

pub fn compute(table: &SalesTable, ctx: &ViewContext) -> Result<MonthlyRevenue> {
    let grouped = frame::year_rows(table, ctx.year)
        .group_by([col(columns::YEAR), col(columns::MONTH)])
        .agg([col(columns::REVENUE).sum()])
        .sort_by_exprs([col(columns::MONTH)], frame::stable_sort())
        .collect()?;

    let months = frame::i32_values(&grouped, columns::MONTH)?;
    let revenues = frame::f64_values(&grouped, columns::REVENUE)?;

    let points = months
        .into_iter()
        .zip(revenues)
        .enumerate()
        .map(|(i, (number, revenue))| {
            let month = Month::from_number(number).ok_or_else(|| DashboardError::Validation {
                row: i + 1,
                message: format!("month_of_sale {} is not a calendar month", number),
            })?;
            Ok(MonthlyRevenuePoint { month, revenue })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MonthlyRevenue {
        year: ctx.year.value(),
        points,
    })
}
