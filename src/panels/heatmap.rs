//! Category × time-bucket heatmap
//!
//! Sales counts are pivoted into a matrix with one row per category and one
//! column per bucket of a fixed ordering (Jan..Dec, or All/Spring/Summer/
//! Autumn/Winter). Every bucket of the ordering is a column even when it has
//! no sales, and absent cells are 0.

use super::frame;
use crate::context::{HeatmapGranularity, ViewContext};
use crate::data::{columns, Month, SalesTable, Season};
use crate::error::{DashboardError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub year: i32,
    pub granularity: HeatmapGranularity,
    /// Bucket labels in their fixed order
    pub buckets: Vec<String>,
    /// Row labels, ascending
    pub categories: Vec<String>,
    /// `cells[row][column]` = summed sales count
    pub cells: Vec<Vec<i64>>,
}

impl HeatmapMatrix {
    /// A matrix without categories (the selected year has no rows)
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, category: &str, bucket: &str) -> Option<i64> {
        let row = self.categories.iter().position(|c| c == category)?;
        let column = self.buckets.iter().position(|b| b == bucket)?;
        Some(self.cells[row][column])
    }

    pub fn max_value(&self) -> i64 {
        self.cells
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

pub fn compute(table: &SalesTable, ctx: &ViewContext) -> Result<HeatmapMatrix> {
    let bucket_column = match ctx.granularity {
        HeatmapGranularity::Month => columns::MONTH,
        HeatmapGranularity::Season => columns::SEASON,
    };

    let grouped = frame::year_rows(table, ctx.year)
        .group_by([col(columns::CATEGORY), col(bucket_column)])
        .agg([col(columns::SALES_COUNT).sum()])
        .collect()?;

    let categories = frame::str_values(&grouped, columns::CATEGORY)?;
    let totals = frame::i64_values(&grouped, columns::SALES_COUNT)?;
    let positions = bucket_positions(&grouped, ctx.granularity)?;

    let buckets: Vec<String> = match ctx.granularity {
        HeatmapGranularity::Month => Month::ALL.iter().map(|m| m.abbr().to_string()).collect(),
        HeatmapGranularity::Season => Season::ALL.iter().map(|s| s.as_str().to_string()).collect(),
    };

    let mut rows: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    for ((category, position), total) in categories.into_iter().zip(positions).zip(totals) {
        let row = rows
            .entry(category)
            .or_insert_with(|| vec![0; buckets.len()]);
        row[position] += total;
    }

    let (categories, cells): (Vec<String>, Vec<Vec<i64>>) = rows.into_iter().unzip();

    Ok(HeatmapMatrix {
        year: ctx.year.value(),
        granularity: ctx.granularity,
        buckets,
        categories,
        cells,
    })
}

/// Column index of every grouped row within the fixed bucket ordering
fn bucket_positions(grouped: &DataFrame, granularity: HeatmapGranularity) -> Result<Vec<usize>> {
    match granularity {
        HeatmapGranularity::Month => frame::i32_values(grouped, columns::MONTH)?
            .into_iter()
            .enumerate()
            .map(|(i, number)| {
                Month::from_number(number)
                    .map(Month::index)
                    .ok_or_else(|| DashboardError::Validation {
                        row: i + 1,
                        message: format!("month_of_sale {} is not a calendar month", number),
                    })
            })
            .collect(),
        HeatmapGranularity::Season => frame::str_values(grouped, columns::SEASON)?
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                label
                    .parse::<Season>()
                    .map(Season::index)
                    .map_err(|message| DashboardError::Validation { row: i + 1, message })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Year;
    use crate::data::record::fixtures::record;
    use crate::data::SalesRecord;

    fn row(category: &str, month: i32, season: Season, sales: i64) -> SalesRecord {
        let mut r = record(2018, month);
        r.category = category.to_string();
        r.season = season;
        r.sales_count = sales;
        r
    }

    fn table() -> SalesTable {
        SalesTable::from_records(&[
            row("Shoes", 12, Season::Winter, 4),
            row("Dresses", 3, Season::Spring, 2),
            row("Shoes", 1, Season::Winter, 1),
            row("Dresses", 3, Season::All, 5),
            row("Shoes", 12, Season::Winter, 6),
        ])
        .unwrap()
    }

    fn ctx(granularity: HeatmapGranularity) -> ViewContext {
        ViewContext::new(Year::new(2018).unwrap()).with_granularity(granularity)
    }

    #[test]
    fn test_month_columns_fixed_and_zero_filled() {
        let matrix = compute(&table(), &ctx(HeatmapGranularity::Month)).unwrap();

        assert_eq!(
            matrix.buckets,
            vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]
        );
        assert_eq!(matrix.categories, vec!["Dresses", "Shoes"]);
        assert_eq!(matrix.get("Dresses", "Mar"), Some(7));
        assert_eq!(matrix.get("Dresses", "Jan"), Some(0));
        assert_eq!(matrix.get("Shoes", "Jan"), Some(1));
        assert_eq!(matrix.get("Shoes", "Dec"), Some(10));
        assert_eq!(matrix.get("Shoes", "Jun"), Some(0));
        assert_eq!(matrix.max_value(), 10);
        assert!(matrix.cells.iter().all(|r| r.len() == 12));
        assert_eq!(matrix.year, 2018);
    }

    #[test]
    fn test_season_columns_fixed_order() {
        let matrix = compute(&table(), &ctx(HeatmapGranularity::Season)).unwrap();

        assert_eq!(
            matrix.buckets,
            vec!["All", "Spring", "Summer", "Autumn", "Winter"]
        );
        assert_eq!(matrix.cells[0], vec![5, 2, 0, 0, 0]);
        assert_eq!(matrix.cells[1], vec![0, 0, 0, 0, 11]);
    }

    #[test]
    fn test_empty_year() {
        let ctx = ViewContext::new(Year::new(2021).unwrap());
        let matrix = compute(&table(), &ctx).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.max_value(), 0);
        assert_eq!(matrix.buckets.len(), 12);
    }
}
