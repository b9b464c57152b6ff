//! Shared DataFrame helpers for the panel transforms

use crate::context::Year;
use crate::data::{columns, SalesTable};
use crate::error::Result;
use polars::prelude::*;

/// Lazy view of the source table restricted to one year
pub fn year_rows(table: &SalesTable, year: Year) -> LazyFrame {
    table
        .frame()
        .clone()
        .lazy()
        .filter(col(columns::YEAR).eq(lit(year.value())))
}

/// Sort options that keep the input order of equal keys
pub fn stable_sort() -> SortMultipleOptions {
    SortMultipleOptions::default().with_maintain_order(true)
}

/// Column as owned strings (nulls become empty strings)
pub fn str_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?;
    Ok(column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

/// Column cast to f64 (nulls become 0.0)
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}

/// Column cast to i64 (nulls become 0)
pub fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column
        .as_materialized_series()
        .i64()?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect())
}

/// Column cast to i32 (nulls become 0)
pub fn i32_values(df: &DataFrame, name: &str) -> Result<Vec<i32>> {
    let column = df.column(name)?.cast(&DataType::Int32)?;
    Ok(column
        .as_materialized_series()
        .i32()?
        .into_iter()
        .map(|v| v.unwrap_or(0))
        .collect())
}
