//! Price/discount/sales bubble chart
//!
//! Prices are rounded to whole units before grouping so nearby price points
//! share a bubble. Rounding is half away from zero.

use super::frame;
use crate::context::ViewContext;
use crate::data::{columns, SalesTable};
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    /// Rounded price (x)
    pub price: f64,
    /// Discount percent (bubble size)
    pub discount: f64,
    /// Summed sales count (y)
    pub sales_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceDiscountBubbles {
    pub year: i32,
    /// Sorted by sales count, then price
    pub points: Vec<BubblePoint>,
}

impl PriceDiscountBubbles {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_discount(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.discount)
            .fold(0.0, f64::max)
    }
}

/// Price bucket: nearest whole unit, halves rounded away from zero
fn rounded_price() -> Expr {
    col(columns::PRICE)
        .round(0, RoundMode::HalfAwayFromZero)
        .alias(columns::PRICE)
}

pub fn compute(table: &SalesTable, ctx: &ViewContext) -> Result<PriceDiscountBubbles> {
    let grouped = frame::year_rows(table, ctx.year)
        .with_column(rounded_price())
        .group_by([
            col(columns::YEAR),
            col(columns::PRICE),
            col(columns::DISCOUNT),
        ])
        .agg([col(columns::SALES_COUNT).sum()])
        .sort_by_exprs(
            [
                col(columns::SALES_COUNT),
                col(columns::PRICE),
                col(columns::DISCOUNT),
            ],
            frame::stable_sort(),
        )
        .collect()?;

    let prices = frame::f64_values(&grouped, columns::PRICE)?;
    let discounts = frame::f64_values(&grouped, columns::DISCOUNT)?;
    let counts = frame::i64_values(&grouped, columns::SALES_COUNT)?;

    let points = prices
        .into_iter()
        .zip(discounts)
        .zip(counts)
        .map(|((price, discount), sales_count)| BubblePoint {
            price,
            discount,
            sales_count,
        })
        .collect();

    Ok(PriceDiscountBubbles {
        year: ctx.year.value(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Year;
    use crate::data::record::fixtures::record;
    use crate::data::SalesRecord;

    fn row(price: f64, discount: f64, sales: i64) -> SalesRecord {
        let mut r = record(2020, 8);
        r.price = price;
        r.discount = discount;
        r.sales_count = sales;
        r
    }

    fn ctx() -> ViewContext {
        ViewContext::new(Year::new(2020).unwrap())
    }

    #[test]
    fn test_prices_round_half_away_from_zero() {
        let table = SalesTable::from_records(&[
            row(19.49, 0.0, 1),
            row(19.5, 0.0, 2),
            row(20.5, 0.0, 4),
            row(0.4, 0.0, 8),
        ])
        .unwrap();

        let prices: Vec<f64> = compute(&table, &ctx())
            .unwrap()
            .points
            .iter()
            .map(|p| p.price)
            .collect();
        // Ties go up (20.5 -> 21), not to the even neighbour
        assert_eq!(prices, vec![19.0, 20.0, 21.0, 0.0]);
    }

    #[test]
    fn test_rounded_prices_share_bucket() {
        let table = SalesTable::from_records(&[
            row(19.6, 10.0, 3),
            row(20.2, 10.0, 4),
            row(20.2, 5.0, 1),
            row(35.0, 10.0, 2),
        ])
        .unwrap();

        let result = compute(&table, &ctx()).unwrap();
        assert_eq!(
            result.points,
            vec![
                BubblePoint {
                    price: 20.0,
                    discount: 5.0,
                    sales_count: 1
                },
                BubblePoint {
                    price: 35.0,
                    discount: 10.0,
                    sales_count: 2
                },
                BubblePoint {
                    price: 20.0,
                    discount: 10.0,
                    sales_count: 7
                },
            ]
        );
        assert_eq!(result.max_discount(), 10.0);
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let records = vec![
            row(12.49, 0.0, 5),
            row(12.51, 0.0, 2),
            row(99.5, 20.0, 9),
        ];
        let first = compute(&SalesTable::from_records(&records).unwrap(), &ctx()).unwrap();

        let rerounded: Vec<SalesRecord> = records
            .into_iter()
            .map(|mut r| {
                r.price = r.price.round();
                r
            })
            .collect();
        let second = compute(&SalesTable::from_records(&rerounded).unwrap(), &ctx()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_year() {
        let table = SalesTable::from_records(&[row(10.0, 0.0, 1)]).unwrap();
        let ctx = ViewContext::new(Year::new(2018).unwrap());
        assert!(compute(&table, &ctx).unwrap().is_empty());
    }
}
