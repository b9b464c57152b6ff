//! Category revenue stacked by age group (stacked bar chart)
//!
//! Gender stays in the grouping key, so each age-group stack can hold one
//! segment per gender. Only age group drives the segment color.

use super::frame;
use crate::context::ViewContext;
use crate::data::{columns, SalesTable};
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenueRow {
    pub category: String,
    pub age_group: String,
    pub gender: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub year: i32,
    pub rows: Vec<CategoryRevenueRow>,
}

impl CategoryRevenue {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct categories in row order (rows are sorted by category)
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if out.last() != Some(&row.category.as_str()) {
                out.push(&row.category);
            }
        }
        out
    }

    /// Distinct age groups, ascending; this is the stack and legend order
    pub fn age_groups(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.age_group.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Total revenue of one category
    pub fn category_total(&self, category: &str) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.revenue)
            .sum()
    }
}

pub fn compute(table: &SalesTable, ctx: &ViewContext) -> Result<CategoryRevenue> {
    let grouped = frame::year_rows(table, ctx.year)
        .group_by([
            col(columns::CATEGORY),
            col(columns::AGE_GROUP),
            col(columns::GENDER),
            col(columns::YEAR),
        ])
        .agg([col(columns::REVENUE).sum()])
        .sort_by_exprs(
            [
                col(columns::CATEGORY),
                col(columns::AGE_GROUP),
                col(columns::GENDER),
            ],
            frame::stable_sort(),
        )
        .collect()?;

    let categories = frame::str_values(&grouped, columns::CATEGORY)?;
    let age_groups = frame::str_values(&grouped, columns::AGE_GROUP)?;
    let genders = frame::str_values(&grouped, columns::GENDER)?;
    let revenues = frame::f64_values(&grouped, columns::REVENUE)?;

    let rows = categories
        .into_iter()
        .zip(age_groups)
        .zip(genders)
        .zip(revenues)
        .map(|(((category, age_group), gender), revenue)| CategoryRevenueRow {
            category,
            age_group,
            gender,
            revenue,
        })
        .collect();

    Ok(CategoryRevenue {
        year: ctx.year.value(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Year;
    use crate::data::record::fixtures::record;
    use crate::data::{Gender, SalesRecord};

    fn row(category: &str, age: &str, gender: Gender, revenue: f64) -> SalesRecord {
        let mut r = record(2021, 5);
        r.category = category.to_string();
        r.age_group = age.to_string();
        r.gender = gender;
        r.revenue = revenue;
        r
    }

    #[test]
    fn test_grouped_and_sorted() {
        let table = SalesTable::from_records(&[
            row("Shoes", "26-35", Gender::Male, 10.0),
            row("Dresses", "36-45", Gender::Female, 4.0),
            row("Shoes", "18-25", Gender::Female, 3.0),
            row("Shoes", "26-35", Gender::Male, 5.0),
            row("Dresses", "18-25", Gender::Female, 1.0),
        ])
        .unwrap();

        let ctx = ViewContext::new(Year::new(2021).unwrap());
        let result = compute(&table, &ctx).unwrap();

        let keys: Vec<(&str, &str)> = result
            .rows
            .iter()
            .map(|r| (r.category.as_str(), r.age_group.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Dresses", "18-25"),
                ("Dresses", "36-45"),
                ("Shoes", "18-25"),
                ("Shoes", "26-35"),
            ]
        );
        assert_eq!(result.rows[3].revenue, 15.0);
        assert_eq!(result.categories(), vec!["Dresses", "Shoes"]);
        assert_eq!(result.age_groups(), vec!["18-25", "26-35", "36-45"]);
        assert_eq!(result.category_total("Shoes"), 18.0);
    }

    #[test]
    fn test_gender_is_kept_as_grouping_key() {
        let table = SalesTable::from_records(&[
            row("Shoes", "26-35", Gender::Male, 10.0),
            row("Shoes", "26-35", Gender::Female, 2.0),
        ])
        .unwrap();

        let ctx = ViewContext::new(Year::new(2021).unwrap());
        let result = compute(&table, &ctx).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].gender, "Female");
        assert_eq!(result.rows[1].gender, "Male");
        // One stack entry per age group regardless of gender
        assert_eq!(result.age_groups(), vec!["26-35"]);
    }

    #[test]
    fn test_other_year_excluded() {
        let table = SalesTable::from_records(&[row("Shoes", "26-35", Gender::Male, 10.0)]).unwrap();
        let ctx = ViewContext::new(Year::new(2018).unwrap());
        assert!(compute(&table, &ctx).unwrap().is_empty());
    }
}
