use super::calendar::{Gender, Month, Season};
use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};

/// One CSV row as it appears on disk
///
/// Labels are kept as strings here; [`SalesRecord::from_raw`] parses and
/// validates them. Extra columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSalesRow {
    pub year_of_sale: i32,
    pub month_of_sale: i32,
    pub category: String,
    pub age_group: String,
    pub gender: String,
    /// Blank fields become `None`; the column itself is required
    pub product_id: Option<String>,
    pub product_name: String,
    pub color: String,
    pub material: String,
    pub price: f64,
    pub discount: f64,
    pub sales_count: i64,
    pub revenue: f64,
    pub average_rating: f64,
    pub season: String,
}

/// A validated sales observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub year: i32,
    pub month: Month,
    pub category: String,
    pub age_group: String,
    pub gender: Gender,
    pub product_id: Option<String>,
    pub product_name: String,
    pub color: String,
    pub material: String,
    pub price: f64,
    pub discount: f64,
    pub sales_count: i64,
    pub revenue: f64,
    pub average_rating: f64,
    pub season: Season,
}

impl SalesRecord {
    /// Validate a raw row. `row` is the 1-based data row used in error messages.
    pub fn from_raw(raw: RawSalesRow, row: usize) -> Result<Self> {
        let invalid = |message: String| DashboardError::Validation { row, message };

        let month = Month::from_number(raw.month_of_sale).ok_or_else(|| {
            invalid(format!(
                "month_of_sale must be in 1..=12, got {}",
                raw.month_of_sale
            ))
        })?;

        if raw.revenue.is_nan() || raw.revenue < 0.0 {
            return Err(invalid(format!(
                "revenue must be non-negative, got {}",
                raw.revenue
            )));
        }

        if raw.sales_count < 0 {
            return Err(invalid(format!(
                "sales_count must be non-negative, got {}",
                raw.sales_count
            )));
        }

        let gender = raw
            .gender
            .parse::<Gender>()
            .map_err(|e| invalid(format!("gender: {}", e)))?;
        let season = raw
            .season
            .parse::<Season>()
            .map_err(|e| invalid(format!("season: {}", e)))?;

        let product_id = raw.product_id.filter(|id| !id.trim().is_empty());

        Ok(SalesRecord {
            year: raw.year_of_sale,
            month,
            category: raw.category,
            age_group: raw.age_group,
            gender,
            product_id,
            product_name: raw.product_name,
            color: raw.color,
            material: raw.material,
            price: raw.price,
            discount: raw.discount,
            sales_count: raw.sales_count,
            revenue: raw.revenue,
            average_rating: raw.average_rating,
            season,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawSalesRow {
        RawSalesRow {
            year_of_sale: 2020,
            month_of_sale: 4,
            category: "Shoes".to_string(),
            age_group: "26-35".to_string(),
            gender: "Male".to_string(),
            product_id: Some("  ".to_string()),
            product_name: "Loafer".to_string(),
            color: "Brown".to_string(),
            material: "Leather".to_string(),
            price: 89.5,
            discount: 5.0,
            sales_count: 12,
            revenue: 1074.0,
            average_rating: 4.2,
            season: "Spring".to_string(),
        }
    }

    #[test]
    fn test_from_raw_valid() {
        let record = SalesRecord::from_raw(raw(), 1).unwrap();
        assert_eq!(record.month, Month::Apr);
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.season, Season::Spring);
        // Blank ids count as missing
        assert_eq!(record.product_id, None);
    }

    #[test]
    fn test_from_raw_rejects_bad_month() {
        let mut row = raw();
        row.month_of_sale = 13;
        let err = SalesRecord::from_raw(row, 7).unwrap_err();
        match err {
            DashboardError::Validation { row, message } => {
                assert_eq!(row, 7);
                assert!(message.contains("month_of_sale"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_raw_rejects_negative_values() {
        let mut row = raw();
        row.revenue = -1.0;
        assert!(SalesRecord::from_raw(row, 1).is_err());

        let mut row = raw();
        row.sales_count = -3;
        assert!(SalesRecord::from_raw(row, 1).is_err());
    }

    #[test]
    fn test_from_raw_rejects_unknown_labels() {
        let mut row = raw();
        row.season = "Monsoon".to_string();
        assert!(SalesRecord::from_raw(row, 1).is_err());
    }
}
