//! Sales table loading
//!
//! Reads the CSV source once, validates every row, and holds the result as a
//! Polars DataFrame that all panels aggregate over. The table is never mutated
//! after load.

use super::record::{RawSalesRow, SalesRecord};
use crate::error::{DashboardError, Result};
use csv::ReaderBuilder;
use polars::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column names of the in-memory frame
pub mod columns {
    pub const YEAR: &str = "year_of_sale";
    pub const MONTH: &str = "month_of_sale";
    pub const CATEGORY: &str = "category";
    pub const AGE_GROUP: &str = "age_group";
    pub const GENDER: &str = "gender";
    pub const PRODUCT_ID: &str = "product_id";
    pub const PRODUCT_NAME: &str = "product_name";
    pub const COLOR: &str = "color";
    pub const MATERIAL: &str = "material";
    pub const PRICE: &str = "price";
    pub const DISCOUNT: &str = "discount";
    pub const SALES_COUNT: &str = "sales_count";
    pub const REVENUE: &str = "revenue";
    pub const AVERAGE_RATING: &str = "average_rating";
    pub const SEASON: &str = "season";

    /// Every column the CSV source must provide
    pub const REQUIRED: [&str; 15] = [
        YEAR,
        MONTH,
        CATEGORY,
        AGE_GROUP,
        GENDER,
        PRODUCT_ID,
        PRODUCT_NAME,
        COLOR,
        MATERIAL,
        PRICE,
        DISCOUNT,
        SALES_COUNT,
        REVENUE,
        AVERAGE_RATING,
        SEASON,
    ];
}

/// The read-only source table shared by every panel
#[derive(Debug, Clone)]
pub struct SalesTable {
    frame: DataFrame,
}

impl SalesTable {
    /// Load and validate a CSV file. Missing or malformed files are an error.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading sales table from {}", path.display());
        let file = File::open(path)?;
        let table = Self::from_csv_reader(file)?;
        tracing::info!("Loaded {} rows, years {:?}", table.len(), table.years()?);
        Ok(table)
    }

    /// Load and validate CSV data from any reader (header row required)
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // Optional fields deserialize as null when their column is absent,
        // so the header is checked up front
        let headers = reader.headers()?;
        if let Some(missing) = columns::REQUIRED
            .iter()
            .find(|name| !headers.iter().any(|h| h == **name))
        {
            return Err(DashboardError::MissingColumn(missing.to_string()));
        }

        let mut records = Vec::new();
        for (i, result) in reader.deserialize::<RawSalesRow>().enumerate() {
            let raw = result?;
            records.push(SalesRecord::from_raw(raw, i + 1)?);
        }

        Self::from_records(&records)
    }

    /// Build the frame from already validated records
    pub fn from_records(records: &[SalesRecord]) -> Result<Self> {
        let frame = df! {
            columns::YEAR => records.iter().map(|r| r.year).collect::<Vec<i32>>(),
            columns::MONTH => records.iter().map(|r| r.month.number()).collect::<Vec<i32>>(),
            columns::CATEGORY => records.iter().map(|r| r.category.clone()).collect::<Vec<String>>(),
            columns::AGE_GROUP => records.iter().map(|r| r.age_group.clone()).collect::<Vec<String>>(),
            columns::GENDER => records.iter().map(|r| r.gender.as_str().to_string()).collect::<Vec<String>>(),
            columns::PRODUCT_ID => records.iter().map(|r| r.product_id.clone()).collect::<Vec<Option<String>>>(),
            columns::PRODUCT_NAME => records.iter().map(|r| r.product_name.clone()).collect::<Vec<String>>(),
            columns::COLOR => records.iter().map(|r| r.color.clone()).collect::<Vec<String>>(),
            columns::MATERIAL => records.iter().map(|r| r.material.clone()).collect::<Vec<String>>(),
            columns::PRICE => records.iter().map(|r| r.price).collect::<Vec<f64>>(),
            columns::DISCOUNT => records.iter().map(|r| r.discount).collect::<Vec<f64>>(),
            columns::SALES_COUNT => records.iter().map(|r| r.sales_count).collect::<Vec<i64>>(),
            columns::REVENUE => records.iter().map(|r| r.revenue).collect::<Vec<f64>>(),
            columns::AVERAGE_RATING => records.iter().map(|r| r.average_rating).collect::<Vec<f64>>(),
            columns::SEASON => records.iter().map(|r| r.season.as_str().to_string()).collect::<Vec<String>>(),
        }?;

        Ok(SalesTable { frame })
    }

    /// The underlying frame
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Distinct years present in the table, ascending
    pub fn years(&self) -> Result<Vec<i32>> {
        let column = self.frame.column(columns::YEAR)?;
        let mut years: Vec<i32> = column
            .as_materialized_series()
            .i32()?
            .into_iter()
            .flatten()
            .collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "product_id,product_name,category,age_group,gender,color,material,season,price,discount,sales_count,revenue,average_rating,year_of_sale,month_of_sale";

    #[test]
    fn test_load_fixture_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/sales_sample.csv");
        let table = SalesTable::from_csv_path(path).unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.years().unwrap(), vec![2018, 2019, 2020, 2021, 2022]);
    }

    #[test]
    fn test_load_from_reader() {
        let data = format!(
            "{}\nP1,Tee,T-Shirts,18-25,Male,White,Cotton,Summer,19.99,5,10,199.9,4.1,2019,6\n\
             P2,Coat,Outerwear,36-45,Female,Camel,Wool,Winter,120.0,0,2,240.0,4.6,2018,12\n",
            HEADER
        );
        let table = SalesTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.years().unwrap(), vec![2018, 2019]);
        assert_eq!(table.frame().width(), 15);
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = SalesTable::from_csv_reader(HEADER.as_bytes()).unwrap();
        assert!(table.is_empty());
        assert!(table.years().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SalesTable::from_csv_path(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Io(_)));
    }

    #[test]
    fn test_malformed_row_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(
            file,
            "P1,Tee,T-Shirts,18-25,Male,White,Cotton,Summer,not-a-price,5,10,199.9,4.1,2019,6"
        )
        .unwrap();
        let err = SalesTable::from_csv_path(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::Csv(_)));
    }

    #[test]
    fn test_invalid_month_reports_row() {
        let data = format!(
            "{}\nP1,Tee,T-Shirts,18-25,Male,White,Cotton,Summer,19.99,5,10,199.9,4.1,2019,6\n\
             P2,Tee,T-Shirts,18-25,Male,White,Cotton,Summer,19.99,5,10,199.9,4.1,2019,0\n",
            HEADER
        );
        let err = SalesTable::from_csv_reader(data.as_bytes()).unwrap_err();
        match err {
            DashboardError::Validation { row, .. } => assert_eq!(row, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_is_error() {
        let header = HEADER.replacen("product_id,", "", 1);
        let data = format!(
            "{}\nTee,T-Shirts,18-25,Male,White,Cotton,Summer,19.99,5,10,199.9,4.1,2019,6\n",
            header
        );
        let err = SalesTable::from_csv_reader(data.as_bytes()).unwrap_err();
        match err {
            DashboardError::MissingColumn(name) => assert_eq!(name, "product_id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_product_id_is_null() {
        let data = format!(
            "{}\n,Tee,T-Shirts,18-25,Male,White,Cotton,Summer,19.99,5,10,199.9,4.1,2019,6\n",
            HEADER
        );
        let table = SalesTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        let ids = table.frame().column(columns::PRODUCT_ID).unwrap();
        assert_eq!(ids.as_materialized_series().null_count(), 1);
    }
}
