//! Sales dataset module
//!
//! Structure:
//! - `calendar.rs`: Month, Season and Gender enumerations with fixed orderings
//! - `record.rs`: CSV row types and per-row validation
//! - `table.rs`: The in-memory source table (Polars DataFrame)

pub mod calendar;
pub mod record;
pub mod table;

pub use calendar::{Gender, Month, Season};
pub use record::{RawSalesRow, SalesRecord};
pub use table::{columns, SalesTable};
