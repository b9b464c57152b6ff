//! Sales Dashboard Library
//!
//! Six aggregation panels over a retail sales table, rendered as one SVG page
//! per selected year. The binary in `main.rs` is a thin CLI over [`pipeline`].

pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod memprof;
pub mod panels;
pub mod pipeline;
pub mod properties;
pub mod render;

pub use error::{DashboardError, Result};
