use thiserror::Error;

/// Errors that can occur while loading the sales table or building the dashboard
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Filesystem error (missing data file, unwritable output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Dataframe construction or aggregation error
    #[error("Dataframe error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// The CSV header lacks a required column
    #[error("Missing column '{0}' in sales data")]
    MissingColumn(String),

    /// A data row violates a table invariant
    #[error("Invalid data row {row}: {message}")]
    Validation { row: usize, message: String },

    /// Configuration error (bad selector value, unknown property)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart drawing error
    #[error("Render error: {0}")]
    Render(String),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Results using DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;
