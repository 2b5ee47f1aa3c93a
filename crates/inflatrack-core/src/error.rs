//! Error types for inflatrack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested country (or country and year range) has no data
    #[error("Not found: {0}")]
    NotFound(String),

    /// A structural precondition of an analysis failed
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// The data source could not produce any records
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
