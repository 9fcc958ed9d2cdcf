//! Error types for Serveria.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No server model selected")]
    NoChassisSelected,

    #[error("Configuration contains no components")]
    EmptyConfiguration,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
