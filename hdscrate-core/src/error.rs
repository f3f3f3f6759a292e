//! Error types for hdscrate

use thiserror::Error;

/// Main error type for hdscrate operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for hdscrate operations
pub type Result<T> = std::result::Result<T, Error>;
