// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),
    #[error("Empty signature after trimming wildcards")]
    EmptySignature,
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}
