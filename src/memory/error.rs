// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Invalid memory range: start {start:#x} is past end {end:#x}")]
    InvalidRange { start: usize, end: usize },
    #[error("Out of bounds: [{start:#x}, {end:#x}) is not inside the readable image")]
    OutOfBounds { start: usize, end: usize },
}
