// Tue Jan 13 2026 - Alex

use crate::memory::MemoryError;
use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("Invalid scanner configuration: {0}")]
    Config(String),
    #[error("Failed to spawn refinement worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

pub type ScanResult<T> = Result<T, ScanError>;
