// Tue Jan 13 2026 - Alex

pub mod core;
pub mod error;
pub mod worker;

pub use self::core::{SearchOptions, SignatureScanner};
pub use error::{ScanError, ScanResult};
pub use worker::RefinementWorker;
