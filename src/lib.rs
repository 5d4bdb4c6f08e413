// Tue Jan 15 2026 - Alex

//! Signature scanning over a process's own memory with a narrowing region
//! cache.
//!
//! A [`SignatureScanner`] borrows a range of memory through a
//! [`MemoryReader`] and finds the first or last match of IDA-style
//! signatures such as `"48 8B 05 ?? ?? ?? ?? 48"`. Every search remembers
//! where the pattern's prefixes can occur, and an optional background worker
//! tightens those regions, so repeated searches scan less of the range.

pub mod config;
pub mod engine;
pub mod memory;
pub mod pattern;
pub mod utils;

pub use config::ScannerConfig;
pub use engine::{ScanError, ScanResult, SearchOptions, SignatureScanner};
pub use memory::{Address, BufferMemory, MemoryError, MemoryReader, ProcessMemory, Region};
pub use pattern::{has_vector_support, parse_signature, Direction, Pattern, PatternError, Tier};
