// Tue Jan 13 2026 - Alex

pub mod cache;
pub mod error;
pub mod matcher;
pub mod pattern;
pub mod signature;
pub mod simd;

pub use cache::{CacheKey, CachedRegion, RegionCache, KEY_WIDTH};
pub use error::PatternError;
pub use matcher::{find, select_tier, Direction, Tier};
pub use pattern::Pattern;
pub use signature::{format_signature, parse_signature};
pub use simd::has_vector_support;
