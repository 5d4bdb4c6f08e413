// Wed Jan 15 2026 - Alex

use crate::memory::{MemoryError, Region};

/// Source of the bytes a scanner searches.
///
/// Readers hand out borrowed views instead of copies: a signature scan walks
/// megabytes per call and must never allocate on the hot path.
pub trait MemoryReader: Send + Sync {
    /// The whole readable range backing this reader.
    fn bounds(&self) -> Region;

    /// Borrow `region`. Fails unless the region lies entirely inside `bounds()`.
    fn view(&self, region: Region) -> Result<&[u8], MemoryError>;

    fn check_region(&self, region: Region) -> Result<(), MemoryError> {
        if region.start > region.end {
            return Err(MemoryError::InvalidRange {
                start: region.start.as_usize(),
                end: region.end.as_usize(),
            });
        }
        if !self.bounds().contains_region(&region) {
            return Err(MemoryError::OutOfBounds {
                start: region.start.as_usize(),
                end: region.end.as_usize(),
            });
        }
        Ok(())
    }
}
