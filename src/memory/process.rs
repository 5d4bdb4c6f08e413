// Tue Jan 13 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, Region};
use std::slice;

/// A range of this process's own memory, typically a loaded module section
/// resolved by the caller.
pub struct ProcessMemory {
    range: Region,
}

impl ProcessMemory {
    /// # Safety
    ///
    /// `[start, end)` must stay mapped and readable for as long as this
    /// reader, or any scanner holding it, is alive. Writers racing with a
    /// scan only make results stale; they must not unmap the range.
    pub unsafe fn new(start: Address, end: Address) -> Result<Self, MemoryError> {
        if start > end || start.is_null() {
            return Err(MemoryError::InvalidRange {
                start: start.as_usize(),
                end: end.as_usize(),
            });
        }
        Ok(Self { range: Region::new(start, end) })
    }

    pub fn from_static(data: &'static [u8]) -> Self {
        let start = Address::from_ptr(data.as_ptr());
        Self { range: Region::from_start_size(start, data.len()) }
    }

    pub fn range(&self) -> Region {
        self.range
    }
}

impl MemoryReader for ProcessMemory {
    fn bounds(&self) -> Region {
        self.range
    }

    fn view(&self, region: Region) -> Result<&[u8], MemoryError> {
        self.check_region(region)?;
        if region.is_empty() {
            return Ok(&[]);
        }
        // SAFETY: `region` lies inside `self.range`, which the constructor's
        // contract keeps mapped and readable.
        Ok(unsafe { slice::from_raw_parts(region.start.as_ptr(), region.size()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static IMAGE: [u8; 8] = [0x48, 0x8B, 0x05, 0x00, 0x11, 0x22, 0x33, 0x44];

    #[test]
    fn test_static_image_view() {
        let mem = ProcessMemory::from_static(&IMAGE);
        let view = mem.view(mem.range()).unwrap();
        assert_eq!(view, &IMAGE);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = unsafe { ProcessMemory::new(Address::new(0x2000), Address::new(0x1000)) };
        assert!(result.is_err());
    }
}
