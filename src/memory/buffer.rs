// Tue Jan 13 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, Region};

/// A heap copy of some memory image. Addresses handed to the scanner are the
/// buffer's real addresses, so results can be turned back into offsets with
/// [`BufferMemory::offset_of`].
pub struct BufferMemory {
    data: Box<[u8]>,
}

impl BufferMemory {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data: data.into_boxed_slice() }
    }

    pub fn zeroed(size: usize) -> Self {
        Self::new(vec![0; size])
    }

    pub fn base(&self) -> Address {
        Address::from_ptr(self.data.as_ptr())
    }

    pub fn end(&self) -> Address {
        self.base() + self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn address_of(&self, offset: usize) -> Address {
        self.base() + offset
    }

    pub fn offset_of(&self, addr: Address) -> Option<usize> {
        addr.offset_from(self.base()).filter(|&off| off <= self.data.len())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for BufferMemory {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl MemoryReader for BufferMemory {
    fn bounds(&self) -> Region {
        Region::new(self.base(), self.end())
    }

    fn view(&self, region: Region) -> Result<&[u8], MemoryError> {
        self.check_region(region)?;
        let start = region.start.as_usize() - self.base().as_usize();
        Ok(&self.data[start..start + region.size()])
    }
}
