// Tue Jan 13 2026 - Alex

use crate::memory::Address;
use std::fmt;

/// Half-open `[start, end)`; `start >= end` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub start: Address,
    pub end: Address,
}

impl Region {
    pub const fn new(start: Address, end: Address) -> Self {
        Self { start, end }
    }

    pub fn from_start_size(start: Address, size: usize) -> Self {
        Self::new(start, start.saturating_add(size))
    }

    pub fn empty_at(at: Address) -> Self {
        Self::new(at, at)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn size(&self) -> usize {
        self.end.as_usize().saturating_sub(self.start.as_usize())
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start && addr < self.end
    }

    pub fn contains_region(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Clamp `self` to `other`. The result may come out inverted.
    pub fn intersect(&mut self, other: &Self) {
        self.start = self.start.max(other.start);
        self.end = self.end.min(other.end);
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let mut region = *self;
        region.intersect(other);
        region
    }

    /// Start addresses for a `len`-byte pattern inside this range.
    pub fn candidate_starts(&self, len: usize) -> Self {
        if self.size() < len || len == 0 {
            return Self::empty_at(self.end);
        }
        Self::new(self.start, self.end - (len - 1))
    }

    pub fn covered_bytes(&self, len: usize) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::new(self.start, self.end.saturating_add(len.saturating_sub(1)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
