// Tue Jan 13 2026 - Alex

use std::fmt;
use std::ops::{Add, Sub};

/// An address in this process's address space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    value: usize,
}

impl Address {
    pub const fn new(value: usize) -> Self {
        Self { value }
    }

    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self { value: ptr as usize }
    }

    pub const fn as_usize(&self) -> usize {
        self.value
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.value as *const u8
    }

    pub const fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn saturating_add(&self, rhs: usize) -> Self {
        Self { value: self.value.saturating_add(rhs) }
    }

    pub fn saturating_sub(&self, rhs: usize) -> Self {
        Self { value: self.value.saturating_sub(rhs) }
    }

    /// Byte distance from `base` up to `self`, `None` when `self` lies below `base`.
    pub fn offset_from(&self, base: Address) -> Option<usize> {
        self.value.checked_sub(base.value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<usize> for Address {
    type Output = Self;
    fn add(self, rhs: usize) -> Self::Output {
        Self { value: self.value + rhs }
    }
}

impl Sub<usize> for Address {
    type Output = Self;
    fn sub(self, rhs: usize) -> Self::Output {
        Self { value: self.value - rhs }
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl From<Address> for usize {
    fn from(addr: Address) -> Self {
        addr.value
    }
}
