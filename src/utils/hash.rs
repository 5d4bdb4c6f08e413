// Tue Jan 15 2026 - Alex

/// Hash helpers for fixed-width keys
pub struct HashComputer;

impl HashComputer {
    /// SplitMix64 finalizer. Every input bit affects every output bit, which
    /// keeps packed byte words from clustering in a hash table.
    pub fn mix64(mut value: u64) -> u64 {
        value = (value ^ (value >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        value = (value ^ (value >> 27)).wrapping_mul(0x94d049bb133111eb);
        value ^ (value >> 31)
    }
}
