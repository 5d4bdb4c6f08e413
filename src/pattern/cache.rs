// Tue Jan 13 2026 - Alex

use crate::memory::Region;
use crate::utils::hash::HashComputer;
use ahash::AHashMap;
use indexmap::IndexMap;
use log::trace;
use parking_lot::{Mutex, RwLock};
use std::hash::{Hash, Hasher};

/// Longest prefix a cache key covers.
pub const KEY_WIDTH: usize = 8;

pub const DEFAULT_CACHE_CAPACITY: usize = 2000;
pub const DEFAULT_PENDING_CAPACITY: usize = 200;

/// First `KEY_WIDTH` bytes of a pattern, wildcards zeroed.
#[derive(Debug, Clone, Copy, Eq)]
pub struct CacheKey {
    bytes: [u8; KEY_WIDTH],
    mask: u8,
    len: u8,
    hash: u64,
}

impl CacheKey {
    pub fn new(bytes: &[u8], mask: &[bool]) -> Self {
        let len = bytes.len().min(mask.len()).min(KEY_WIDTH);
        let mut packed = [0u8; KEY_WIDTH];
        let mut mask_bits = 0u8;
        for i in 0..len {
            if mask[i] {
                packed[i] = bytes[i];
                mask_bits |= 1 << i;
            }
        }
        let meta = mask_bits as u64 | (len as u64) << 8;
        let hash = HashComputer::mix64(u64::from_le_bytes(packed) ^ HashComputer::mix64(meta));
        Self {
            bytes: packed,
            mask: mask_bits,
            len: len as u8,
            hash,
        }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    pub fn mask(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.mask & (1 << i) != 0).collect()
    }

    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes && self.mask == other.mask && self.len == other.len
    }
}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRefinement {
    pub in_progress: bool,
    pub window: Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedRegion {
    pub window: Region,
    pub region: Region,
}

impl CachedRegion {
    pub fn applies_to(&self, window: &Region) -> bool {
        self.window.contains_region(window)
    }
}

struct RegionMap {
    entries: AHashMap<CacheKey, CachedRegion>,
    epoch: u64,
}

/// Prefix key to candidate start region. Entries hold until the next
/// [`evict`](RegionCache::evict).
pub struct RegionCache {
    regions: RwLock<RegionMap>,
    pending: Mutex<IndexMap<CacheKey, PendingRefinement>>,
    cache_capacity: usize,
    pending_capacity: usize,
}

impl RegionCache {
    pub fn new(cache_capacity: usize, pending_capacity: usize) -> Self {
        Self {
            regions: RwLock::new(RegionMap {
                entries: AHashMap::new(),
                epoch: 0,
            }),
            pending: Mutex::new(IndexMap::new()),
            cache_capacity,
            pending_capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.regions.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn epoch(&self) -> u64 {
        self.regions.read().epoch
    }

    pub fn lookup(&self, key: &CacheKey) -> Option<CachedRegion> {
        self.regions.read().entries.get(key).copied()
    }

    /// Narrow the candidate starts of a pattern inside `window`. Misses are
    /// queued for refinement when `allow_enqueue` is set.
    pub fn narrow(&self, bytes: &[u8], mask: &[bool], window: Region, allow_enqueue: bool) -> Region {
        let mut region = window.candidate_starts(bytes.len());
        if region.is_empty() {
            return region;
        }

        let mut misses = Vec::new();
        {
            let map = self.regions.read();
            narrow_prefixes(&map.entries, bytes, mask, &window, &mut region, &mut misses);

            if bytes.len() > KEY_WIDTH && !region.is_empty() {
                for i in 1..bytes.len() {
                    if !mask[i] {
                        continue;
                    }
                    let mut shifted = Region::new(region.start.saturating_add(i), region.end.saturating_add(i));
                    narrow_prefixes(&map.entries, &bytes[i..], &mask[i..], &window, &mut shifted, &mut misses);
                    region.start = region.start.max(shifted.start.saturating_sub(i));
                    if region.is_empty() {
                        break;
                    }
                }
            }
        }

        if allow_enqueue && !misses.is_empty() {
            self.enqueue(misses, window);
        }
        region
    }

    pub fn record(&self, bytes: &[u8], mask: &[bool], window: Region, region: Region) -> bool {
        let epoch = self.epoch();
        self.record_at_epoch(bytes, mask, window, region, epoch)
    }

    /// Like [`record`](Self::record), but dropped if the cache was evicted
    /// since `epoch` was read.
    pub fn record_at_epoch(
        &self,
        bytes: &[u8],
        mask: &[bool],
        window: Region,
        region: Region,
        epoch: u64,
    ) -> bool {
        if bytes.is_empty() || bytes.len() > KEY_WIDTH {
            return false;
        }
        let key = CacheKey::new(bytes, mask);
        let mut map = self.regions.write();
        if map.epoch != epoch {
            trace!("Dropping region {} recorded across an eviction", region);
            return false;
        }
        if map.entries.len() >= self.cache_capacity && !map.entries.contains_key(&key) {
            trace!("Region cache full ({} entries), dropping new key", map.entries.len());
            return false;
        }
        map.entries.insert(key, CachedRegion { window, region });
        true
    }

    pub fn evict(&self) {
        let mut map = self.regions.write();
        map.epoch = map.epoch.wrapping_add(1);
        map.entries.clear();
        self.pending.lock().clear();
    }

    fn enqueue(&self, keys: Vec<CacheKey>, window: Region) {
        let mut pending = self.pending.lock();
        for key in keys {
            if pending.len() >= self.pending_capacity {
                trace!("Refinement queue full, {} entries pending", pending.len());
                break;
            }
            pending.entry(key).or_insert(PendingRefinement {
                in_progress: false,
                window,
            });
        }
    }

    pub fn has_ready_pending(&self) -> bool {
        self.pending.lock().values().any(|entry| !entry.in_progress)
    }

    pub(crate) fn claim_pending(&self) -> Option<(CacheKey, Region)> {
        let mut pending = self.pending.lock();
        let (key, entry) = pending.iter_mut().find(|(_, entry)| !entry.in_progress)?;
        entry.in_progress = true;
        Some((*key, entry.window))
    }

    /// Remove a claimed key. A key re-queued after an eviction is left alone.
    pub(crate) fn finish_pending(&self, key: &CacheKey) {
        let mut pending = self.pending.lock();
        if pending.get(key).is_some_and(|entry| entry.in_progress) {
            pending.shift_remove(key);
        }
    }
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_PENDING_CAPACITY)
    }
}

fn narrow_prefixes(
    entries: &AHashMap<CacheKey, CachedRegion>,
    bytes: &[u8],
    mask: &[bool],
    window: &Region,
    region: &mut Region,
    misses: &mut Vec<CacheKey>,
) {
    for i in 0..bytes.len().min(KEY_WIDTH) {
        if i > 0 && !mask[i] {
            continue;
        }
        let key = CacheKey::new(&bytes[..=i], &mask[..=i]);
        match entries.get(&key).filter(|entry| entry.applies_to(window)) {
            Some(entry) => {
                region.intersect(&entry.region);
                if region.is_empty() {
                    return;
                }
            }
            None => misses.push(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Address;

    fn region(start: usize, end: usize) -> Region {
        Region::new(Address::new(start), Address::new(end))
    }

    const WINDOW: Region = Region::new(Address::new(0x1000), Address::new(0x2000));

    #[test]
    fn test_key_ignores_wildcard_content() {
        let a = CacheKey::new(&[0x48, 0xAA, 0x05], &[true, false, true]);
        let b = CacheKey::new(&[0x48, 0xBB, 0x05], &[true, false, true]);
        assert_eq!(a, b);
        assert_eq!(a.hash_value(), b.hash_value());
        assert_eq!(a.bytes(), &[0x48, 0x00, 0x05]);
    }

    #[test]
    fn test_colliding_hashes_stay_distinct() {
        let a = CacheKey { bytes: [0x48, 0, 0, 0, 0, 0, 0, 0], mask: 0b1, len: 1, hash: 0xDEAD };
        let b = CacheKey { bytes: [0xE8, 0, 0, 0, 0, 0, 0, 0], mask: 0b1, len: 1, hash: 0xDEAD };
        assert_eq!(a.hash_value(), b.hash_value());
        assert_ne!(a, b);

        let cache = RegionCache::default();
        {
            let mut map = cache.regions.write();
            map.entries.insert(a, CachedRegion { window: WINDOW, region: region(0x1100, 0x1200) });
            map.entries.insert(b, CachedRegion { window: WINDOW, region: region(0x1800, 0x1900) });
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(&a).unwrap().region, region(0x1100, 0x1200));
        assert_eq!(cache.lookup(&b).unwrap().region, region(0x1800, 0x1900));
    }

    #[test]
    fn test_key_distinguishes_mask_and_length() {
        let exact = CacheKey::new(&[0x48, 0x00], &[true, true]);
        let wild = CacheKey::new(&[0x48, 0x00], &[true, false]);
        let short = CacheKey::new(&[0x48], &[true]);
        assert_ne!(exact, wild);
        assert_ne!(exact, short);
        assert_ne!(wild, short);
    }

    #[test]
    fn test_key_truncates_to_width() {
        let long: Vec<u8> = (1..=12).collect();
        let key = CacheKey::new(&long, &[true; 12]);
        assert_eq!(key.len(), KEY_WIDTH);
        assert_eq!(key, CacheKey::new(&long[..8], &[true; 8]));
        assert_eq!(key.mask(), vec![true; 8]);
    }

    #[test]
    fn test_cold_narrow_enqueues_each_prefix_once() {
        let cache = RegionCache::default();
        let window = region(0x1000, 0x1064);
        let bytes = [0x01, 0x02, 0x03, 0x04];
        let mask = [true; 4];

        let narrowed = cache.narrow(&bytes, &mask, window, true);
        assert_eq!(narrowed, window.candidate_starts(4));
        assert_eq!(cache.pending_len(), 4);

        cache.narrow(&bytes, &mask, window, true);
        assert_eq!(cache.pending_len(), 4);
    }

    #[test]
    fn test_narrow_without_enqueue_leaves_queue_alone() {
        let cache = RegionCache::default();
        cache.narrow(&[0x01, 0x02], &[true, true], region(0x1000, 0x2000), false);
        assert_eq!(cache.pending_len(), 0);
    }

    #[test]
    fn test_wildcard_positions_are_not_probed() {
        let cache = RegionCache::default();
        cache.narrow(&[0x01, 0x00, 0x03], &[true, false, true], region(0x1000, 0x2000), true);
        // Prefixes of length 1 and 3 only.
        assert_eq!(cache.pending_len(), 2);
    }

    #[test]
    fn test_hit_intersects_both_bounds() {
        let cache = RegionCache::default();
        let bytes = [0xE8, 0x11];
        let mask = [true, true];
        assert!(cache.record(&bytes, &mask, WINDOW, region(0x1400, 0x1800)));

        let narrowed = cache.narrow(&bytes, &mask, WINDOW, false);
        assert_eq!(narrowed, region(0x1400, 0x1800));
        let inner = cache.narrow(&bytes, &mask, region(0x1500, 0x1600), false);
        assert_eq!(inner, region(0x1500, 0x15ff));
    }

    #[test]
    fn test_foreign_window_is_not_applied() {
        let cache = RegionCache::default();
        cache.record(&[0xE8], &[true], region(0x2000, 0x3000), Region::empty_at(Address::new(0x3000)));

        let narrowed = cache.narrow(&[0xE8], &[true], WINDOW, true);
        assert_eq!(narrowed, WINDOW);
        assert_eq!(cache.pending_len(), 1);
    }

    #[test]
    fn test_empty_entry_collapses_region() {
        let cache = RegionCache::default();
        cache.record(&[0xCC], &[true], WINDOW, Region::empty_at(Address::new(0x1fff)));
        let narrowed = cache.narrow(&[0xCC, 0x90], &[true, true], region(0x1000, 0x2000), true);
        assert!(narrowed.is_empty());
    }

    #[test]
    fn test_sub_pattern_raises_start_only() {
        let cache = RegionCache::default();
        let bytes: Vec<u8> = (0x10..0x1A).collect();
        let mask = vec![true; bytes.len()];
        let window = region(0x1000, 0x2000);

        // Byte at offset 3 is first seen at 0x1503.
        cache.record(&bytes[3..4], &mask[3..4], window, region(0x1503, 0x1fff));

        let narrowed = cache.narrow(&bytes, &mask, window, false);
        assert_eq!(narrowed.start, Address::new(0x1500));
        assert_eq!(narrowed.end, window.candidate_starts(bytes.len()).end);
    }

    #[test]
    fn test_record_ignores_long_patterns() {
        let cache = RegionCache::default();
        let bytes = [0u8; 9];
        assert!(!cache.record(&bytes, &[true; 9], WINDOW, region(0x1000, 0x2000)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_drops_new_keys_only() {
        let cache = RegionCache::new(3, 2);
        for b in 0u8..5 {
            cache.record(&[b], &[true], WINDOW, region(0x1000, 0x2000));
        }
        assert_eq!(cache.len(), 3);
        assert!(cache.record(&[0], &[true], WINDOW, region(0x1800, 0x2000)));
        let entry = cache.lookup(&CacheKey::new(&[0], &[true])).unwrap();
        assert_eq!(entry.region, region(0x1800, 0x2000));
        assert_eq!(entry.window, WINDOW);

        cache.narrow(&[0x70, 0x71, 0x72], &[true; 3], region(0x1000, 0x2000), true);
        assert_eq!(cache.pending_len(), 2);
    }

    #[test]
    fn test_evict_clears_and_fences_old_records() {
        let cache = RegionCache::default();
        cache.record(&[0x90], &[true], WINDOW, region(0x1000, 0x2000));
        cache.narrow(&[0x91], &[true], region(0x1000, 0x2000), true);
        let epoch = cache.epoch();

        cache.evict();
        cache.evict();
        assert!(cache.is_empty());
        assert_eq!(cache.pending_len(), 0);
        assert!(!cache.record_at_epoch(&[0x90], &[true], WINDOW, region(0x1000, 0x2000), epoch));
        assert!(cache.record(&[0x90], &[true], WINDOW, region(0x1000, 0x2000)));
    }

    #[test]
    fn test_claim_and_finish_pending() {
        let cache = RegionCache::default();
        let window = region(0x1000, 0x2000);
        cache.narrow(&[0x01, 0x02], &[true, true], window, true);

        let (first, claimed_window) = cache.claim_pending().unwrap();
        assert_eq!(first, CacheKey::new(&[0x01], &[true]));
        assert_eq!(claimed_window, window);

        let (second, _) = cache.claim_pending().unwrap();
        assert_eq!(second, CacheKey::new(&[0x01, 0x02], &[true, true]));
        assert!(cache.claim_pending().is_none());
        assert!(!cache.has_ready_pending());

        cache.finish_pending(&first);
        cache.finish_pending(&second);
        assert_eq!(cache.pending_len(), 0);
    }
}
