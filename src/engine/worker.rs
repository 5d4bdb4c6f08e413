// Tue Jan 13 2026 - Alex

use crate::engine::core::ScannerState;
use crate::engine::error::ScanResult;
use crate::memory::{MemoryReader, Region};
use crate::pattern::cache::{CacheKey, RegionCache};
use crate::pattern::matcher::{self, Direction};
use crate::pattern::signature::format_signature;
use log::{debug, trace, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Handle to the single background thread that drains the pending
/// refinement queue by running real scans.
pub struct RefinementWorker {
    handle: Option<JoinHandle<()>>,
}

impl RefinementWorker {
    pub fn new() -> Self {
        Self { handle: None }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn start(&mut self, state: &Arc<ScannerState>) -> std::io::Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        *state.shutdown.lock() = false;
        let shared = Arc::clone(state);
        let handle = thread::Builder::new()
            .name(state.config.worker_thread_name.clone())
            .spawn(move || worker_loop(&shared))?;

        debug!("Refinement worker '{}' started", state.config.worker_thread_name);
        self.handle = Some(handle);
        Ok(())
    }

    /// Blocks until the thread has exited.
    pub(crate) fn stop(&mut self, state: &ScannerState) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        *state.shutdown.lock() = true;
        state.wake.notify_all();

        if handle.join().is_err() {
            warn!("Refinement worker panicked before shutdown");
        }
        debug!("Refinement worker stopped");
    }
}

impl Default for RefinementWorker {
    fn default() -> Self {
        Self::new()
    }
}

fn worker_loop(state: &ScannerState) {
    let idle = state.config.idle_timeout();
    let mut refined = 0usize;

    loop {
        if *state.shutdown.lock() {
            break;
        }

        if refine_next(state.reader.as_ref(), &state.cache) {
            refined += 1;
            thread::yield_now();
            continue;
        }

        let mut shutdown = state.shutdown.lock();
        if *shutdown {
            break;
        }
        state.wake.wait_for(&mut shutdown, idle);
    }

    debug!("Refinement worker exiting after {} keys", refined);
}

/// Refine the oldest idle pending key. Returns `false` when nothing was
/// ready.
pub(crate) fn refine_next(reader: &dyn MemoryReader, cache: &RegionCache) -> bool {
    let Some((key, window)) = cache.claim_pending() else {
        return false;
    };
    let epoch = cache.epoch();
    refine_key(reader, cache, &key, window, epoch);
    cache.finish_pending(&key);
    true
}

fn refine_key(reader: &dyn MemoryReader, cache: &RegionCache, key: &CacheKey, window: Region, epoch: u64) {
    let bytes = key.bytes();
    let mask = key.mask();
    let mut region = cache.narrow(bytes, &mask, window, false);

    if !region.is_empty() {
        match scan_first(reader, bytes, &mask, region) {
            Ok(Some(offset)) => region.start = region.start + offset,
            Ok(None) => region = Region::empty_at(region.end),
            Err(e) => {
                trace!("Skipping refinement of {}: {}", format_signature(bytes, &mask), e);
                return;
            }
        }
    }

    trace!("Refined {} to {}", format_signature(bytes, &mask), region);
    cache.record_at_epoch(bytes, &mask, window, region, epoch);
}

fn scan_first(reader: &dyn MemoryReader, bytes: &[u8], mask: &[bool], region: Region) -> ScanResult<Option<usize>> {
    let haystack = reader.view(region.covered_bytes(bytes.len()))?;
    Ok(matcher::find_vector(bytes, mask, haystack, Direction::Forward)?)
}
