// Tue Jan 13 2026 - Alex

use crate::config::ScannerConfig;
use crate::engine::error::{ScanError, ScanResult};
use crate::engine::worker::{self, RefinementWorker};
use crate::memory::{Address, MemoryError, MemoryReader, Region};
use crate::pattern::cache::{RegionCache, KEY_WIDTH};
use crate::pattern::matcher::{self, Direction};
use crate::pattern::Pattern;
use crate::utils::{format_bytes, format_duration, measure_time};
use log::{debug, trace};
use parking_lot::{Condvar, Mutex};
use rayon::prelude::*;
use std::sync::Arc;

/// Per-call cache behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Narrow the scan with cached regions.
    pub enable_cache: bool,
    /// Record the outcome and queue misses for background refinement.
    pub allow_cache_write: bool,
}

impl SearchOptions {
    pub fn uncached() -> Self {
        Self {
            enable_cache: false,
            allow_cache_write: false,
        }
    }

    pub fn read_only() -> Self {
        Self {
            enable_cache: true,
            allow_cache_write: false,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            enable_cache: true,
            allow_cache_write: true,
        }
    }
}

/// State shared between callers and the refinement thread.
pub(crate) struct ScannerState {
    pub(crate) reader: Arc<dyn MemoryReader>,
    pub(crate) cache: RegionCache,
    pub(crate) config: ScannerConfig,
    pub(crate) shutdown: Mutex<bool>,
    pub(crate) wake: Condvar,
}

/// Searches one memory reader for signatures, learning where each prefix
/// can occur so later searches scan less.
///
/// Cached regions are only valid while the scanned bytes are unchanged; call
/// [`evict_cache`](Self::evict_cache) after the memory is modified.
pub struct SignatureScanner {
    state: Arc<ScannerState>,
    worker: Mutex<RefinementWorker>,
}

impl SignatureScanner {
    pub fn new<R: MemoryReader + 'static>(reader: R) -> Self {
        Self::build(Arc::new(reader), ScannerConfig::default())
    }

    pub fn with_config<R: MemoryReader + 'static>(reader: R, config: ScannerConfig) -> ScanResult<Self> {
        Self::from_shared(Arc::new(reader), config)
    }

    pub fn from_shared(reader: Arc<dyn MemoryReader>, config: ScannerConfig) -> ScanResult<Self> {
        config.validate().map_err(ScanError::Config)?;
        Ok(Self::build(reader, config))
    }

    fn build(reader: Arc<dyn MemoryReader>, config: ScannerConfig) -> Self {
        let cache = RegionCache::new(config.cache_capacity, config.pending_capacity);
        Self {
            state: Arc::new(ScannerState {
                reader,
                cache,
                config,
                shutdown: Mutex::new(false),
                wake: Condvar::new(),
            }),
            worker: Mutex::new(RefinementWorker::new()),
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.state.config
    }

    pub fn reader(&self) -> &dyn MemoryReader {
        self.state.reader.as_ref()
    }

    /// Options honouring the configured cache default.
    pub fn default_options(&self) -> SearchOptions {
        SearchOptions {
            enable_cache: self.state.config.enable_cache,
            allow_cache_write: self.state.config.enable_cache,
        }
    }

    pub fn search(
        &self,
        pattern: &Pattern,
        start: Address,
        end: Address,
        direction: Direction,
        options: SearchOptions,
    ) -> ScanResult<Option<Address>> {
        self.search_bytes(pattern.bytes(), pattern.mask(), start, end, direction, options)
    }

    pub fn search_signature(
        &self,
        signature: &str,
        start: Address,
        end: Address,
        direction: Direction,
        options: SearchOptions,
    ) -> ScanResult<Option<Address>> {
        let pattern = Pattern::parse(signature)?;
        self.search(&pattern, start, end, direction, options)
    }

    /// Find the first (forward) or last (backward) address in `[start, end)`
    /// at which the whole pattern matches.
    pub fn search_bytes(
        &self,
        bytes: &[u8],
        mask: &[bool],
        start: Address,
        end: Address,
        direction: Direction,
        options: SearchOptions,
    ) -> ScanResult<Option<Address>> {
        let (bytes, mask) = matcher::trim_trailing_wildcards(bytes, mask);
        matcher::validate(bytes, mask)?;
        if start > end {
            return Err(MemoryError::InvalidRange {
                start: start.as_usize(),
                end: end.as_usize(),
            }
            .into());
        }

        let state = &*self.state;
        let window = Region::new(start, end);
        let haystack = state.reader.view(window)?;
        let len = bytes.len();
        if haystack.len() < len {
            return Ok(None);
        }

        let epoch = state.cache.epoch();
        let narrowed = if options.enable_cache {
            state.cache.narrow(bytes, mask, window, options.allow_cache_write)
        } else {
            window.candidate_starts(len)
        };

        let found = if narrowed.is_empty() {
            None
        } else {
            let from = narrowed.start.as_usize() - start.as_usize();
            let to = narrowed.covered_bytes(len).end.as_usize() - start.as_usize();
            let slice = &haystack[from..to];
            trace!(
                "Scanning {} of {} candidates with the {} tier",
                narrowed.size(),
                window.candidate_starts(len).size(),
                matcher::select_tier(mask, slice.len(), direction)
            );
            matcher::find(bytes, mask, slice, direction)?.map(|offset| narrowed.start + offset)
        };

        if options.enable_cache && options.allow_cache_write && len <= KEY_WIDTH {
            let learned = match (found, direction) {
                (Some(at), Direction::Forward) => Region::new(at, narrowed.end),
                (Some(at), Direction::Backward) => Region::new(narrowed.start, at + 1),
                (None, _) => Region::empty_at(narrowed.end),
            };
            state.cache.record_at_epoch(bytes, mask, window, learned, epoch);
        }

        Ok(found)
    }

    /// Resolve many signatures over the same range in parallel. Results are
    /// in input order.
    pub fn search_many<S: AsRef<str> + Sync>(
        &self,
        signatures: &[S],
        start: Address,
        end: Address,
        direction: Direction,
        options: SearchOptions,
    ) -> Vec<ScanResult<Option<Address>>> {
        let (results, elapsed): (Vec<_>, _) = measure_time(|| {
            signatures
                .par_iter()
                .map(|signature| self.search_signature(signature.as_ref(), start, end, direction, options))
                .collect()
        });
        debug!(
            "Resolved {} signatures over {} in {}",
            signatures.len(),
            format_bytes(end.as_usize().saturating_sub(start.as_usize()) as u64),
            format_duration(elapsed)
        );
        results
    }

    /// Drop every cached region and pending refinement.
    pub fn evict_cache(&self) {
        self.state.cache.evict();
        debug!("Region cache evicted");
    }

    pub fn start_background_worker(&self) -> ScanResult<()> {
        self.worker.lock().start(&self.state)?;
        Ok(())
    }

    pub fn stop_background_worker(&self) {
        self.worker.lock().stop(&self.state);
    }

    pub fn is_worker_running(&self) -> bool {
        self.worker.lock().is_running()
    }

    /// Run one unit of refinement on the calling thread. Returns `false` when
    /// the queue had nothing ready.
    pub fn refine_once(&self) -> bool {
        worker::refine_next(self.state.reader.as_ref(), &self.state.cache)
    }

    pub fn cache_len(&self) -> usize {
        self.state.cache.len()
    }

    pub fn pending_len(&self) -> usize {
        self.state.cache.pending_len()
    }
}

impl Drop for SignatureScanner {
    fn drop(&mut self) {
        self.worker.get_mut().stop(&self.state);
    }
}
