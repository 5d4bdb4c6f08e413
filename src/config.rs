// Tue Jan 13 2026 - Alex

use crate::pattern::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_PENDING_CAPACITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Most prefix keys the region cache will hold.
    pub cache_capacity: usize,
    /// Most keys waiting for background refinement.
    pub pending_capacity: usize,
    /// How long the idle worker sleeps before polling the queue again.
    pub worker_idle_timeout_ms: u64,
    pub worker_thread_name: String,
    /// Default for `SearchOptions::enable_cache`.
    pub enable_cache: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            pending_capacity: DEFAULT_PENDING_CAPACITY,
            worker_idle_timeout_ms: 5,
            worker_thread_name: "sigscan-refiner".to_string(),
            enable_cache: true,
        }
    }
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| format!("invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_pending_capacity(mut self, capacity: usize) -> Self {
        self.pending_capacity = capacity;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.worker_idle_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.enable_cache = enabled;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_idle_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cache_capacity == 0 {
            return Err("cache_capacity must be greater than 0".to_string());
        }
        if self.pending_capacity == 0 {
            return Err("pending_capacity must be greater than 0".to_string());
        }
        if self.worker_idle_timeout_ms == 0 {
            return Err("worker_idle_timeout_ms must be greater than 0".to_string());
        }
        if self.worker_thread_name.is_empty() {
            return Err("worker_thread_name must not be empty".to_string());
        }
        Ok(())
    }
}
