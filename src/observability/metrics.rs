//! Save and load counters
//!
//! - Counters only, monotonic
//! - Atomic, lock-free; Relaxed ordering is enough for counters
//! - A registry is owned by the host and shared with savers and loaders
//!   through `Arc`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct FormatMetrics {
    saves: AtomicU64,
    save_rejections: AtomicU64,
    bytes_written: AtomicU64,
    loads: AtomicU64,
    load_rejections: AtomicU64,
    scripts_disabled: AtomicU64,
    scripts_enabled: AtomicU64,
}

impl FormatMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed save of `bytes` bytes
    pub fn record_save(&self, bytes: u64) {
        self.saves.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_save_rejections(&self) {
        self.save_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_loads(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_load_rejections(&self) {
        self.load_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scripts_disabled(&self) {
        self.scripts_disabled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scripts_enabled(&self) {
        self.scripts_enabled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Exact values as a JSON object
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            saves: self.saves.load(Ordering::Relaxed),
            save_rejections: self.save_rejections.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_rejections: self.load_rejections.load(Ordering::Relaxed),
            scripts_disabled: self.scripts_disabled.load(Ordering::Relaxed),
            scripts_enabled: self.scripts_enabled.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub saves: u64,
    pub save_rejections: u64,
    pub bytes_written: u64,
    pub loads: u64,
    pub load_rejections: u64,
    pub scripts_disabled: u64,
    pub scripts_enabled: u64,
}
