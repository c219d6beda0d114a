//! Cumulative activity counters.
//!
//! Tracks what the agent has done (profile switches, sink writes, touch
//! operations, failures) so `thermal-agent status` can show it without the
//! daemon exposing any other surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Activity counters for the current session.
#[derive(Debug)]
pub struct ActivityLog {
    foreground_switches: AtomicU64,
    thermal_writes: AtomicU64,
    touch_applies: AtomicU64,
    touch_resets: AtomicU64,
    sink_failures: AtomicU64,
    session_start: DateTime<Utc>,
    persist_path: Option<PathBuf>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            foreground_switches: AtomicU64::new(0),
            thermal_writes: AtomicU64::new(0),
            touch_applies: AtomicU64::new(0),
            touch_resets: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a log that persists across sessions via `path`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            debug!(error = %e, "no previous activity stats loaded");
        }

        log
    }

    pub fn record_foreground_switch(&self) {
        self.foreground_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_thermal_write(&self) {
        self.thermal_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_touch_apply(&self) {
        self.touch_applies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_touch_reset(&self) {
        self.touch_resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> ActivityStats {
        ActivityStats {
            foreground_switches: self.foreground_switches.load(Ordering::Relaxed),
            thermal_writes: self.thermal_writes.load(Ordering::Relaxed),
            touch_applies: self.touch_applies.load(Ordering::Relaxed),
            touch_resets: self.touch_resets.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds() as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Foreground switches applied: {}\n\
             - Thermal codes written: {}\n\
             - Touch tunings applied: {}\n\
             - Touch resets: {}\n\
             - Sink failures (ignored): {}\n\
             - Session duration: {} seconds",
            stats.foreground_switches,
            stats.thermal_writes,
            stats.touch_applies,
            stats.touch_resets,
            stats.sink_failures,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                foreground_switches: stats.foreground_switches,
                thermal_writes: stats.thermal_writes,
                touch_applies: stats.touch_applies,
                touch_resets: stats.touch_resets,
                sink_failures: stats.sink_failures,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.foreground_switches
                    .store(persisted.foreground_switches, Ordering::Relaxed);
                self.thermal_writes
                    .store(persisted.thermal_writes, Ordering::Relaxed);
                self.touch_applies
                    .store(persisted.touch_applies, Ordering::Relaxed);
                self.touch_resets
                    .store(persisted.touch_resets, Ordering::Relaxed);
                self.sink_failures
                    .store(persisted.sink_failures, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.foreground_switches.store(0, Ordering::Relaxed);
        self.thermal_writes.store(0, Ordering::Relaxed);
        self.touch_applies.store(0, Ordering::Relaxed);
        self.touch_resets.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of activity statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityStats {
    pub foreground_switches: u64,
    pub thermal_writes: u64,
    pub touch_applies: u64,
    pub touch_resets: u64,
    pub sink_failures: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    foreground_switches: u64,
    thermal_writes: u64,
    touch_applies: u64,
    touch_resets: u64,
    sink_failures: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared activity log.
pub type SharedActivityLog = Arc<ActivityLog>;

/// Create a new shared activity log.
pub fn create_shared_log() -> SharedActivityLog {
    Arc::new(ActivityLog::new())
}

/// Create a new shared activity log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedActivityLog {
    Arc::new(ActivityLog::with_persistence(path))
}
