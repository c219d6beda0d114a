//! Thermal Profile Agent - foreground-app thermal and touch profile switcher.
//!
//! This library implements the policy core of a device daemon that watches
//! which application is in the foreground and applies a matching thermal
//! profile (a fixed code written to a kernel sysfs node). For
//! performance-sensitive categories (benchmark, gaming) it additionally
//! pushes per-app touchscreen tuning parameters to the vendor touch driver.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Thermal Profile Agent                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Watcher   │──▶│   Engine    │──▶│ ThermalSink │       │
//! │  │  (polling)  │   │(state mach.)│   │   (sysfs)   │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                           │                 │               │
//! │                           ▼                 ▼               │
//! │                    ┌─────────────┐   ┌─────────────┐       │
//! │                    │   Profile   │   │TouchFeature │       │
//! │                    │    Store    │   │  (vendor)   │       │
//! │                    └─────────────┘   └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! All three event sources (foreground changes, screen power, display
//! rotation) are funneled through a single channel into one engine instance,
//! so transitions are processed strictly in arrival order.
//!
//! # Example
//!
//! ```no_run
//! use thermal_profile_agent::{
//!     engine::ProfileEngine,
//!     profile::{ProfileStore, ThermalCategory},
//!     stats::create_shared_log,
//!     thermal::SysfsThermalSink,
//!     watcher::WatcherEvent,
//! };
//!
//! let mut store = ProfileStore::open("/tmp/profiles.json").expect("store");
//! store
//!     .set_category("com.example.game", ThermalCategory::Gaming)
//!     .expect("assign");
//!
//! let sink = SysfsThermalSink::default();
//! let mut engine = ProfileEngine::new(store, Box::new(sink), None, create_shared_log());
//! engine.handle(WatcherEvent::ForegroundChanged("com.example.game".into()));
//! ```

pub mod config;
pub mod engine;
pub mod profile;
pub mod stats;
pub mod sysfs;
pub mod thermal;
pub mod touch;
pub mod watcher;

// Re-export key types at crate root for convenience
pub use config::Config;
pub use engine::ProfileEngine;
pub use profile::{ProfileStore, StoreError, ThermalCategory, TouchTuning};
pub use stats::{ActivityLog, ActivityStats, SharedActivityLog};
pub use thermal::{SysfsThermalSink, ThermalSink};
pub use touch::{SysfsTouchFeature, TouchFeature, TouchMode};
pub use watcher::{PollWatcher, Rotation, WatcherConfig, WatcherEvent};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
