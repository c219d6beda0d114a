//! Event sources feeding the profile engine.
//!
//! The watcher observes foreground-app changes, screen power transitions
//! and display rotation, and delivers them as [`WatcherEvent`]s on a single
//! bounded channel so the engine processes them in arrival order.

pub mod poll;
pub mod types;

// Re-export commonly used types
pub use poll::{PollWatcher, WatcherConfig, WatcherError};
pub use types::{Rotation, WatcherEvent};
