//! The vendor touchscreen feature surface.
//!
//! Supported devices expose a set of writable tuning nodes under a touch
//! class directory. Devices without the surface run thermal-only: the
//! engine holds no `TouchFeature` and every touch operation is a no-op.

use crate::sysfs;
use std::io;
use std::path::{Path, PathBuf};

/// Default vendor touch class directory.
pub const TOUCH_CLASS_DIR: &str = "/sys/class/touch/touch_dev";

/// Tunable parameters of the touch driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchMode {
    GameMode,
    ActiveMode,
    UpThreshold,
    Tolerance,
    EdgeFilter,
    Rotation,
}

/// All modes, in the order a full reset clears them.
pub const ALL_MODES: [TouchMode; 6] = [
    TouchMode::GameMode,
    TouchMode::ActiveMode,
    TouchMode::UpThreshold,
    TouchMode::Tolerance,
    TouchMode::EdgeFilter,
    TouchMode::Rotation,
];

impl TouchMode {
    /// Sysfs attribute name for this mode.
    pub fn node(&self) -> &'static str {
        match self {
            TouchMode::GameMode => "game_mode",
            TouchMode::ActiveMode => "active_mode",
            TouchMode::UpThreshold => "up_threshold",
            TouchMode::Tolerance => "tolerance",
            TouchMode::EdgeFilter => "edge_filter",
            TouchMode::Rotation => "rotation",
        }
    }
}

/// Capability interface of the vendor touch driver.
///
/// Like the thermal sink, calls are best-effort; the engine swallows and
/// logs failures.
pub trait TouchFeature {
    fn set_mode(&mut self, mode: TouchMode, value: i32) -> io::Result<()>;
    fn reset_mode(&mut self, mode: TouchMode) -> io::Result<()>;
}

/// Production implementation writing to the vendor touch class nodes.
pub struct SysfsTouchFeature {
    dir: PathBuf,
}

impl SysfsTouchFeature {
    /// Detect the touch surface. Returns `None` on devices without it, in
    /// which case the agent degrades to thermal-only behavior.
    pub fn detect(dir: impl AsRef<Path>) -> Option<Self> {
        let dir = dir.as_ref();
        if dir.is_dir() {
            Some(Self {
                dir: dir.to_path_buf(),
            })
        } else {
            None
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TouchFeature for SysfsTouchFeature {
    fn set_mode(&mut self, mode: TouchMode, value: i32) -> io::Result<()> {
        sysfs::write_num(&self.dir.join(mode.node()), value)
    }

    // The driver restores its stock value when 0 is written.
    fn reset_mode(&mut self, mode: TouchMode) -> io::Result<()> {
        sysfs::write_num(&self.dir.join(mode.node()), 0)
    }
}
