//! The kernel thermal policy sink.

use crate::sysfs;
use std::io;
use std::path::{Path, PathBuf};

/// Default thermal control node on supported devices.
pub const THERMAL_SCONFIG: &str = "/sys/class/thermal/thermal_message/sconfig";

/// Destination for thermal policy codes.
///
/// Writes are fire-and-forget: the engine logs failures and moves on, so
/// implementations should not retry internally.
pub trait ThermalSink {
    fn write_code(&mut self, code: &str) -> io::Result<()>;
}

/// Production sink writing one code per line to the thermal sysfs node.
pub struct SysfsThermalSink {
    path: PathBuf,
}

impl SysfsThermalSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Whether the node exists on this device.
    pub fn available(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SysfsThermalSink {
    fn default() -> Self {
        Self::new(THERMAL_SCONFIG)
    }
}

impl ThermalSink for SysfsThermalSink {
    fn write_code(&mut self, code: &str) -> io::Result<()> {
        sysfs::write_line(&self.path, code)
    }
}
