//! Thermal workload categories and their kernel policy codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A thermal workload class assignable to a package.
///
/// Each category maps to a fixed code understood by the kernel thermal
/// policy node. `Default` is never stored in the profile mapping; absence
/// of a package means default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThermalCategory {
    #[default]
    Default,
    Benchmark,
    Browser,
    Camera,
    Dialer,
    Gaming,
    Streaming,
}

/// Segment order of the legacy ':'-delimited store encoding.
///
/// The order is fixed by the wire format and must not change:
/// benchmark:browser:camera:dialer:gaming:streaming.
pub const STORED_CATEGORIES: [ThermalCategory; 6] = [
    ThermalCategory::Benchmark,
    ThermalCategory::Browser,
    ThermalCategory::Camera,
    ThermalCategory::Dialer,
    ThermalCategory::Gaming,
    ThermalCategory::Streaming,
];

impl ThermalCategory {
    /// The code written to the thermal control node for this category.
    pub fn code(&self) -> &'static str {
        match self {
            ThermalCategory::Default => "0",
            ThermalCategory::Dialer => "8",
            ThermalCategory::Gaming => "9",
            ThermalCategory::Benchmark => "10",
            ThermalCategory::Browser => "11",
            ThermalCategory::Camera => "12",
            ThermalCategory::Streaming => "14",
        }
    }

    /// Index of this category's segment in the legacy encoding, or `None`
    /// for `Default` (which is not stored).
    pub fn segment_index(&self) -> Option<usize> {
        STORED_CATEGORIES.iter().position(|c| c == self)
    }

    /// Whether this category gets per-app touchscreen tuning applied.
    pub fn boosts_touch(&self) -> bool {
        matches!(self, ThermalCategory::Benchmark | ThermalCategory::Gaming)
    }
}

impl fmt::Display for ThermalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThermalCategory::Default => "default",
            ThermalCategory::Benchmark => "benchmark",
            ThermalCategory::Browser => "browser",
            ThermalCategory::Camera => "camera",
            ThermalCategory::Dialer => "dialer",
            ThermalCategory::Gaming => "gaming",
            ThermalCategory::Streaming => "streaming",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ThermalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(ThermalCategory::Default),
            "benchmark" => Ok(ThermalCategory::Benchmark),
            "browser" => Ok(ThermalCategory::Browser),
            "camera" => Ok(ThermalCategory::Camera),
            "dialer" => Ok(ThermalCategory::Dialer),
            "gaming" => Ok(ThermalCategory::Gaming),
            "streaming" => Ok(ThermalCategory::Streaming),
            other => Err(format!("unknown thermal category: {other}")),
        }
    }
}
