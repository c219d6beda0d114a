//! Event types produced by the watcher.

/// Display orientation, mapped to the rotation codes the touch driver
/// understands (0-3, counterclockwise from natural portrait).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Portrait,
    Landscape,
    PortraitInverted,
    LandscapeInverted,
}

impl Rotation {
    /// Rotation code forwarded to the touch driver.
    pub fn code(&self) -> i32 {
        match self {
            Rotation::Portrait => 0,
            Rotation::Landscape => 1,
            Rotation::PortraitInverted => 2,
            Rotation::LandscapeInverted => 3,
        }
    }

    /// Map a platform rotation index (0-3) back to an orientation.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Rotation::Portrait),
            1 => Some(Rotation::Landscape),
            2 => Some(Rotation::PortraitInverted),
            3 => Some(Rotation::LandscapeInverted),
            _ => None,
        }
    }
}

/// An observation delivered to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherEvent {
    /// The foreground application changed to this package.
    ForegroundChanged(String),
    /// The screen turned on.
    ScreenOn,
    /// The screen turned off.
    ScreenOff,
    /// The display rotated to a new orientation.
    RotationChanged(Rotation),
}
