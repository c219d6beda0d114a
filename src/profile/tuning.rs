//! Per-app touchscreen tuning parameters.

use serde::{Deserialize, Serialize};

/// Touchscreen tuning values forwarded to the vendor touch driver when a
/// benchmark or gaming app comes to the foreground.
///
/// Legacy wire format: a comma-separated list in the fixed index order
/// game_mode,response,sensitivity,resistance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TouchTuning {
    /// Vendor game-mode switch
    pub game_mode: i32,
    /// Touch-up response threshold
    pub response: i32,
    /// Touch tolerance / sensitivity
    pub sensitivity: i32,
    /// Edge accidental-touch resistance
    pub resistance: i32,
}

impl TouchTuning {
    pub fn new(game_mode: i32, response: i32, sensitivity: i32, resistance: i32) -> Self {
        Self {
            game_mode,
            response,
            sensitivity,
            resistance,
        }
    }

    /// Derived active-mode flag: set iff response, sensitivity and
    /// resistance are all non-zero.
    pub fn active_mode(&self) -> bool {
        self.response != 0 && self.sensitivity != 0 && self.resistance != 0
    }

    /// Encode to the legacy comma-separated store value.
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{}",
            self.game_mode, self.response, self.sensitivity, self.resistance
        )
    }

    /// Decode from the legacy comma-separated store value.
    ///
    /// Returns `None` for a malformed value (wrong field count or
    /// non-numeric field); callers treat that as "no tuning configured".
    pub fn from_csv(value: &str) -> Option<Self> {
        let fields: Vec<&str> = value.split(',').collect();
        if fields.len() != 4 {
            return None;
        }

        let mut parsed = [0i32; 4];
        for (slot, field) in parsed.iter_mut().zip(&fields) {
            *slot = field.trim().parse().ok()?;
        }

        Some(Self::new(parsed[0], parsed[1], parsed[2], parsed[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_mode_requires_all_three() {
        assert!(TouchTuning::new(0, 1, 2, 3).active_mode());
        assert!(!TouchTuning::new(1, 0, 2, 3).active_mode());
        assert!(!TouchTuning::new(1, 1, 0, 3).active_mode());
        assert!(!TouchTuning::new(1, 1, 2, 0).active_mode());
        assert!(!TouchTuning::default().active_mode());
    }

    #[test]
    fn test_csv_roundtrip() {
        let tuning = TouchTuning::new(1, 2, 3, 4);
        assert_eq!(tuning.to_csv(), "1,2,3,4");
        assert_eq!(TouchTuning::from_csv("1,2,3,4"), Some(tuning));
    }

    #[test]
    fn test_csv_rejects_malformed() {
        assert_eq!(TouchTuning::from_csv(""), None);
        assert_eq!(TouchTuning::from_csv("1,2,3"), None);
        assert_eq!(TouchTuning::from_csv("1,2,3,4,5"), None);
        assert_eq!(TouchTuning::from_csv("1,x,3,4"), None);
    }
}
