//! The profile switching state machine.
//!
//! One engine instance owns the profile store, the thermal sink and the
//! optional touch feature, plus the in-memory observer state (last seen
//! foreground package, whether touch tuning is currently applied). All
//! events arrive through [`ProfileEngine::handle`] from a single consumer
//! loop, so transitions never interleave.
//!
//! Sink I/O is best-effort: failures are logged and swallowed, never
//! retried or propagated. Losing a thermal or touch write degrades comfort,
//! not correctness.

use crate::profile::{ProfileStore, ThermalCategory};
use crate::stats::SharedActivityLog;
use crate::thermal::ThermalSink;
use crate::touch::{TouchFeature, TouchMode, ALL_MODES};
use crate::watcher::{Rotation, WatcherEvent};
use tracing::{debug, info, warn};

pub struct ProfileEngine {
    store: ProfileStore,
    thermal: Box<dyn ThermalSink>,
    touch: Option<Box<dyn TouchFeature>>,
    stats: SharedActivityLog,

    last_package: Option<String>,
    touch_active: bool,
    rotation: Rotation,
}

impl ProfileEngine {
    /// Create an engine. `touch` is `None` on devices without the vendor
    /// touch surface; all touch operations then become no-ops.
    pub fn new(
        store: ProfileStore,
        thermal: Box<dyn ThermalSink>,
        touch: Option<Box<dyn TouchFeature>>,
        stats: SharedActivityLog,
    ) -> Self {
        Self {
            store,
            thermal,
            touch,
            stats,
            last_package: None,
            touch_active: false,
            rotation: Rotation::default(),
        }
    }

    /// Process one watcher event.
    pub fn handle(&mut self, event: WatcherEvent) {
        match event {
            WatcherEvent::ForegroundChanged(package) => self.on_foreground_changed(package),
            WatcherEvent::ScreenOn | WatcherEvent::ScreenOff => self.on_screen_event(),
            WatcherEvent::RotationChanged(rotation) => self.on_rotation_changed(rotation),
        }
    }

    /// Restore the default profile. Called on daemon shutdown.
    pub fn shutdown(&mut self) {
        info!("restoring default profile");
        self.last_package = None;
        self.write_thermal(ThermalCategory::Default);
        self.reset_touch(true);
    }

    /// Last seen foreground package.
    pub fn last_package(&self) -> Option<&str> {
        self.last_package.as_deref()
    }

    /// Whether touch tuning is currently applied.
    pub fn touch_active(&self) -> bool {
        self.touch_active
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProfileStore {
        &mut self.store
    }

    fn on_foreground_changed(&mut self, package: String) {
        if self.last_package.as_deref() == Some(package.as_str()) {
            return;
        }

        let category = self.store.category_of(&package);
        info!(package = %package, category = %category, code = category.code(), "applying profile");
        self.write_thermal(category);
        self.stats.record_foreground_switch();

        if category.boosts_touch() {
            self.apply_tuning(&package);
        } else if self.touch_active {
            self.reset_touch(false);
        }

        self.last_package = Some(package);
    }

    fn on_screen_event(&mut self) {
        debug!("screen event, resetting to default profile");
        self.last_package = None;
        self.write_thermal(ThermalCategory::Default);
        // Full reset regardless of whether tuning was applied.
        self.reset_touch(true);
    }

    fn on_rotation_changed(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        if !self.touch_active {
            return;
        }

        let Some(touch) = self.touch.as_mut() else {
            return;
        };
        if let Err(e) = touch.set_mode(TouchMode::Rotation, rotation.code()) {
            warn!(error = %e, "failed to forward touch rotation");
            self.stats.record_sink_failure();
        }
    }

    /// Push the per-app tuning tuple to the touch driver. Without a stored
    /// tuple this degenerates to a reset, leaving tuning inactive.
    fn apply_tuning(&mut self, package: &str) {
        if self.touch.is_none() {
            return;
        }

        self.reset_touch(false);

        let Some(tuning) = self.store.tuning_of(package) else {
            return;
        };

        let active_mode = i32::from(tuning.active_mode());
        let values = [
            (TouchMode::Tolerance, tuning.sensitivity),
            (TouchMode::UpThreshold, tuning.response),
            (TouchMode::EdgeFilter, tuning.resistance),
            (TouchMode::GameMode, tuning.game_mode),
            (TouchMode::ActiveMode, active_mode),
        ];

        let Some(touch) = self.touch.as_mut() else {
            return;
        };
        let mut failures = 0u32;
        for (mode, value) in values {
            if let Err(e) = touch.set_mode(mode, value) {
                warn!(error = %e, mode = ?mode, "failed to set touch mode");
                failures += 1;
            }
        }
        for _ in 0..failures {
            self.stats.record_sink_failure();
        }

        self.touch_active = true;
        self.stats.record_touch_apply();
        debug!(package = %package, active_mode, "touch tuning applied");

        // Re-applied tuning needs the current orientation forwarded.
        self.on_rotation_changed(self.rotation);
    }

    /// Reset every touch mode. With `force` the reset happens even when no
    /// tuning is applied (screen events and shutdown).
    fn reset_touch(&mut self, force: bool) {
        if !self.touch_active && !force {
            return;
        }

        let Some(touch) = self.touch.as_mut() else {
            self.touch_active = false;
            return;
        };

        let mut failures = 0u32;
        for mode in ALL_MODES {
            if let Err(e) = touch.reset_mode(mode) {
                warn!(error = %e, mode = ?mode, "failed to reset touch mode");
                failures += 1;
            }
        }
        for _ in 0..failures {
            self.stats.record_sink_failure();
        }

        if self.touch_active {
            self.stats.record_touch_reset();
        }
        self.touch_active = false;
    }

    fn write_thermal(&mut self, category: ThermalCategory) {
        match self.thermal.write_code(category.code()) {
            Ok(()) => self.stats.record_thermal_write(),
            Err(e) => {
                warn!(error = %e, code = category.code(), "failed to write thermal code");
                self.stats.record_sink_failure();
            }
        }
    }
}
