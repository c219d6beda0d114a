//! Integration tests for the profile switching pipeline

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thermal_profile_agent::{
    engine::ProfileEngine,
    profile::{ProfileStore, ThermalCategory, TouchTuning},
    stats::create_shared_log,
    thermal::ThermalSink,
    touch::{TouchFeature, TouchMode},
    watcher::{Rotation, WatcherEvent},
};

fn test_store_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join("thermal-agent-integration")
        .join(format!("{}-{}.json", name, std::process::id()))
}

#[derive(Clone, Default)]
struct SinkSpy {
    thermal: Arc<Mutex<Vec<String>>>,
    touch: Arc<Mutex<Vec<String>>>,
}

struct SpyThermal(SinkSpy);

impl ThermalSink for SpyThermal {
    fn write_code(&mut self, code: &str) -> io::Result<()> {
        self.0.thermal.lock().unwrap().push(code.to_string());
        Ok(())
    }
}

struct SpyTouch(SinkSpy);

impl TouchFeature for SpyTouch {
    fn set_mode(&mut self, mode: TouchMode, value: i32) -> io::Result<()> {
        self.0
            .touch
            .lock()
            .unwrap()
            .push(format!("set {} {}", mode.node(), value));
        Ok(())
    }

    fn reset_mode(&mut self, mode: TouchMode) -> io::Result<()> {
        self.0
            .touch
            .lock()
            .unwrap()
            .push(format!("reset {}", mode.node()));
        Ok(())
    }
}

#[test]
fn test_full_switch_cycle_through_public_api() {
    let path = test_store_path("full-cycle");
    let _ = std::fs::remove_file(&path);

    // Configure assignments the way the CLI would.
    let mut store = ProfileStore::empty(&path);
    store
        .set_category("com.bench", ThermalCategory::Benchmark)
        .unwrap();
    store
        .set_category("com.game", ThermalCategory::Gaming)
        .unwrap();
    store
        .set_tuning("com.game", TouchTuning::new(1, 3, 4, 5))
        .unwrap();

    // Reload from disk to prove the daemon sees persisted state.
    let store = ProfileStore::open(&path).unwrap();

    let spy = SinkSpy::default();
    let mut engine = ProfileEngine::new(
        store,
        Box::new(SpyThermal(spy.clone())),
        Some(Box::new(SpyTouch(spy.clone()))),
        create_shared_log(),
    );

    engine.handle(WatcherEvent::ForegroundChanged("com.bench".into()));
    engine.handle(WatcherEvent::ForegroundChanged("com.bench".into()));
    engine.handle(WatcherEvent::ForegroundChanged("com.game".into()));
    engine.handle(WatcherEvent::RotationChanged(Rotation::Landscape));
    engine.handle(WatcherEvent::ForegroundChanged("com.other".into()));
    engine.handle(WatcherEvent::ScreenOff);

    // Duplicate foreground event produced no second "10" write.
    assert_eq!(
        *spy.thermal.lock().unwrap(),
        vec!["10", "9", "0", "0"],
        "thermal writes: bench, game, other(default), screen-off(default)"
    );

    // com.game's tuning reached the driver, with the derived active mode.
    let touch_ops = spy.touch.lock().unwrap().clone();
    assert!(touch_ops.contains(&"set tolerance 4".to_string()));
    assert!(touch_ops.contains(&"set up_threshold 3".to_string()));
    assert!(touch_ops.contains(&"set edge_filter 5".to_string()));
    assert!(touch_ops.contains(&"set active_mode 1".to_string()));
    assert!(touch_ops.contains(&"set rotation 1".to_string()));

    assert_eq!(engine.last_package(), None);
    assert!(!engine.touch_active());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_thermal_only_device_runs_degraded() {
    let path = test_store_path("degraded");
    let _ = std::fs::remove_file(&path);

    let mut store = ProfileStore::empty(&path);
    store
        .set_category("com.game", ThermalCategory::Gaming)
        .unwrap();
    store
        .set_tuning("com.game", TouchTuning::new(1, 2, 3, 4))
        .unwrap();

    let spy = SinkSpy::default();
    let mut engine = ProfileEngine::new(
        store,
        Box::new(SpyThermal(spy.clone())),
        None,
        create_shared_log(),
    );

    engine.handle(WatcherEvent::ForegroundChanged("com.game".into()));
    engine.handle(WatcherEvent::RotationChanged(Rotation::Landscape));
    engine.handle(WatcherEvent::ScreenOff);

    // Thermal behavior is unaffected; no touch ops were attempted.
    assert_eq!(*spy.thermal.lock().unwrap(), vec!["9", "0"]);
    assert!(spy.touch.lock().unwrap().is_empty());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_stats_reflect_engine_activity() {
    let path = test_store_path("stats");
    let _ = std::fs::remove_file(&path);

    let mut store = ProfileStore::empty(&path);
    store
        .set_category("com.game", ThermalCategory::Gaming)
        .unwrap();
    store
        .set_tuning("com.game", TouchTuning::new(1, 2, 3, 4))
        .unwrap();

    let spy = SinkSpy::default();
    let stats = create_shared_log();
    let mut engine = ProfileEngine::new(
        store,
        Box::new(SpyThermal(spy.clone())),
        Some(Box::new(SpyTouch(spy.clone()))),
        stats.clone(),
    );

    engine.handle(WatcherEvent::ForegroundChanged("com.game".into()));
    engine.handle(WatcherEvent::ForegroundChanged("com.browser".into()));

    let snapshot = stats.stats();
    assert_eq!(snapshot.foreground_switches, 2);
    assert_eq!(snapshot.thermal_writes, 2);
    assert_eq!(snapshot.touch_applies, 1);
    assert_eq!(snapshot.touch_resets, 1);
    assert_eq!(snapshot.sink_failures, 0);

    let _ = std::fs::remove_file(&path);
}
