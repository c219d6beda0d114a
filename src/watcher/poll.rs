//! Polling event source for Android-style devices.
//!
//! Foreground app and rotation come from platform shell probes (`cmd
//! activity`, `dumpsys`), screen power from sysfs backlight nodes. Every
//! probe is detected at runtime, so the binary runs unmodified off device -
//! it simply observes nothing.

use crate::sysfs;
use crate::watcher::types::{Rotation, WatcherEvent};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shell probes tried in order until one yields a foreground package.
const FOREGROUND_PROBES: [&str; 3] = [
    "cmd activity get-top-activity 2>/dev/null",
    "dumpsys activity activities 2>/dev/null | grep -m 1 -E 'mResumedActivity|topResumedActivity'",
    "dumpsys window windows 2>/dev/null | grep -m 1 -E 'mCurrentFocus|mFocusedApp'",
];

const ROTATION_PROBE: &str = "dumpsys window displays 2>/dev/null | grep -m 1 mRotation";

/// Configuration for the polling watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Delay between polls.
    pub poll_interval: Duration,
    /// Whether to probe display rotation.
    pub watch_rotation: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            watch_rotation: true,
        }
    }
}

/// Errors that can occur operating the watcher.
#[derive(Debug)]
pub enum WatcherError {
    AlreadyRunning,
}

impl std::fmt::Display for WatcherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatcherError::AlreadyRunning => write!(f, "Watcher is already running"),
        }
    }
}

impl std::error::Error for WatcherError {}

/// Watcher thread handle. Events are delivered on a bounded channel; the
/// engine loop is the single consumer.
pub struct PollWatcher {
    config: WatcherConfig,
    sender: Sender<WatcherEvent>,
    receiver: Receiver<WatcherEvent>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PollWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        let (sender, receiver) = bounded(1024);
        Self {
            config,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start the polling thread.
    pub fn start(&mut self) -> Result<(), WatcherError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(WatcherError::AlreadyRunning);
        }

        let config = self.config.clone();
        let sender = self.sender.clone();
        let running = self.running.clone();
        self.handle = Some(thread::spawn(move || poll_loop(config, sender, running)));

        Ok(())
    }

    /// Stop the polling thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for watcher events.
    pub fn receiver(&self) -> &Receiver<WatcherEvent> {
        &self.receiver
    }
}

fn poll_loop(config: WatcherConfig, sender: Sender<WatcherEvent>, running: Arc<AtomicBool>) {
    let screen_probe = ScreenProbe::detect();
    match &screen_probe {
        Some(probe) => info!(path = %probe.path.display(), "screen probe found"),
        None => info!("screen probe not found, assuming screen always on"),
    }

    let mut screen_on = true;
    let mut last_package: Option<String> = None;
    let mut rotation = Rotation::default();

    while running.load(Ordering::SeqCst) {
        if let Some(probe) = &screen_probe {
            let on = probe.is_on();
            if on != screen_on {
                screen_on = on;
                debug!(screen_on = on, "screen state changed");
                let event = if on {
                    WatcherEvent::ScreenOn
                } else {
                    WatcherEvent::ScreenOff
                };
                if sender.try_send(event).is_err() {
                    warn!("event channel full, dropping screen event");
                }
                // The engine forgets the foreground app on screen events;
                // mirror that here so the next sighting is re-reported.
                last_package = None;
            }
        }

        if screen_on {
            if let Some(package) = foreground_package() {
                if last_package.as_deref() != Some(package.as_str()) {
                    debug!(package = %package, "foreground changed");
                    if sender
                        .try_send(WatcherEvent::ForegroundChanged(package.clone()))
                        .is_err()
                    {
                        warn!("event channel full, dropping foreground event");
                    }
                    last_package = Some(package);
                }
            }

            if config.watch_rotation {
                if let Some(current) = display_rotation() {
                    if current != rotation {
                        rotation = current;
                        debug!(code = current.code(), "rotation changed");
                        let _ = sender.try_send(WatcherEvent::RotationChanged(current));
                    }
                }
            }
        }

        thread::sleep(config.poll_interval);
    }
}

/// Screen power probe backed by one of the known sysfs nodes.
struct ScreenProbe {
    path: PathBuf,
    kind: ProbeKind,
}

enum ProbeKind {
    /// 0 = unblanked (screen on)
    FbBlank,
    /// > 0 = screen on
    Brightness,
    /// 0 = powered (screen on)
    BacklightPower,
}

impl ScreenProbe {
    fn detect() -> Option<Self> {
        let fb_blank = PathBuf::from("/sys/class/graphics/fb0/blank");
        if fb_blank.exists() {
            return Some(Self {
                path: fb_blank,
                kind: ProbeKind::FbBlank,
            });
        }

        let entries = std::fs::read_dir("/sys/class/backlight").ok()?;
        for entry in entries.flatten() {
            let brightness = entry.path().join("brightness");
            if brightness.exists() {
                return Some(Self {
                    path: brightness,
                    kind: ProbeKind::Brightness,
                });
            }
            let bl_power = entry.path().join("bl_power");
            if bl_power.exists() {
                return Some(Self {
                    path: bl_power,
                    kind: ProbeKind::BacklightPower,
                });
            }
        }
        None
    }

    fn is_on(&self) -> bool {
        let Some(value) = sysfs::read_i32(&self.path) else {
            return true;
        };
        match self.kind {
            ProbeKind::FbBlank => value == 0,
            ProbeKind::Brightness => value > 0,
            ProbeKind::BacklightPower => value == 0,
        }
    }
}

fn shell(cmd: &str) -> Option<String> {
    let sh = ["/system/bin/sh", "/bin/sh"]
        .into_iter()
        .find(|p| Path::new(p).exists())?;

    let output = Command::new(sh).args(["-c", cmd]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

/// Current foreground package, from the first probe that yields one.
fn foreground_package() -> Option<String> {
    for probe in FOREGROUND_PROBES {
        if let Some(out) = shell(probe) {
            for line in out.lines() {
                if let Some(package) = parse_package(line) {
                    return Some(package);
                }
            }
        }
    }
    None
}

/// Extract a package name from an activity-manager dump line. Component
/// names look like `com.example.app/.MainActivity`.
fn parse_package(line: &str) -> Option<String> {
    for token in line.split_whitespace() {
        if let Some((package, _activity)) = token.split_once('/') {
            let package = package
                .trim_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_'));
            if package.contains('.') {
                return Some(package.to_string());
            }
        }
    }
    None
}

fn display_rotation() -> Option<Rotation> {
    parse_rotation(&shell(ROTATION_PROBE)?)
}

/// Parse a `mRotation=` value, which is either a bare code (`mRotation=1`)
/// or a named constant (`mRotation=ROTATION_90`) depending on the platform
/// release.
fn parse_rotation(s: &str) -> Option<Rotation> {
    let start = s.find("mRotation=")? + "mRotation=".len();
    let rest = &s[start..];

    if let Some(degrees) = rest.strip_prefix("ROTATION_") {
        let degrees: String = degrees.chars().take_while(|c| c.is_ascii_digit()).collect();
        return match degrees.as_str() {
            "0" => Some(Rotation::Portrait),
            "90" => Some(Rotation::Landscape),
            "180" => Some(Rotation::PortraitInverted),
            "270" => Some(Rotation::LandscapeInverted),
            _ => None,
        };
    }

    Rotation::from_code(rest.chars().next()?.to_digit(10)? as i32)
}
