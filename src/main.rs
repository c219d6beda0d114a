//! Thermal Profile Agent CLI
//!
//! Foreground-app thermal and touch profile switcher.

use clap::{Parser, Subcommand};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thermal_profile_agent::{
    config::Config,
    engine::ProfileEngine,
    profile::{ProfileStore, ThermalCategory, TouchTuning},
    stats::create_shared_log_with_persistence,
    thermal::SysfsThermalSink,
    touch::{SysfsTouchFeature, TouchFeature},
    watcher::{PollWatcher, WatcherConfig},
    VERSION,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thermal-agent")]
#[command(version = VERSION)]
#[command(about = "Foreground-app thermal and touch profile switcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the profile switcher daemon
    Start {
        /// Foreground poll interval in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Skip touch tuning even if the touch surface is present
        #[arg(long)]
        thermal_only: bool,
    },

    /// Assign a package to a thermal category
    Assign {
        /// Package name (e.g. com.example.game)
        package: String,

        /// Category: default, benchmark, browser, camera, dialer, gaming or
        /// streaming. "default" removes the assignment.
        category: String,
    },

    /// Configure per-package touch tuning
    Tuning {
        /// Package name
        package: String,

        /// Remove the stored tuning instead of setting it
        #[arg(long)]
        clear: bool,

        /// Vendor game-mode value
        #[arg(long, default_value_t = 0)]
        game_mode: i32,

        /// Touch-up response threshold
        #[arg(long, default_value_t = 0)]
        response: i32,

        /// Touch sensitivity
        #[arg(long, default_value_t = 0)]
        sensitivity: i32,

        /// Edge accidental-touch resistance
        #[arg(long, default_value_t = 0)]
        resistance: i32,
    },

    /// Show current assignments and cumulative stats
    Status,

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            poll_interval_ms,
            thermal_only,
        } => {
            cmd_start(poll_interval_ms, thermal_only);
        }
        Commands::Assign { package, category } => {
            cmd_assign(&package, &category);
        }
        Commands::Tuning {
            package,
            clear,
            game_mode,
            response,
            sensitivity,
            resistance,
        } => {
            cmd_tuning(&package, clear, game_mode, response, sensitivity, resistance);
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_start(poll_interval_ms: Option<u64>, thermal_only: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = VERSION, "thermal profile agent starting");

    let mut config = Config::load().unwrap_or_default();
    if let Some(ms) = poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Err(e) = config.ensure_directories() {
        warn!(error = %e, "could not create data directories");
    }

    let store = match ProfileStore::open(&config.store_path) {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "could not load profile store, starting empty");
            ProfileStore::empty(&config.store_path)
        }
    };

    let thermal = SysfsThermalSink::new(&config.thermal_node);
    if !thermal.available() {
        warn!(
            path = %config.thermal_node.display(),
            "thermal control node not found, writes will fail and be ignored"
        );
    }

    let touch: Option<Box<dyn TouchFeature>> = if thermal_only {
        info!("touch tuning disabled (--thermal-only)");
        None
    } else {
        match SysfsTouchFeature::detect(&config.touch_dir) {
            Some(feature) => {
                info!(dir = %config.touch_dir.display(), "touch surface found");
                Some(Box::new(feature))
            }
            None => {
                info!(
                    dir = %config.touch_dir.display(),
                    "touch surface not found, running thermal-only"
                );
                None
            }
        }
    };

    let stats = create_shared_log_with_persistence(config.data_path.join("stats.json"));
    let mut engine = ProfileEngine::new(store, Box::new(thermal), touch, stats.clone());

    let mut watcher = PollWatcher::new(WatcherConfig {
        poll_interval: Duration::from_millis(config.poll_interval_ms),
        watch_rotation: config.watch_rotation,
    });
    if let Err(e) = watcher.start() {
        eprintln!("Error starting watcher: {e}");
        std::process::exit(1);
    }

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    // Main dispatch loop: the single consumer of all watcher events, so
    // transitions are applied strictly in arrival order.
    let receiver = watcher.receiver().clone();
    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(250)) {
            Ok(event) => engine.handle(event),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Watcher disconnected unexpectedly");
                break;
            }
        }
    }

    info!("stopping");
    watcher.stop();
    engine.shutdown();

    if let Err(e) = stats.save() {
        eprintln!("Warning: Could not save activity stats: {e}");
    }

    println!();
    println!("{}", stats.summary());
}

fn cmd_assign(package: &str, category: &str) {
    let category: ThermalCategory = match category.parse() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let config = Config::load().unwrap_or_default();
    let mut store = open_store_or_exit(&config);

    if let Err(e) = store.set_category(package, category) {
        eprintln!("Error saving assignment: {e}");
        std::process::exit(1);
    }

    if category == ThermalCategory::Default {
        println!("Removed assignment for {package} (back to default).");
    } else {
        println!(
            "Assigned {package} to {category} (thermal code {}).",
            category.code()
        );
    }
}

fn cmd_tuning(
    package: &str,
    clear: bool,
    game_mode: i32,
    response: i32,
    sensitivity: i32,
    resistance: i32,
) {
    let config = Config::load().unwrap_or_default();
    let mut store = open_store_or_exit(&config);

    if clear {
        if let Err(e) = store.clear_tuning(package) {
            eprintln!("Error clearing tuning: {e}");
            std::process::exit(1);
        }
        println!("Cleared touch tuning for {package}.");
        return;
    }

    let tuning = TouchTuning::new(game_mode, response, sensitivity, resistance);
    if let Err(e) = store.set_tuning(package, tuning) {
        eprintln!("Error saving tuning: {e}");
        std::process::exit(1);
    }

    println!(
        "Stored touch tuning for {package}: {} (active mode: {})",
        tuning.to_csv(),
        if tuning.active_mode() { "on" } else { "off" }
    );
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Thermal Profile Agent Status");
    println!("============================");
    println!();

    let thermal = SysfsThermalSink::new(&config.thermal_node);
    println!(
        "Thermal node: {} ({})",
        config.thermal_node.display(),
        if thermal.available() { "present" } else { "missing" }
    );
    println!(
        "Touch surface: {} ({})",
        config.touch_dir.display(),
        if SysfsTouchFeature::detect(&config.touch_dir).is_some() {
            "present"
        } else {
            "missing"
        }
    );
    println!();

    match ProfileStore::open(&config.store_path) {
        Ok(store) => {
            let assignments = store.assignments();
            if assignments.is_empty() {
                println!("No package assignments.");
            } else {
                println!("Assignments:");
                for (package, category) in assignments {
                    let tuned = if store.tuning_of(&package).is_some() {
                        " [tuned]"
                    } else {
                        ""
                    };
                    println!("  {package} -> {category} (code {}){tuned}", category.code());
                }
            }
        }
        Err(e) => println!("Could not read profile store: {e}"),
    }
    println!();

    // Cumulative stats from previous sessions, if any.
    let stats_path = config.data_path.join("stats.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(v) = stats.get("foreground_switches") {
                    println!("  Foreground switches: {v}");
                }
                if let Some(v) = stats.get("thermal_writes") {
                    println!("  Thermal writes: {v}");
                }
                if let Some(v) = stats.get("touch_applies") {
                    println!("  Touch tunings applied: {v}");
                }
                if let Some(v) = stats.get("sink_failures") {
                    println!("  Sink failures: {v}");
                }
            }
        }
    } else {
        println!("No previous session data found.");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

fn open_store_or_exit(config: &Config) -> ProfileStore {
    match ProfileStore::open(&config.store_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening profile store: {e}");
            std::process::exit(1);
        }
    }
}
