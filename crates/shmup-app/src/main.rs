//! shmup: headless runner for the SHMUP session orchestrator.
//!
//! Usage:
//!   shmup [--config session.json] [--seconds 30] [--realtime]
//!         [--autopilot] [--hero-dies-at 12.5]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{error, info};

use shmup_app::game_loop::{spawn_game_loop, LoopOptions};
use shmup_app::logging::init_tracing;
use shmup_app::state::SharedSnapshot;
use shmup_app::DEFAULT_CONFIG;
use shmup_core::config::{ConfigError, SessionConfig};
use shmup_core::constants::TICK_RATE;
use shmup_sim::host::PlayArea;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {e}");
    }

    let config = match load_config(parse_path(&args, "--config")) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let seconds = parse_f64(&args, "--seconds").unwrap_or(30.0);
    let options = LoopOptions {
        realtime: args.iter().any(|a| a == "--realtime"),
        max_ticks: Some((seconds.max(0.0) * TICK_RATE as f64).round() as u64),
        autopilot: args.iter().any(|a| a == "--autopilot"),
        hero_dies_at: parse_f64(&args, "--hero-dies-at")
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
    };

    info!(seconds, realtime = options.realtime, "starting game loop");
    let latest: SharedSnapshot = Arc::new(Mutex::new(None));
    let (_cmd_tx, handle) =
        match spawn_game_loop(config, PlayArea::default(), options, latest.clone()) {
            Ok(spawned) => spawned,
            Err(e) => {
                error!(error = %e, "failed to spawn game loop thread");
                return ExitCode::FAILURE;
            }
        };

    let summary = match handle.join() {
        Ok(Ok(summary)) => summary,
        Ok(Err(e)) => {
            error!(error = %e, "game loop failed");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            error!("game loop thread panicked");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "failed to serialize summary"),
    }
    ExitCode::SUCCESS
}

fn print_usage() {
    eprintln!(
        "shmup: headless SHMUP session runner\n\
         \n\
           --config <path>        Session config JSON (default: built-in)\n\
           --seconds <N>          Simulated seconds to run (default: 30)\n\
           --realtime             Pace ticks to wall-clock time\n\
           --autopilot            Destroy enemies once they reach mid-screen\n\
           --hero-dies-at <secs>  Kill the hero after this much simulated time\n\
         \n\
         RUST_LOG controls log verbosity (default: info).\n"
    );
}

fn load_config(path: Option<PathBuf>) -> Result<SessionConfig, ConfigError> {
    match path {
        Some(path) => SessionConfig::from_file(&path),
        None => SessionConfig::from_json_str(DEFAULT_CONFIG),
    }
}

fn parse_path(args: &[String], flag: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

fn parse_f64(args: &[String], flag: &str) -> Option<f64> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(n) = args[i + 1].parse::<f64>() {
                return Some(n);
            }
        }
    }
    None
}
