//! cuebind main entry point
//!
//! Replays a recorded key script against the gesture bindings and prints
//! what the player did in response:
//!
//!     cuebind [--debug|-d] [--config PATH] SCRIPT.json

use anyhow::{bail, Context};
use cuebind::script::Script;
use cuebind::state::config::Config;
use cuebind::state::State;
use log::{debug, error, info};
use std::path::PathBuf;
use std::process;

/// Parsed command line
struct Args {
    debug: bool,
    config: Option<PathBuf>,
    script: PathBuf,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut debug = false;
    let mut config = None;
    let mut script = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debug" | "-d" => debug = true,
            "--config" | "-c" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option {}", other),
            other => {
                if script.is_some() {
                    bail!("only one script can be replayed at a time");
                }
                script = Some(PathBuf::from(other));
            }
        }
    }

    let script = script.context("no script given")?;
    Ok(Args {
        debug,
        config,
        script,
    })
}

fn print_usage() {
    eprintln!("Usage: {} [--debug|-d] [--config PATH] SCRIPT.json", cuebind::APP_NAME);
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(2);
        }
    };

    // Initialize logger
    if args.debug {
        // Debug mode: write to cuebind.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("cuebind.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open cuebind.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "cuebind version {} starting (debug mode, logging to cuebind.log)",
            cuebind::VERSION
        );
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .parse_default_env()
            .init();
    }

    if let Err(e) = run(&args) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;
    info!("Configuration loaded from {:?}", config.path());

    let script = Script::load(&args.script)
        .with_context(|| format!("loading script {}", args.script.display()))?;
    debug!("Script has {} cues and {} steps", script.cues.len(), script.steps.len());

    let state = State::new(config, script.cues.clone()).context("installing key bindings")?;

    for (step, action) in script.replay(&state) {
        println!("[{:>3}] {}", step, action);
    }

    let player = state.player();
    println!(
        "time {}ms, offset {}ms, {}, subtitles {}",
        player.time,
        player.offset(),
        if player.paused { "paused" } else { "playing" },
        if player.subtitles_visible { "shown" } else { "hidden" }
    );

    Ok(())
}
