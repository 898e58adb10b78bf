//! sdb - CLI entry point
//!
//! `sdb [--batch] [--log FILE] [--config FILE] [IMAGE]`
//!
//! Loads IMAGE (or the built-in image) into the reference machine and starts
//! the monitor. Input comes from the line editor when stdin is a terminal
//! and is read line by line otherwise.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use sdb::logging;
use sdb::{Config, LineSource, Machine, Monitor, Prompt, ScriptSource};

#[derive(Parser)]
#[command(name = "sdb")]
#[command(version)]
#[command(about = "A simple debugger monitor for a 32-bit emulator")]
struct Cli {
    /// Raw program image, loaded at the start of guest memory
    image: Option<PathBuf>,
    /// Run the program to completion without prompting
    #[arg(short, long)]
    batch: bool,
    /// Write logs to this file instead of stderr
    #[arg(short, long)]
    log: Option<PathBuf>,
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match &cli.log {
        Some(path) => {
            if let Err(e) = logging::init_file_logging(path) {
                eprintln!("Warning: could not open log file {}: {}", path.display(), e);
                logging::init_stderr_logging();
            }
        }
        None => logging::init_stderr_logging(),
    }

    match run(cli) {
        Ok(true) => ExitCode::FAILURE,
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("sdb: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the exit status is bad.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.monitor.batch |= cli.batch;

    let mut machine = Machine::new(config.memory);
    let size = machine
        .load_image(cli.image.as_deref())
        .context("loading image")?;
    println!("Loaded {} bytes at 0x{:08x}", size, config.memory.base);

    let prompt = config.monitor.prompt.clone();
    let history_size = config.monitor.history_size;
    let mut monitor = Monitor::new(machine, io::stdout(), config.monitor)
        .context("starting the monitor")?;

    let stdin = io::stdin();
    let mut input: Box<dyn LineSource> = if stdin.is_terminal() {
        Box::new(Prompt::new(prompt, history_size)?)
    } else {
        Box::new(ScriptSource::new(stdin.lock()))
    };
    monitor.run(&mut *input)?;
    info!("monitor session ended");

    let (machine, _) = monitor.into_parts();
    Ok(machine.is_exit_status_bad())
}
