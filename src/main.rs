//! facesim CLI
//!
//! Usage:
//!   facesim --mode emotion < frame.b64            # One emotion estimate
//!   facesim --mode distance --state s.json < f    # Distance, threading state
//!   facesim --mode detect < frame.b64             # Face points
//!   facesim --serve --addr 127.0.0.1:8080         # WebSocket/HTTP server

use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use facesim::core::{run_invocation, run_server, Invocation, Mode, NullDetector};
use facesim::types::{Result, SimConfig};
use facesim::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "facesim",
    version = VERSION,
    about = "Simulated face telemetry - emotions and screen distance",
    long_about = "facesim stands in for a computer-vision pipeline.\n\n\
                  It reads one Base64-encoded image from stdin and writes one\n\
                  JSON document to stdout. The image is decoded but never\n\
                  analyzed: readings are synthetic.\n\n\
                  Modes:\n  \
                  emotion   - 1-3 unique emotions with 1-10 confidences\n  \
                  distance  - trend-driven random walk, last 30 readings\n  \
                  detect    - face centres from the linked detector\n\n\
                  Tunables are read from FACESIM_* environment variables."
)]
struct Args {
    /// Simulation to run on the payload read from stdin
    #[arg(short, long, value_enum, required_unless_present = "serve")]
    mode: Option<Mode>,

    /// Run as WebSocket/HTTP server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Seed for a reproducible random stream (default: wall clock)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file holding distance state and history between runs
    #[arg(long)]
    state: Option<PathBuf>,

    /// Also write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("{} {}", "Cannot open log file:".yellow(), e);
    }

    let config = match SimConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    let code = match args.mode {
        Some(mode) if !args.serve => {
            let invocation = Invocation {
                mode,
                seed: args.seed,
                state: args.state.clone(),
            };
            run_invocation(&invocation, config, &NullDetector, io::stdin().lock(), io::stdout().lock())
        }
        _ => run_serve(&args, config).await,
    };

    info!("Script completed");
    std::process::exit(code);
}

/// Diagnostics go to stderr and optionally a file, never to stdout
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => match File::create(path) {
            Ok(file) => {
                builder
                    .with_ansi(false)
                    .with_writer(io::stderr.and(Mutex::new(file)))
                    .init();
            }
            Err(e) => {
                builder.with_writer(io::stderr).init();
                return Err(e.into());
            }
        },
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

/// Run WebSocket/HTTP server
async fn run_serve(args: &Args, config: SimConfig) -> i32 {
    println!();
    println!("{}", "facesim - simulated face telemetry".bold());
    println!("  version {}", VERSION);
    println!("  listening on {}", args.addr.cyan());
    println!();

    match run_server(&args.addr, config).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "Server error:".red().bold(), e);
            1
        }
    }
}
