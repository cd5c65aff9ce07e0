//! gdr-cam: run the capture pipeline on photos and inspect their embedded metadata.

mod capture;
mod report;
mod scan;

use clap::{Parser, Subcommand};
use gdrcam_cli::output::Status;
use gdrcam_core::config::Config;
use gdrcam_core::error::exit_codes;
use gdrcam_telemetry::TelemetryConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gdr-cam")]
#[command(about = "Geotagged inspection photos from the command line")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./gdr-cam.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct, crop, tag, rotate, annotate and save a photo
    Capture(capture::CaptureArgs),

    /// Show the metadata embedded in a photo
    Metadata {
        /// Path to image file
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarise every image under a directory
    Scan {
        /// Directory to scan
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::report(&e);
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    let telemetry = TelemetryConfig {
        log_level: if cli.verbose {
            "debug".to_string()
        } else {
            config.schema.logging.level.clone()
        },
        log_dir: config.schema.logging.log_dir.as_ref().map(PathBuf::from),
        ..TelemetryConfig::default()
    };
    let guard = match gdrcam_telemetry::init_with_config(telemetry) {
        Ok(guard) => guard,
        Err(e) => {
            Status::warning(&format!("Logging disabled: {}", e));
            None
        }
    };

    let code = match cli.command {
        Commands::Capture(args) => capture::run(args, &config),
        Commands::Metadata { path, json } => report::run(&path, json),
        Commands::Scan { path, json } => scan::run(&path, json, &config),
    };

    // exit skips destructors; flush the file log first
    drop(guard);
    std::process::exit(code);
}
