//! ratewatch CLI - NBRB exchange-rate monitor
//!
//! ## Example Usage
//!
//! ```bash
//! # Run the monitoring loop with defaults (10 min interval, 9:00-16:00)
//! ratewatch run
//!
//! # One gated poll cycle, cron-friendly
//! ratewatch once --config ratewatch.toml
//!
//! # Inspect the stored snapshot
//! ratewatch show
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use ratewatch::prelude::*;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// ratewatch: NBRB official exchange-rate monitor
#[derive(Parser)]
#[command(name = "ratewatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Polls NBRB official rates, logs changes, keeps a snapshot", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitoring loop
    Run {
        /// Poll interval in seconds
        #[arg(short = 'i', long)]
        interval: Option<u64>,

        /// Snapshot file path
        #[arg(short = 's', long)]
        snapshot: Option<PathBuf>,

        /// Change log file path
        #[arg(short = 'l', long)]
        log_file: Option<PathBuf>,
    },

    /// Execute a single poll cycle and exit
    Once {
        /// Snapshot file path
        #[arg(short = 's', long)]
        snapshot: Option<PathBuf>,

        /// Change log file path
        #[arg(short = 'l', long)]
        log_file: Option<PathBuf>,
    },

    /// Print the stored snapshot
    Show {
        /// Snapshot file path
        #[arg(short = 's', long)]
        snapshot: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<MonitorConfig> {
    let config = match path {
        Some(path) => MonitorConfig::from_toml_file(path)?,
        None => MonitorConfig::default(),
    };
    Ok(config)
}

fn build_monitor(config: MonitorConfig) -> anyhow::Result<Monitor> {
    let calendar = Arc::new(NbrbCalendar::new());
    let source = NbrbSource::new(&config.api_url)?;
    let store = RateStore::new(&config.snapshot_path, calendar);
    let logger = ChangeLogger::new(&config.log_path);
    Ok(Monitor::new(config, source, store, logger))
}

async fn cmd_run(mut config: MonitorConfig) -> anyhow::Result<()> {
    config.validate()?;
    println!(
        "{} polling every {}s within {:02}:00-{:02}:00",
        "ratewatch".cyan().bold(),
        config.poll_interval_secs,
        config.start_hour,
        config.end_hour
    );

    let mut monitor = build_monitor(config)?;
    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupted, shutting down");
        }
    }
    Ok(())
}

async fn cmd_once(config: MonitorConfig) -> anyhow::Result<()> {
    config.validate()?;
    let mut monitor = build_monitor(config)?;

    match monitor.run_once().await? {
        CycleOutcome::OffHours => {
            println!("{}", "Outside working hours, nothing fetched".yellow());
        }
        CycleOutcome::NoData => {
            println!("{}", "No data from upstream this cycle".yellow());
        }
        CycleOutcome::Initialized => {
            println!("{}", "Initial rates stored".green().bold());
        }
        CycleOutcome::Observed { events } if events.is_empty() => {
            println!("{}", "Rates unchanged".green());
        }
        CycleOutcome::Observed { events } => {
            println!("{}", format!("{} change(s) detected", events.len()).green().bold());
            for event in events {
                println!("  {}", event.log_line());
            }
        }
    }
    Ok(())
}

fn cmd_show(config: MonitorConfig) -> anyhow::Result<()> {
    let store = RateStore::new(&config.snapshot_path, Arc::new(NbrbCalendar::new()));
    let snapshot = store.load();

    if snapshot.is_empty() {
        println!(
            "{} no snapshot at {}",
            "ratewatch".cyan().bold(),
            config.snapshot_path.display()
        );
        return Ok(());
    }

    println!("{} {}", "Snapshot taken:".bold(), snapshot.timestamp);
    for (date, rates) in &snapshot.rates {
        println!("{}", date.cyan().bold());
        for (currency, rate) in rates {
            println!("  {} {}", format!("{}:", currency).bold(), rate);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match load_config(cli.config.as_ref()) {
        Ok(config) => match cli.command {
            Commands::Run {
                interval,
                snapshot,
                log_file,
            } => {
                let mut config = config;
                if let Some(interval) = interval {
                    config.poll_interval_secs = interval;
                }
                if let Some(snapshot) = snapshot {
                    config.snapshot_path = snapshot;
                }
                if let Some(log_file) = log_file {
                    config.log_path = log_file;
                }
                cmd_run(config).await
            }
            Commands::Once { snapshot, log_file } => {
                let mut config = config;
                if let Some(snapshot) = snapshot {
                    config.snapshot_path = snapshot;
                }
                if let Some(log_file) = log_file {
                    config.log_path = log_file;
                }
                cmd_once(config).await
            }
            Commands::Show { snapshot } => {
                let mut config = config;
                if let Some(snapshot) = snapshot {
                    config.snapshot_path = snapshot;
                }
                cmd_show(config)
            }
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
