//! midi-trigger - trigger shell commands from MIDI control-change events.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use midi_trigger::config::AppConfig;
use midi_trigger::dispatch::DispatchEngine;
use midi_trigger::error::ConfigError;
use midi_trigger::input::MidiListener;
use midi_trigger::midi::format_hex;
use midi_trigger::runner::{self, CommandRunner, LogRunner, ShellRunner};
use midi_trigger::trigger::TriggerTable;

/// Trigger shell commands from MIDI control-change events
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the trigger configuration file
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List available MIDI input ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Log rendered command lines instead of executing them
    #[arg(long)]
    dry_run: bool,

    /// Maximum seconds a triggered command may run before it is killed
    #[arg(long, default_value_t = 30)]
    command_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    if args.list_ports {
        let ports = MidiListener::list_input_ports()?;
        if ports.is_empty() {
            println!("No MIDI input ports available");
        }
        for (index, name) in ports.iter().enumerate() {
            println!("  input port #{}: {}", index, name);
        }
        return Ok(());
    }

    let Some(config_path) = args.config else {
        // Historic behavior: no config document means a silent no-op run.
        info!("no configuration file supplied, nothing to do");
        return Ok(());
    };

    info!("Starting midi-trigger...");
    info!("Configuration file: {}", config_path.display());

    let table = match load_table(&config_path).await {
        Ok(table) => table,
        Err(err) => {
            error!("configuration error: {}", err);
            std::process::exit(2);
        }
    };
    info!("{} trigger(s) configured", table.len());
    if table.is_empty() {
        warn!("configuration defines no triggers; every event will be a no-op");
    }

    let runner: Arc<dyn CommandRunner> = if args.dry_run {
        info!("dry-run mode: commands are logged, not executed");
        Arc::new(LogRunner)
    } else {
        Arc::new(ShellRunner::new(Duration::from_secs(args.command_timeout_secs)))
    };

    // Bounded queue between the dispatch engine and the command worker.
    let (command_tx, command_rx) = mpsc::channel(runner::COMMAND_QUEUE_DEPTH);
    let worker = tokio::spawn(runner::run_worker(command_rx, runner));

    let mut listener = MidiListener::new();
    let mut event_rx = listener
        .take_event_receiver()
        .context("event receiver already taken")?;
    let ports = listener.connect_all()?;
    if ports == 0 {
        warn!("no MIDI input ports available; waiting for shutdown signal");
    }

    let mut engine = DispatchEngine::new(table, command_tx);
    info!("Ready to process MIDI events (Ctrl-C to stop)");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                trace!("[{}] {}", event.port, format_hex(&event.bytes));
                engine.process(&event.bytes);
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    // Cleanup: closing the ports stops deliveries, dropping the engine closes
    // the command queue so the worker drains and exits.
    listener.disconnect();
    drop(engine);
    worker.await.ok();

    info!("midi-trigger shutdown complete");
    Ok(())
}

async fn load_table(path: &Path) -> Result<TriggerTable, ConfigError> {
    let config = AppConfig::load(path).await?;
    TriggerTable::build(&config)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
