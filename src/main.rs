//! syslog-replay
//!
//! Sends one syslog message, or replays a file of messages line by line, to a
//! syslog receiver over TCP or UDP.

use anyhow::{Context, Result};
use clap::{ArgGroup, CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syslog_replay::{
    config::{ConfigManager, MAX_DELAY_MS},
    replay, Config, ShutdownCoordinator, SyslogClient,
};

/// CLI arguments for syslog-replay
#[derive(Parser, Debug)]
#[command(name = "syslog-replay")]
#[command(about = "Send a syslog message or replay a file of messages to a syslog receiver")]
#[command(version)]
#[command(group(ArgGroup::new("payload").args(["message", "file"]).multiple(false)))]
#[command(long_about = "
Send a single syslog message, or replay a file line by line, to a syslog
receiver over TCP (default) or UDP.

Every message is framed as:
  <14>1 <timestamp>Z PYTHON_TEST_SENDER - - - - <message>

Delivery is best effort: unreachable receivers and failed sends drop the
message and the run carries on.

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration file
3. Environment variables
4. Built-in defaults

Environment variables:
  SYSLOG_REPLAY_SERVER     - Receiver host
  SYSLOG_REPLAY_PORT       - Receiver port
  SYSLOG_REPLAY_TRANSPORT  - tcp or udp
  SYSLOG_REPLAY_DELAY      - Pause between lines (e.g., 100ms)
  SYSLOG_REPLAY_LOG_LEVEL  - Log level (trace, debug, info, warn, error)
")]
pub struct CliArgs {
    /// Syslog receiver host [default: localhost]
    #[arg(short, long)]
    pub server: Option<String>,

    /// Syslog receiver port [default: 514]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Send over UDP instead of TCP
    #[arg(short, long)]
    pub udp: bool,

    /// Send a single message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Replay every line of a file as a separate message
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Milliseconds between replayed lines (0-1000)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(0..=MAX_DELAY_MS))]
    pub delay: Option<u64>,

    /// Stop after this many lines (0 = unlimited)
    #[arg(short, long)]
    pub lines: Option<usize>,

    /// Skip the first line of the file (CSV header)
    #[arg(long)]
    pub csv: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    if args.message.is_none() && args.file.is_none() {
        CliArgs::command().print_help()?;
        return Ok(());
    }

    let config = build_config(&args)?;

    init_tracing(&args, &config)?;

    let mut client = SyslogClient::from_config(&config.sender);
    debug!(
        "Sending from {} to {}:{} over {}",
        client.local_hostname(),
        client.host(),
        client.port(),
        client.transport()
    );

    if let Some(message) = &args.message {
        replay::send_message(&mut client, message).await;
        return Ok(());
    }

    if let Some(path) = &args.file {
        let coordinator = Arc::new(ShutdownCoordinator::new());
        let mut shutdown = coordinator.subscribe();

        let signal_handle = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                if let Err(e) = coordinator.listen_for_signals().await {
                    warn!("Error setting up signal handlers: {}", e);
                }
            })
        };

        let result = replay::replay_file(&mut client, path, &config.replay, &mut shutdown).await;
        signal_handle.abort();

        let stats = result?;
        eprintln!("{}", stats);
    }

    Ok(())
}

/// Resolve the effective configuration: CLI > config file > environment > defaults
fn build_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => ConfigManager::load_from_file(path)?,
        None => ConfigManager::load_from_env()?,
    };

    config.merge_with_cli_args(
        args.server.as_deref(),
        args.port,
        args.udp,
        args.delay,
        args.lines,
        args.csv,
    );

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config
        .validate()
        .context("Final configuration validation failed")?;

    Ok(config)
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs, config: &Config) -> Result<()> {
    let log_level = if args.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
