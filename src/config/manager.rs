//! Configuration Manager

use super::{Config, Transport};
use crate::Result;
use anyhow::{Context, bail};
use std::path::Path;
use std::time::Duration;

/// Upper bound for the pause between replayed lines
pub const MAX_DELAY_MS: u64 = 1000;

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if path.exists() {
            tracing::debug!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            config.validate()
                .with_context(|| "Configuration validation failed")?;

            Ok(config)
        } else {
            tracing::debug!("Configuration file not found at {}, using defaults", path.display());
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Config> {
        let mut config = Config::default();

        if let Ok(server) = std::env::var("SYSLOG_REPLAY_SERVER") {
            config.sender.server = server;
        }

        if let Ok(port) = std::env::var("SYSLOG_REPLAY_PORT") {
            config.sender.port = port.parse::<u16>()
                .with_context(|| format!("Invalid SYSLOG_REPLAY_PORT: {}", port))?;
        }

        if let Ok(transport) = std::env::var("SYSLOG_REPLAY_TRANSPORT") {
            config.sender.transport = transport.parse::<Transport>()
                .with_context(|| format!("Invalid SYSLOG_REPLAY_TRANSPORT: {}", transport))?;
        }

        if let Ok(delay) = std::env::var("SYSLOG_REPLAY_DELAY") {
            config.replay.delay = humantime::parse_duration(&delay)
                .with_context(|| format!("Invalid SYSLOG_REPLAY_DELAY: {}", delay))?;
        }

        if let Ok(log_level) = std::env::var("SYSLOG_REPLAY_LOG_LEVEL") {
            config.logging.level = log_level;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_sender_config()
            .with_context(|| "Sender configuration validation failed")?;

        self.validate_replay_config()
            .with_context(|| "Replay configuration validation failed")?;

        self.validate_logging_config()
            .with_context(|| "Logging configuration validation failed")?;

        Ok(())
    }

    fn validate_sender_config(&self) -> Result<()> {
        if self.sender.server.trim().is_empty() {
            bail!("sender.server must not be empty");
        }

        if self.sender.port == 0 {
            bail!("sender.port must be between 1 and 65535");
        }

        Ok(())
    }

    fn validate_replay_config(&self) -> Result<()> {
        if self.replay.delay > Duration::from_millis(MAX_DELAY_MS) {
            bail!("replay.delay cannot exceed {}ms", MAX_DELAY_MS);
        }

        Ok(())
    }

    fn validate_logging_config(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            bail!("logging.level must be one of: {}", valid_log_levels.join(", "));
        }

        Ok(())
    }

    /// Merge with CLI arguments
    pub fn merge_with_cli_args(
        &mut self,
        server: Option<&str>,
        port: Option<u16>,
        udp: bool,
        delay_ms: Option<u64>,
        lines: Option<usize>,
        csv: bool,
    ) {
        if let Some(server) = server {
            self.sender.server = server.to_string();
            tracing::debug!("CLI override: server set to {}", server);
        }

        if let Some(port) = port {
            self.sender.port = port;
            tracing::debug!("CLI override: port set to {}", port);
        }

        if udp {
            self.sender.transport = Transport::Udp;
            tracing::debug!("CLI override: transport set to udp");
        }

        if let Some(delay_ms) = delay_ms {
            self.replay.delay = Duration::from_millis(delay_ms);
            tracing::debug!("CLI override: delay set to {}ms", delay_ms);
        }

        if let Some(lines) = lines {
            self.replay.max_lines = lines;
            tracing::debug!("CLI override: line limit set to {}", lines);
        }

        if csv {
            self.replay.skip_header = true;
            tracing::debug!("CLI override: skipping header line");
        }
    }
}
