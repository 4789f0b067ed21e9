//! Configuration Types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub sender: SenderConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

/// Destination of the syslog frames
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SenderConfig {
    pub server: String,
    pub port: u16,
    pub transport: Transport,
}

/// File replay pacing and limits
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Minimum spacing between the starts of consecutive sends
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
    /// Stop after this many lines; 0 means no limit
    pub max_lines: usize,
    /// Skip the first line of the input (CSV header)
    pub skip_header: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Socket type used to reach the receiver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Tcp => write!(f, "tcp"),
            Transport::Udp => write!(f, "udp"),
        }
    }
}

impl FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Transport::Tcp),
            "udp" => Ok(Transport::Udp),
            other => anyhow::bail!("unknown transport '{}', expected 'tcp' or 'udp'", other),
        }
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            port: 514,
            transport: Transport::Tcp,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            max_lines: 0,
            skip_header: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
