//! syslog-replay Library
//!
//! Best-effort syslog sender used as a test fixture for syslog receivers.
//!
//! A [`SyslogClient`] owns at most one TCP or UDP socket, connects lazily on
//! the first send and silently drops messages it cannot deliver. The
//! [`replay`] module drives it for one-shot messages and line-by-line file
//! replay.

pub mod config;
pub mod connection;
pub mod protocol;
pub mod replay;
pub mod shutdown;

pub use config::{Config, ReplayConfig, SenderConfig, Transport};
pub use connection::{Delivery, DeliveryError, SyslogClient};
pub use protocol::SyslogFrame;
pub use replay::ReplayStats;
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Common error type for configuration and file handling
pub type Result<T> = anyhow::Result<T>;
