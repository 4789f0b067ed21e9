//! Delivery failures

use std::io;

use thiserror::Error;

use crate::config::Transport;

/// Why a frame was not delivered.
///
/// Every variant leaves the client disconnected; none of them is fatal to a
/// replay run.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("could not resolve {target}: {source}")]
    Resolution {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("could not connect to {target} over {transport}: {source}")]
    Connect {
        target: String,
        transport: Transport,
        #[source]
        source: io::Error,
    },

    #[error("send to {target} failed: {source}")]
    Send {
        target: String,
        #[source]
        source: io::Error,
    },
}

impl DeliveryError {
    pub fn is_resolution(&self) -> bool {
        matches!(self, DeliveryError::Resolution { .. })
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, DeliveryError::Connect { .. })
    }

    pub fn is_send(&self) -> bool {
        matches!(self, DeliveryError::Send { .. })
    }
}
