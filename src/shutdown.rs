//! Interrupt Handling
//!
//! SIGINT/SIGTERM stop a running replay at the next line boundary so the
//! connection is closed and the summary is still reported.

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::Result;

/// Owns the shutdown flag and hands out receivers for it
#[derive(Debug)]
pub struct ShutdownCoordinator {
    shutdown_tx: watch::Sender<bool>,
}

/// Receiving side of the shutdown flag
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self { shutdown_tx }
    }

    /// Get a signal for components that must stop on shutdown
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            shutdown_rx: self.shutdown_tx.subscribe(),
        }
    }

    /// Raise the shutdown flag
    pub fn trigger(&self) {
        // send_replace never fails, even with no receivers left
        self.shutdown_tx.send_replace(true);
    }

    /// Wait for SIGTERM, SIGINT or Ctrl+C, then raise the flag
    pub async fn listen_for_signals(&self) -> Result<()> {
        #[cfg(unix)]
        {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;

            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, stopping replay");
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, stopping replay");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await?;
            info!("Received Ctrl+C, stopping replay");
        }

        if self.shutdown_tx.receiver_count() == 0 {
            warn!("Shutdown requested but nothing is listening");
        }
        self.trigger();

        Ok(())
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Resolve once shutdown is requested; pends forever if the coordinator
    /// is dropped without triggering.
    pub async fn recv(&mut self) {
        while !*self.shutdown_rx.borrow_and_update() {
            if self.shutdown_rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_signal_starts_clear() {
        let coordinator = ShutdownCoordinator::new();
        let signal = coordinator.subscribe();
        assert!(!signal.is_triggered());
    }

    #[tokio::test]
    async fn test_trigger_wakes_receiver() {
        let coordinator = ShutdownCoordinator::new();
        let mut signal = coordinator.subscribe();

        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            coordinator.trigger();
        });

        assert!(timeout(Duration::from_secs(2), signal.recv()).await.is_ok());
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn test_trigger_before_subscribe_is_seen() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.trigger();
        let mut signal = coordinator.subscribe();
        assert!(signal.is_triggered());
        assert!(timeout(Duration::from_millis(100), signal.recv()).await.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_coordinator_never_fires() {
        let coordinator = ShutdownCoordinator::new();
        let mut signal = coordinator.subscribe();
        drop(coordinator);
        assert!(timeout(Duration::from_millis(100), signal.recv()).await.is_err());
    }
}
