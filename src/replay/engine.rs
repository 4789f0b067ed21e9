//! Replay Engine
//!
//! Drives a [`SyslogClient`] for a single message or for every line of a
//! file. Sends are strictly sequential; each one completes before the next
//! line is read.

use std::path::Path;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use super::stats::ReplayStats;
use crate::config::ReplayConfig;
use crate::connection::{Delivery, SyslogClient};
use crate::shutdown::ShutdownSignal;
use crate::Result;

/// Send one message and close the connection
pub async fn send_message(client: &mut SyslogClient, message: &str) -> Delivery {
    let delivery = client.send(message).await;
    client.close().await;
    delivery
}

/// Replay `path` line by line.
///
/// Each line is sent with its line terminator intact. With `skip_header` the
/// first line is never sent and does not count towards `max_lines`. A
/// non-zero `delay` is the minimum time between the starts of two
/// consecutive sends. Delivery failures are counted, never returned; only
/// opening or reading the file can fail the replay.
pub async fn replay_file(
    client: &mut SyslogClient,
    path: &Path,
    options: &ReplayConfig,
    shutdown: &mut ShutdownSignal,
) -> Result<ReplayStats> {
    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let mut reader = BufReader::new(file);

    info!(
        "Replaying {} to {}:{} over {}",
        path.display(),
        client.host(),
        client.port(),
        client.transport()
    );

    let started = Instant::now();
    let mut stats = ReplayStats::new(path);
    let mut line = String::new();
    let mut at_header = options.skip_header;
    let mut next_send: Option<Instant> = None;

    loop {
        if options.max_lines > 0 && stats.lines >= options.max_lines {
            debug!("Line limit of {} reached", options.max_lines);
            break;
        }

        line.clear();
        let read = reader
            .read_line(&mut line)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        if read == 0 {
            break;
        }

        if at_header {
            at_header = false;
            debug!("Skipping header line");
            continue;
        }

        if let Some(deadline) = next_send {
            tokio::select! {
                _ = sleep_until(deadline) => {}
                _ = shutdown.recv() => {}
            }
        }

        if shutdown.is_triggered() {
            stats.interrupted = true;
            break;
        }

        if !options.delay.is_zero() {
            next_send = Some(Instant::now() + options.delay);
        }

        match client.send(&line).await {
            Delivery::Sent { .. } => stats.delivered += 1,
            Delivery::Dropped(_) => stats.dropped += 1,
        }
        stats.lines += 1;
    }

    client.close().await;
    stats.elapsed = started.elapsed();

    info!(
        "Replay finished: {} sent, {} delivered, {} dropped{}",
        stats.lines,
        stats.delivered,
        stats.dropped,
        if stats.interrupted { " (interrupted)" } else { "" }
    );

    Ok(stats)
}
