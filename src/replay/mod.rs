//! Replay Module
//!
//! One-shot sends and rate-limited file replay.

pub mod engine;
pub mod stats;

pub use engine::{replay_file, send_message};
pub use stats::ReplayStats;
