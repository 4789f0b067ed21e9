//! Configuration Module
//!
//! Handles configuration loading, validation, and CLI overrides.

pub mod manager;
pub mod types;

pub use manager::{ConfigManager, MAX_DELAY_MS};
pub use types::*;
