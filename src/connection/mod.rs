//! Connection Module
//!
//! Owns the socket to the syslog receiver and its connect/send/close lifecycle.

pub mod client;
pub mod error;

pub use client::{Delivery, SyslogClient};
pub use error::DeliveryError;
