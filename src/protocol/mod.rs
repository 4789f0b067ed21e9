//! Syslog Protocol Module
//!
//! Fixed-field syslog line framing.

pub mod constants;
pub mod frame;

pub use constants::*;
pub use frame::SyslogFrame;
