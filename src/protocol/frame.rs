//! Syslog Frame Formatting

use std::fmt;
use std::time::SystemTime;

use super::constants::*;

/// One syslog line as it goes on the wire.
///
/// `<14>1 <timestamp> PYTHON_TEST_SENDER - - - - <message>\n`
///
/// The message is carried verbatim. A trailing line feed is always appended,
/// so a message that already ends with one produces a blank line after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogFrame<'a> {
    message: &'a str,
    timestamp: SystemTime,
}

impl<'a> SyslogFrame<'a> {
    /// Create a frame stamped with the current time
    pub fn new(message: &'a str) -> Self {
        Self::with_timestamp(message, SystemTime::now())
    }

    /// Create a frame with an explicit timestamp
    pub fn with_timestamp(message: &'a str, timestamp: SystemTime) -> Self {
        Self { message, timestamp }
    }

    pub fn message(&self) -> &str {
        self.message
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// UTF-8 bytes of the complete frame, trailer included
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for SyslogFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}>{} {} {} {nil} {nil} {nil} {nil} {}{}",
            SYSLOG_PRIORITY,
            SYSLOG_VERSION,
            humantime::format_rfc3339_micros(self.timestamp),
            SYSLOG_SENDER,
            self.message,
            SYSLOG_TRAILER,
            nil = SYSLOG_NILVALUE,
        )
    }
}
