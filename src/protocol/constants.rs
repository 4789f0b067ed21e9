//! Syslog Frame Constants

// Facility and severity of every frame: user-level, informational
pub const SYSLOG_FACILITY_USER: u8 = 1;
pub const SYSLOG_SEVERITY_INFO: u8 = 6;

// PRI = facility * 8 + severity
pub const SYSLOG_PRIORITY: u8 = SYSLOG_FACILITY_USER * 8 + SYSLOG_SEVERITY_INFO;

// RFC 5424 header version
pub const SYSLOG_VERSION: u8 = 1;

// Sender token placed after the timestamp
pub const SYSLOG_SENDER: &str = "PYTHON_TEST_SENDER";

// Nil value for hostname, app-name, procid and msgid
pub const SYSLOG_NILVALUE: &str = "-";

// Every frame ends with a line feed
pub const SYSLOG_TRAILER: char = '\n';
