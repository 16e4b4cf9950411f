//! Console response handling
//!
//! Defines reply codes and formatting. Error replies are built by
//! [`crate::error::handlers`].

pub const READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const HELP: u16 = 214;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const ACTION_OK: u16 = 250;
pub const CREATED: u16 = 257;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const SYNTAX_ERROR: u16 = 501;
pub const SOURCE_UNAVAILABLE: u16 = 550;

/// Format a single reply line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}
