//! Operator console
//!
//! Wires the configuration, sandbox root and file service together and
//! serves console sessions.

pub mod core;
pub mod session;

pub use self::core::Console;
pub use session::run_session;
