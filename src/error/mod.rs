//! Error handling
//!
//! Defines the storage error taxonomy and its mapping to console replies.

pub mod handlers;
pub mod types;

pub use types::*;
