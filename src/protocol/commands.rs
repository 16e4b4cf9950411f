//! Module `commands`
//!
//! Data structures for console commands and the results of executing them.

/// A command parsed from one console line.
///
/// Path arguments are passed to the storage layer untouched; validating them
/// is the sandbox's job, not the parser's.
#[derive(Debug, PartialEq)]
pub enum Command {
    QUIT,
    HELP,
    MKD(String),         // Create directory
    RMD(String),         // Delete directory recursively
    RND(String, String), // Rename directory: old, new
    STOR {
        dir: String,          // Target directory inside the sandbox
        source: String,       // Local file providing the content
        name: Option<String>, // Declared file name, defaults to the source's
    },
    LIST(String),        // List directory, empty for the root
    DELE(String),        // Delete file
    RNF(String, String), // Rename file: old, new
    SYNTAX(String),      // Known verb with wrong arguments
    UNKNOWN,             // Unknown or unsupported command
}

impl Command {
    /// Verb used in logs and help output
    pub fn verb(&self) -> &'static str {
        match self {
            Command::QUIT => "QUIT",
            Command::HELP => "HELP",
            Command::MKD(_) => "MKD",
            Command::RMD(_) => "RMD",
            Command::RND(..) => "RND",
            Command::STOR { .. } => "STOR",
            Command::LIST(_) => "LIST",
            Command::DELE(_) => "DELE",
            Command::RNF(..) => "RNF",
            Command::SYNTAX(_) => "SYNTAX",
            Command::UNKNOWN => "UNKNOWN",
        }
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn success(message: String) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(message),
        }
    }

    pub fn failure(reason: impl Into<String>, message: String) -> Self {
        Self {
            status: CommandStatus::Failure(reason.into()),
            message: Some(message),
        }
    }
}
