//! Console command parsing
//!
//! Arguments are separated by whitespace, so paths containing spaces are
//! not expressible on the console.

use crate::protocol::Command;

/// Parses a raw console line into the `Command` enum.
///
/// A known verb with the wrong number of arguments yields `SYNTAX`.
pub fn parse_command(raw: &str) -> Command {
    let mut parts = raw.split_whitespace();
    let verb = parts.next().unwrap_or("").to_ascii_uppercase();
    let args: Vec<&str> = parts.collect();

    match (verb.as_str(), args.as_slice()) {
        ("QUIT" | "Q", []) => Command::QUIT,
        ("HELP", []) => Command::HELP,
        ("MKD", [path]) => Command::MKD(path.to_string()),
        ("RMD", [path]) => Command::RMD(path.to_string()),
        ("RND", [old, new]) => Command::RND(old.to_string(), new.to_string()),
        ("STOR", [dir, source]) => Command::STOR {
            dir: dir.to_string(),
            source: source.to_string(),
            name: None,
        },
        ("STOR", [dir, source, name]) => Command::STOR {
            dir: dir.to_string(),
            source: source.to_string(),
            name: Some(name.to_string()),
        },
        ("LIST", []) => Command::LIST(String::new()),
        ("LIST", [path]) => Command::LIST(path.to_string()),
        ("DELE", [path]) => Command::DELE(path.to_string()),
        ("RNF", [old, new]) => Command::RNF(old.to_string(), new.to_string()),
        ("QUIT" | "Q" | "HELP" | "MKD" | "RMD" | "RND" | "STOR" | "LIST" | "DELE" | "RNF", _) => {
            Command::SYNTAX(verb)
        }
        _ => Command::UNKNOWN,
    }
}
