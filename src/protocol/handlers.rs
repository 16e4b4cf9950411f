//! Command handlers for the operator console.
//!
//! Each handler forwards to the [`FileService`], logs the outcome, and turns
//! it into a reply. Storage errors become `<code> <machine_code>: <message>`
//! replies.

use std::path::Path;

use log::{info, warn};

use crate::error::StorageError;
use crate::error::handlers::{error_reply, handle_error};
use crate::protocol::responses::{self, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::service::FileService;
use crate::storage::{DirEntryDescriptor, UploadedContent};

const HELP_TEXT: &[&str] = &[
    "MKD <path>                       create directory",
    "RMD <path>                       delete directory and its contents",
    "RND <old> <new>                  rename directory",
    "STOR <dir> <local-file> [name]   upload a local file into <dir>",
    "LIST [path]                      list directory (root when omitted)",
    "DELE <path>                      delete file",
    "RNF <old> <new>                  rename file",
    "QUIT                             end the session",
];

/// Dispatches a parsed command to its handler.
pub async fn handle_command(service: &FileService, command: &Command) -> CommandResult {
    match command {
        Command::QUIT => handle_cmd_quit(),
        Command::HELP => handle_cmd_help(),
        Command::MKD(path) => handle_cmd_mkd(service, path).await,
        Command::RMD(path) => handle_cmd_rmd(service, path).await,
        Command::RND(old, new) => handle_cmd_rnd(service, old, new).await,
        Command::STOR { dir, source, name } => {
            handle_cmd_stor(service, dir, source, name.as_deref()).await
        }
        Command::LIST(path) => handle_cmd_list(service, path).await,
        Command::DELE(path) => handle_cmd_dele(service, path).await,
        Command::RNF(old, new) => handle_cmd_rnf(service, old, new).await,
        Command::SYNTAX(verb) => handle_cmd_syntax(verb),
        Command::UNKNOWN => handle_cmd_unknown(),
    }
}

fn handle_cmd_quit() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::CLOSING, "Goodbye")),
    }
}

fn handle_cmd_help() -> CommandResult {
    let mut message = String::new();
    for line in HELP_TEXT {
        message.push_str(&format!("{}-{}\r\n", responses::HELP, line));
    }
    message.push_str(&format_response(responses::HELP, "End of help"));
    CommandResult::success(message)
}

async fn handle_cmd_mkd(service: &FileService, path: &str) -> CommandResult {
    match service.create_dir(path.to_string()).await {
        Ok(()) => {
            info!("Created directory {}", path);
            CommandResult::success(format_response(
                responses::CREATED,
                &format!("\"{}\" created", path),
            ))
        }
        Err(e) => storage_failure("MKD", e),
    }
}

async fn handle_cmd_rmd(service: &FileService, path: &str) -> CommandResult {
    match service.delete_dir(path.to_string()).await {
        Ok(()) => {
            info!("Deleted directory {}", path);
            CommandResult::success(format_response(responses::ACTION_OK, "Directory deleted"))
        }
        Err(e) => storage_failure("RMD", e),
    }
}

async fn handle_cmd_rnd(service: &FileService, old: &str, new: &str) -> CommandResult {
    match service.rename_dir(old.to_string(), new.to_string()).await {
        Ok(()) => {
            info!("Renamed directory {} -> {}", old, new);
            CommandResult::success(format_response(responses::ACTION_OK, "Directory renamed"))
        }
        Err(e) => storage_failure("RND", e),
    }
}

/// Handles STOR: streams a local file into the sandbox.
///
/// Without an explicit name the local file's own name is declared; the
/// storage layer strips it to a base name either way.
async fn handle_cmd_stor(
    service: &FileService,
    dir: &str,
    source: &str,
    name: Option<&str>,
) -> CommandResult {
    let file = match tokio::fs::File::open(source).await {
        Ok(file) => file.into_std().await,
        Err(e) => {
            warn!("STOR cannot open source {}: {}", source, e);
            return CommandResult::failure(
                e.to_string(),
                format_response(
                    responses::SOURCE_UNAVAILABLE,
                    &format!("Cannot open local file {}", source),
                ),
            );
        }
    };

    let declared = match name {
        Some(name) => name.to_string(),
        None => Path::new(source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    match service
        .create_file(dir.to_string(), UploadedContent::new(declared.clone(), file))
        .await
    {
        Ok(()) => {
            info!("Stored {} into {} as {}", source, display_dir(dir), declared);
            CommandResult::success(format_response(
                responses::TRANSFER_COMPLETE,
                "Transfer complete",
            ))
        }
        Err(e) => storage_failure("STOR", e),
    }
}

async fn handle_cmd_list(service: &FileService, path: &str) -> CommandResult {
    match service.get_files(path.to_string()).await {
        Ok(entries) => {
            info!("Listed directory {} - {} entries", display_dir(path), entries.len());
            let mut message = String::new();
            for entry in &entries {
                message.push_str(&format_entry(entry));
                message.push_str("\r\n");
            }
            message.push_str(&format_response(
                responses::TRANSFER_COMPLETE,
                &format!("{} entries", entries.len()),
            ));
            CommandResult::success(message)
        }
        Err(e) => storage_failure("LIST", e),
    }
}

async fn handle_cmd_dele(service: &FileService, path: &str) -> CommandResult {
    match service.delete_file(path.to_string()).await {
        Ok(()) => {
            info!("Deleted file {}", path);
            CommandResult::success(format_response(responses::ACTION_OK, "File deleted"))
        }
        Err(e) => storage_failure("DELE", e),
    }
}

async fn handle_cmd_rnf(service: &FileService, old: &str, new: &str) -> CommandResult {
    match service.rename_file(old.to_string(), new.to_string()).await {
        Ok(()) => {
            info!("Renamed file {} -> {}", old, new);
            CommandResult::success(format_response(responses::ACTION_OK, "File renamed"))
        }
        Err(e) => storage_failure("RNF", e),
    }
}

fn handle_cmd_syntax(verb: &str) -> CommandResult {
    CommandResult::failure(
        format!("Bad arguments for {}", verb),
        format_response(
            responses::SYNTAX_ERROR,
            &format!("Syntax error in arguments to {}; try HELP", verb),
        ),
    )
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult::failure(
        "Unknown command",
        format_response(responses::UNKNOWN_COMMAND, "Unknown command; try HELP"),
    )
}

fn storage_failure(verb: &str, err: StorageError) -> CommandResult {
    handle_error(verb, &err);
    CommandResult::failure(err.to_string(), error_reply(&err))
}

/// One listing line: `name|size|mime`, directories with a trailing `/` and
/// `-` for absent fields.
pub fn format_entry(entry: &DirEntryDescriptor) -> String {
    if entry.is_directory {
        return format!("{}/|-|-", entry.name);
    }
    format!(
        "{}|{}|{}",
        entry.name,
        entry
            .size
            .map(|size| size.to_string())
            .unwrap_or_else(|| "-".to_string()),
        entry.mime_type.as_deref().unwrap_or("-")
    )
}

fn display_dir(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}
