use log::{debug, error, info, warn};
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::responses::{self, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::service::FileService;

/// Serves one console session until QUIT or end of input.
///
/// - Reads one command per line from `reader`.
/// - Dispatches commands using `handle_command`.
/// - Writes every reply to `writer` and flushes it.
pub async fn run_session<R, W>(
    mut reader: R,
    mut writer: W,
    service: FileService,
    max_command_length: usize,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(format_response(responses::READY, "RAX files service ready").as_bytes())
        .await?;
    writer.flush().await?;

    let mut line = Vec::new();
    loop {
        line.clear();
        // One byte over the limit is enough to tell an overlong line apart
        let limit = max_command_length as u64 + 1;
        let read = (&mut reader).take(limit).read_until(b'\n', &mut line).await;
        match read {
            Ok(0) => {
                info!("Console input closed");
                break;
            }
            Ok(_) => {
                // Enforce command length limit
                if line.len() > max_command_length {
                    warn!("Rejected command of at least {} bytes", line.len());
                    if !line.ends_with(b"\n") {
                        discard_line(&mut reader).await?;
                    }
                    reply(&mut writer, responses::UNKNOWN_COMMAND, "Command too long").await?;
                    continue;
                }

                let text = match std::str::from_utf8(&line) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Rejected command that is not valid UTF-8: {}", e);
                        reply(&mut writer, responses::SYNTAX_ERROR, "Command is not valid UTF-8")
                            .await?;
                        continue;
                    }
                };

                let trimmed = text.trim_end_matches(&['\r', '\n'][..]);
                if trimmed.trim().is_empty() {
                    continue;
                }

                let command = parse_command(trimmed);
                info!("Received: {:?}", &command);

                let result = handle_command(&service, &command).await;
                if let Some(msg) = result.message {
                    writer.write_all(msg.as_bytes()).await?;
                    writer.flush().await?;
                }

                match result.status {
                    CommandStatus::CloseConnection => {
                        info!("Console session ended by {}", command.verb());
                        break;
                    }
                    CommandStatus::Failure(reason) => {
                        debug!("{} failed: {}", command.verb(), reason);
                    }
                    CommandStatus::Success => {}
                }
            }
            Err(e) => {
                error!("Failed to read console input: {}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}

async fn reply<W: AsyncWrite + Unpin>(writer: &mut W, code: u16, message: &str) -> io::Result<()> {
    writer.write_all(format_response(code, message).as_bytes()).await?;
    writer.flush().await
}

/// Skip input up to and including the next newline without buffering it.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<()> {
    loop {
        let (consumed, found) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if found {
            return Ok(());
        }
    }
}
