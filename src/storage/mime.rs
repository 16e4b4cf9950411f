//! Content type sniffing
//!
//! Guesses a MIME type from the leading bytes of a file. Markup signatures
//! are checked first, then magic numbers via `infer`, then a plain-text
//! fallback for content without binary control bytes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DEFAULT_SNIFF_BYTES: usize = 512;

const TEXT_UTF8: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

const HTML_SIGNATURES: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Read at most `limit` bytes from the file at `path` and sniff them.
///
/// Best effort: any open or read failure yields `None`.
pub fn sniff_file(path: &Path, limit: usize) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut head = Vec::with_capacity(limit);
    file.take(limit as u64).read_to_end(&mut head).ok()?;
    Some(sniff(&head))
}

/// Sniff the content type of `data`.
pub fn sniff(data: &[u8]) -> String {
    if let Some(bom) = sniff_bom(data) {
        return bom.to_string();
    }

    let trimmed = skip_leading_whitespace(data);
    if HTML_SIGNATURES
        .iter()
        .any(|signature| matches_markup(trimmed, signature))
    {
        return "text/html; charset=utf-8".to_string();
    }
    if trimmed.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8".to_string();
    }

    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    if data.iter().copied().any(is_binary_byte) {
        OCTET_STREAM.to_string()
    } else {
        TEXT_UTF8.to_string()
    }
}

fn sniff_bom(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFE, 0xFF]) {
        Some("text/plain; charset=utf-16be")
    } else if data.starts_with(&[0xFF, 0xFE]) {
        Some("text/plain; charset=utf-16le")
    } else if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some(TEXT_UTF8)
    } else {
        None
    }
}

fn skip_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

/// Case-insensitive tag match, terminated by a space or `>`.
fn matches_markup(data: &[u8], signature: &[u8]) -> bool {
    if data.len() <= signature.len() {
        return false;
    }
    data[..signature.len()].eq_ignore_ascii_case(signature)
        && matches!(data[signature.len()], b' ' | b'>')
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
