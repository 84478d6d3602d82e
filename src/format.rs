use std::fmt::Display;
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::TimeZone;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::process::{Connection, Connections};

/// Placeholder for data that could not be read.
pub const NOT_AVAILABLE: &str = "N/A";

pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// `H:MM:SS`; hours grow without padding, minutes and seconds are always two digits.
pub fn format_running_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

pub fn format_created_in<Tz>(epoch_secs: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    i64::try_from(epoch_secs)
        .ok()
        .and_then(|secs| tz.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format(CREATED_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Joins argv with single spaces. Control characters are written as escapes
/// (`\n`, `\r`, `\t`, `\u{1b}`) so a record always stays on one report line.
pub fn format_command(argv: Option<&[String]>) -> String {
    match argv {
        Some(argv) => escape_control(&argv.join(" ")),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn escape_control(text: &str) -> String {
    if !text.chars().any(char::is_control) {
        return text.to_string();
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if ch.is_control() {
            escaped.extend(ch.escape_default());
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

fn format_endpoint(addr: Option<SocketAddr>) -> String {
    match addr {
        Some(addr) => format!("{}:{}", addr.ip(), addr.port()),
        None => format!("{NOT_AVAILABLE}:{NOT_AVAILABLE}"),
    }
}

pub fn format_connection(conn: &Connection) -> String {
    format!(
        "{} -> {} ({})",
        format_endpoint(conn.local),
        format_endpoint(conn.remote),
        conn.status
    )
}

pub fn format_connections(connections: &Connections) -> String {
    match connections {
        Connections::Listed(list) if !list.is_empty() => list
            .iter()
            .map(format_connection)
            .collect::<Vec<_>>()
            .join(", "),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Seconds since the Unix epoch; a clock set before 1970 reads as 0.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
