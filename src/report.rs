use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{Local, TimeZone};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Serialize;

use crate::format::{
    NOT_AVAILABLE, format_command, format_connections, format_created_in, format_running_time,
};
use crate::system::cache::StartTimeCache;
use crate::system::process::ProcessRecord;

/// A record rendered to display strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub pid: u32,
    pub command: String,
    pub created: String,
    pub running: String,
    pub network: String,
}

const PID_PREFIX: &str = "PID: ";
const COMMAND_MARKER: &str = ", Command: ";
const CREATED_MARKER: &str = ", Created: ";
const RUNNING_MARKER: &str = ", Running: ";
const NETWORK_MARKER: &str = ", Network: ";

/// Elapsed time since the cached start of `pid`, or `N/A` if it was never observed.
pub fn running_time(cache: &StartTimeCache, pid: u32, now: u64) -> String {
    match cache.get(pid) {
        Some(started) => format_running_time(now.saturating_sub(started)),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn render_rows(records: &[ProcessRecord], cache: &StartTimeCache, now: u64) -> Vec<DisplayRow> {
    render_rows_in(records, cache, now, &Local)
}

pub fn render_rows_in<Tz>(
    records: &[ProcessRecord],
    cache: &StartTimeCache,
    now: u64,
    tz: &Tz,
) -> Vec<DisplayRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    records
        .iter()
        .map(|record| DisplayRow {
            pid: record.pid,
            command: format_command(record.command.as_deref()),
            created: format_created_in(record.created_at, tz),
            running: running_time(cache, record.pid, now),
            network: format_connections(&record.connections),
        })
        .collect()
}

pub fn report_line(row: &DisplayRow) -> String {
    format!(
        "{PID_PREFIX}{}{COMMAND_MARKER}{}{CREATED_MARKER}{}{RUNNING_MARKER}{}{NETWORK_MARKER}{}",
        row.pid, row.command, row.created, row.running, row.network
    )
}

/// Writes one line per row, replacing `path` if it exists.
pub fn write_rows(rows: &[DisplayRow], path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create report file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        writeln!(out, "{}", report_line(row))
            .wrap_err_with(|| format!("failed to write report file {}", path.display()))?;
    }
    out.flush()
        .wrap_err_with(|| format!("failed to write report file {}", path.display()))?;
    Ok(())
}

pub fn write_report(
    records: &[ProcessRecord],
    cache: &StartTimeCache,
    now: u64,
    path: &Path,
) -> Result<()> {
    let rows = render_rows(records, cache, now);
    write_rows(&rows, path)?;
    tracing::info!(path = %path.display(), lines = rows.len(), "report written");
    Ok(())
}

/// Recovers the five fields of a line produced by `report_line`.
pub fn parse_report_line(line: &str) -> Result<DisplayRow> {
    let rest = line
        .strip_prefix(PID_PREFIX)
        .ok_or_else(|| eyre!("line does not start with `{PID_PREFIX}`"))?;
    let (pid, rest) = rest
        .split_once(COMMAND_MARKER)
        .ok_or_else(|| eyre!("missing command field"))?;
    let pid: u32 = pid
        .parse()
        .wrap_err_with(|| format!("invalid pid `{pid}`"))?;

    // The command is free text, so anchor on the last Created marker
    let created_at = rest
        .rfind(CREATED_MARKER)
        .ok_or_else(|| eyre!("missing created field"))?;
    let command = &rest[..created_at];
    let rest = &rest[created_at + CREATED_MARKER.len()..];

    let (created, rest) = rest
        .split_once(RUNNING_MARKER)
        .ok_or_else(|| eyre!("missing running field"))?;
    let (running, network) = rest
        .split_once(NETWORK_MARKER)
        .ok_or_else(|| eyre!("missing network field"))?;

    Ok(DisplayRow {
        pid,
        command: command.to_string(),
        created: created.to_string(),
        running: running.to_string(),
        network: network.to_string(),
    })
}

pub fn read_report(path: &Path) -> Result<Vec<DisplayRow>> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read report file {}", path.display()))?;
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            parse_report_line(line).wrap_err_with(|| format!("line {}", idx + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use insta::assert_snapshot;

    use super::*;
    use crate::system::process::{Connection, ConnectionError, Connections};

    fn record(pid: u32, argv: Option<&str>, created_at: u64, connections: Connections) -> ProcessRecord {
        ProcessRecord {
            pid,
            command: argv.map(|s| s.split(' ').map(str::to_string).collect()),
            created_at,
            connections,
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("procsnap_{}_{name}", std::process::id()))
    }

    #[test]
    fn fresh_process_report_line() {
        let t0 = 1_700_000_000;
        let mut cache = StartTimeCache::new();
        cache.observe(100, t0);
        let records = vec![record(100, Some("sleep 10"), t0, Connections::Listed(Vec::new()))];

        let rows = render_rows_in(&records, &cache, t0 + 3, &Utc);
        assert_snapshot!(
            report_line(&rows[0]),
            @"PID: 100, Command: sleep 10, Created: 2023-11-14 22:13:20, Running: 0:00:03, Network: N/A"
        );
    }

    #[test]
    fn unobserved_pid_has_no_running_time() {
        let cache = StartTimeCache::new();
        let records = vec![record(5, None, 0, Connections::Unavailable(ConnectionError::PermissionDenied))];
        let rows = render_rows_in(&records, &cache, 100, &Utc);
        assert_snapshot!(
            report_line(&rows[0]),
            @"PID: 5, Command: N/A, Created: 1970-01-01 00:00:00, Running: N/A, Network: N/A"
        );
    }

    #[test]
    fn reused_pid_reports_time_since_first_observation() {
        let mut cache = StartTimeCache::new();
        cache.observe(100, 1_000);
        cache.observe(100, 4_000);
        assert_eq!(running_time(&cache, 100, 4_010), "0:50:10");
    }

    #[test]
    fn clock_skew_clamps_to_zero() {
        let mut cache = StartTimeCache::new();
        cache.observe(1, 2_000);
        assert_eq!(running_time(&cache, 1, 1_000), "0:00:00");
    }

    #[test]
    fn report_has_one_line_per_record_and_round_trips() {
        let mut cache = StartTimeCache::new();
        cache.observe(1, 1_000);
        cache.observe(2, 2_000);
        let records = vec![
            record(1, Some("nginx -g daemon off;"), 1_000, Connections::Listed(vec![Connection {
                local: Some("0.0.0.0:80".parse().unwrap()),
                remote: None,
                status: "LISTEN".into(),
            }])),
            record(2, None, 2_000, Connections::Unavailable(ConnectionError::ProcessGone)),
        ];
        let path = temp_path("roundtrip.txt");

        let rows = render_rows(&records, &cache, 5_000);
        write_rows(&rows, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().all(|l| l.starts_with("PID: ")));

        let parsed = read_report(&path).unwrap();
        assert_eq!(parsed, rows);
        assert_eq!(parsed[0].network, "0.0.0.0:80 -> N/A:N/A (LISTEN)");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn multiline_command_stays_on_one_report_line() {
        let mut cache = StartTimeCache::new();
        cache.observe(7, 1_000);
        let records = vec![ProcessRecord {
            pid: 7,
            command: Some(vec!["sh".into(), "-c".into(), "echo a\necho b\r".into()]),
            created_at: 1_000,
            connections: Connections::Listed(Vec::new()),
        }];
        let path = temp_path("multiline.txt");

        write_report(&records, &cache, 1_010, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(!contents.contains('\r'));

        let parsed = read_report(&path).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].command, "sh -c echo a\\necho b\\r");
        assert_eq!(parsed[0].running, "0:00:10");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn write_report_overwrites_existing_file() {
        let path = temp_path("overwrite.txt");
        fs::write(&path, "old\ncontents\nthat\nis\nlonger\n").unwrap();

        let cache = StartTimeCache::new();
        let records = vec![record(9, Some("true"), 0, Connections::Listed(Vec::new()))];
        write_report(&records, &cache, 0, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("PID: 9, Command: true, "));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn write_to_missing_directory_is_an_error() {
        let path = Path::new("/nonexistent/procsnap/report.txt");
        let err = write_report(&[], &StartTimeCache::new(), 0, path).unwrap_err();
        assert!(format!("{err}").contains("/nonexistent/procsnap/report.txt"));
    }

    #[test]
    fn command_containing_markers_round_trips() {
        let row = DisplayRow {
            pid: 42,
            command: "sh -c echo PID: 1, Created: x, Running: y, Network: z".to_string(),
            created: "2024-01-01 00:00:00".to_string(),
            running: "0:00:01".to_string(),
            network: "N/A".to_string(),
        };
        assert_eq!(parse_report_line(&report_line(&row)).unwrap(), row);
    }

    #[test]
    fn empty_report_has_zero_records() {
        let path = temp_path("empty.txt");
        write_report(&[], &StartTimeCache::new(), 0, &path).unwrap();
        assert_eq!(read_report(&path).unwrap().len(), 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(parse_report_line("garbage").is_err());
        assert!(parse_report_line("PID: abc, Command: x, Created: a, Running: b, Network: c").is_err());
        assert!(parse_report_line("PID: 1, Command: x, Created: a").is_err());
    }
}
