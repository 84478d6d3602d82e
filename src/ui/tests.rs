use std::time::Instant;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::widgets::TableState;

use crate::action::Action;
use crate::app::{App, InputMode, ResolvedKeybinds, StatusKind, StatusMessage};
use crate::config::{Config, KeybindsConfig};
use crate::report::DisplayRow;
use crate::system::process::ConnectionError;
use crate::system::source::fake::{FakeSource, raw};
use crate::ui::theme::Theme;
use crate::ui::{draw, process_table, statusbar};

const NOW: u64 = 1_700_000_100;

fn fixed_clock() -> u64 {
    NOW
}

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn make_app() -> App<FakeSource> {
    let mut source = FakeSource::with(vec![
        raw(1, "init", NOW - 3_600),
        raw(200, "sleep 10", NOW - 5),
        raw(300, "sshd -D", NOW - 60),
    ]);
    source
        .sockets
        .insert(300, Err(ConnectionError::PermissionDenied));
    App::with_source(&Config::default(), source, fixed_clock)
}

fn keybinds() -> ResolvedKeybinds {
    ResolvedKeybinds::from_config(&KeybindsConfig::default())
}

fn row(pid: u32, command: &str, network: &str) -> DisplayRow {
    DisplayRow {
        pid,
        command: command.to_string(),
        created: "2023-11-14 22:13:20".to_string(),
        running: "0:00:03".to_string(),
        network: network.to_string(),
    }
}

#[test]
fn full_screen_shows_header_table_and_pills() {
    let mut app = make_app();
    let output = render_to_string(100, 12, |frame| draw(frame, &mut app));

    assert!(output.contains(" procsnap "));
    assert!(output.contains("3 processes"));
    for column in ["PID", "Command", "Created", "Running", "Network"] {
        assert!(output.contains(column), "missing column {column}");
    }
    assert!(output.contains("sleep 10"));
    assert!(output.contains("1:00:00"));
    assert!(output.contains("Refresh"));
    // Selection bar for the first row
    assert!(output.contains("PID 1 up 1:00:00"));
}

#[test]
fn cleared_table_shows_refresh_hint() {
    let mut app = make_app();
    app.dispatch(Action::Clear);
    let output = render_to_string(80, 10, |frame| draw(frame, &mut app));

    assert!(output.contains("0 processes"));
    assert!(output.contains("No processes shown. Press r to refresh."));
    assert!(!output.contains("sleep 10"));
}

#[test]
fn long_cells_are_ellipsized() {
    let rows = vec![row(
        42,
        "/usr/lib/jvm/java-21/bin/java -Xmx8g -jar /opt/service/very-long-name.jar",
        "127.0.0.1:8080 -> N/A:N/A (LISTEN), 10.1.2.3:8080 -> 10.1.2.99:41000 (ESTABLISHED)",
    )];
    let mut state = TableState::default().with_selected(Some(0));
    let output = render_to_string(90, 5, |frame| {
        process_table::render(
            frame,
            Rect::new(0, 0, 90, 5),
            &rows,
            &mut state,
            &Theme::dark(),
            "r",
        );
    });

    assert!(output.contains("/usr/lib/jvm"));
    assert!(output.contains("127.0.0.1:8080"));
    assert!(output.contains('\u{2026}'));
    assert!(!output.contains("very-long-name.jar"));
}

#[test]
fn statusbar_lists_configured_commands() {
    let output = render_to_string(80, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 80, 1),
            InputMode::Normal,
            "",
            None,
            &keybinds(),
            &Theme::dark(),
        );
    });

    assert_eq!(
        output.trim_end(),
        "  r  Refresh  s  Save  c  Clear  ?  Help  q  Quit  \u{2191}\u{2193}  Nav"
    );
}

#[test]
fn statusbar_shows_save_prompt_over_status() {
    let status = StatusMessage {
        text: "Saved 3 processes to out.txt".to_string(),
        kind: StatusKind::Ok,
        created: Instant::now(),
    };
    let output = render_to_string(80, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 80, 1),
            InputMode::SavePrompt,
            "/tmp/snap.txt",
            Some(&status),
            &keybinds(),
            &Theme::dark(),
        );
    });

    assert!(output.starts_with(" Save to  /tmp/snap.txt"));
    assert!(output.contains("Cancel"));
    assert!(!output.contains("Saved 3"));
}

#[test]
fn statusbar_shows_error_message() {
    let status = StatusMessage {
        text: "failed to create report file /nope/out.txt".to_string(),
        kind: StatusKind::Error,
        created: Instant::now(),
    };
    let output = render_to_string(60, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 60, 1),
            InputMode::Normal,
            "",
            Some(&status),
            &keybinds(),
            &Theme::dark(),
        );
    });

    assert_eq!(
        output.trim_end(),
        " failed to create report file /nope/out.txt"
    );
}

#[test]
fn help_overlay_lists_commands() {
    let mut app = make_app();
    app.dispatch(Action::ToggleHelp);
    let output = render_to_string(80, 20, |frame| draw(frame, &mut app));

    assert!(output.contains("Commands"));
    assert!(output.contains("Refresh process list"));
    assert!(output.contains("Save report to file"));
    assert!(output.contains("Clear the table"));
}

#[test]
fn selection_bar_names_why_sockets_are_missing() {
    let mut app = make_app();
    app.dispatch(Action::Navigate(crate::action::Direction::End));
    let output = render_to_string(100, 12, |frame| draw(frame, &mut app));

    assert!(output.contains("N/A (permission denied)"));
    assert!(output.contains("PID 300 up 0:01:00"));
}
