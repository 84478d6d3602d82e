pub mod header;
pub mod help;
pub mod process_table;
pub mod selection_bar;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, key_label};
use crate::system::source::ProcessSource;

pub fn draw<S: ProcessSource>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        &header::HeaderInfo {
            process_count: app.rows.len(),
            last_refresh: app.last_refresh,
        },
        &app.theme,
    );

    app.set_page_size(process_table::visible_rows(chunks[1]));
    let refresh_key = key_label(app.keybinds.refresh);
    process_table::render(
        frame,
        chunks[1],
        &app.rows,
        &mut app.table_state,
        &app.theme,
        &refresh_key,
    );

    let selected = app
        .selected_row()
        .map(|row| selection_bar::SelectionInfo {
            pid: row.pid,
            running: row.running.clone(),
            network: row.network.clone(),
            unavailable_reason: app.selected_unavailable_reason().map(ToString::to_string),
        });
    selection_bar::render(frame, chunks[2], selected, &app.theme);

    statusbar::render(
        frame,
        chunks[3],
        app.input_mode,
        &app.save_path,
        app.status_message.as_ref(),
        &app.keybinds,
        &app.theme,
    );

    // Help overlay, rendered last to appear on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}

#[cfg(test)]
mod tests;
