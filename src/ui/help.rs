use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Row, Table};

use crate::ui::theme::Theme;

const KEY_COLUMN: u16 = 11;

/// Centered overlay listing keybind -> description pairs.
pub fn render(frame: &mut Frame, area: Rect, entries: &[(String, &str)], theme: &Theme) {
    let width = 44u16.min(area.width.saturating_sub(4));
    // entries + borders + blank line + footer
    let height = (entries.len() as u16 + 4).min(area.height.saturating_sub(2));
    let overlay = centered_rect(width, height, area);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Commands ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(
            " Esc to close ",
            Style::default().fg(theme.muted),
        ))
        .style(Style::default().bg(theme.surface_bg));

    let key_style = Style::default()
        .fg(theme.pill_key_fg)
        .bg(theme.pill_key_bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(theme.pill_desc_fg);

    let mut rows: Vec<Row> = entries
        .iter()
        .map(|(key, desc)| {
            Row::new([
                Cell::from(format!("{key:>width$} ", width = KEY_COLUMN as usize - 1))
                    .style(key_style),
                Cell::from(desc.to_string()).style(desc_style),
            ])
        })
        .collect();
    rows.push(Row::new([""; 2]));
    rows.push(Row::new([
        Cell::from(""),
        Cell::from("One report line per process")
            .style(Style::default().fg(theme.muted)),
    ]));

    let table = Table::new(rows, [Constraint::Length(KEY_COLUMN), Constraint::Fill(1)])
        .column_spacing(2)
        .block(block);
    frame.render_widget(table, overlay);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [vert] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [horiz] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vert);
    horiz
}
