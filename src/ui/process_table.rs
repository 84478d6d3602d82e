use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::format::{NOT_AVAILABLE, truncate_unicode};
use crate::report::DisplayRow;
use crate::ui::theme::Theme;

const COLUMN_SPACING: u16 = 1;
const HIGHLIGHT_SYMBOL: &str = "\u{25b6} ";

fn column_widths() -> [Constraint; 5] {
    [
        Constraint::Length(7),
        Constraint::Fill(2),
        Constraint::Length(19),
        Constraint::Length(10),
        Constraint::Fill(3),
    ]
}

/// Renders the process table. `refresh_key` is shown in the empty-table hint.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[DisplayRow],
    state: &mut TableState,
    theme: &Theme,
    refresh_key: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " Processes ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);

    if rows.is_empty() {
        frame.render_widget(block, area);
        let hint = Line::from(vec![
            Span::styled("No processes shown. Press ", Style::default().fg(theme.muted)),
            Span::styled(
                refresh_key.to_string(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to refresh.", Style::default().fg(theme.muted)),
        ]);
        frame.render_widget(Paragraph::new(hint).centered(), inner);
        return;
    }

    // Column widths after the highlight gutter, used to ellipsize long text
    let gutter = HIGHLIGHT_SYMBOL.chars().count() as u16;
    let cells_area = Rect {
        x: inner.x + gutter.min(inner.width),
        width: inner.width.saturating_sub(gutter),
        ..inner
    };
    let widths = Layout::horizontal(column_widths())
        .spacing(COLUMN_SPACING)
        .split(cells_area);
    let command_width = widths[1].width as usize;
    let network_width = widths[4].width as usize;

    let header_style = Style::default()
        .fg(theme.column_header_fg)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(["PID", "Command", "Created", "Running", "Network"]).style(header_style);

    let body = rows.iter().map(|row| {
        Row::new([
            Cell::from(row.pid.to_string()),
            text_cell(&row.command, command_width, theme),
            Cell::from(row.created.clone()),
            text_cell(&row.running, usize::MAX, theme),
            text_cell(&row.network, network_width, theme),
        ])
        .style(Style::default().fg(theme.text))
    });

    let table = Table::new(body, column_widths())
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(theme.selected_fg)
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(HIGHLIGHT_SYMBOL);

    frame.render_stateful_widget(table, area, state);
}

fn text_cell<'a>(text: &str, max_width: usize, theme: &Theme) -> Cell<'a> {
    if text == NOT_AVAILABLE {
        return Cell::from(Span::styled(
            NOT_AVAILABLE,
            Style::default().fg(theme.not_available),
        ));
    }
    Cell::from(truncate_unicode(text, max_width))
}

/// Number of body rows that fit in `area` (borders and header excluded).
pub fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}
