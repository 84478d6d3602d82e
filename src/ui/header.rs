use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::format::format_created_in;
use crate::ui::theme::Theme;

pub struct HeaderInfo {
    pub process_count: usize,
    /// Epoch seconds of the last refresh, `None` before the first one.
    pub last_refresh: Option<u64>,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let mut spans = vec![
        Span::styled(
            " procsnap ",
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} processes", info.process_count),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(at) = info.last_refresh {
        spans.push(Span::styled(
            format!("  refreshed {}", format_created_in(at, &Local)),
            Style::default().fg(theme.muted),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface_bg)),
        area,
    );
}
