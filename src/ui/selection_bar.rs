use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::{NOT_AVAILABLE, truncate_unicode};
use crate::ui::theme::Theme;

/// Full-width view of the selected row's sockets, which the table usually clips.
#[derive(Debug, Clone)]
pub struct SelectionInfo {
    pub pid: u32,
    pub running: String,
    pub network: String,
    /// Why the sockets could not be read, shown in place of a bare `N/A`.
    pub unavailable_reason: Option<String>,
}

pub fn render(frame: &mut Frame, area: Rect, selected: Option<SelectionInfo>, theme: &Theme) {
    let style = Style::default().bg(theme.statusbar_bg).fg(theme.text);
    let width = area.width as usize;
    let line = match selected {
        Some(selection) => format_selection_line(selection, width),
        None => " ".repeat(width),
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, style))).style(style),
        area,
    );
}

fn format_selection_line(selection: SelectionInfo, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut tag = format!("PID {} up {}", selection.pid, selection.running);
    if tag.width() > width {
        tag = truncate_unicode(&tag, width);
        let pad = width.saturating_sub(tag.width());
        return format!("{}{}", " ".repeat(pad), tag);
    }

    let tag_width = tag.width();
    let left_capacity = width.saturating_sub(tag_width + 1);
    let network = match &selection.unavailable_reason {
        Some(reason) => format!("{NOT_AVAILABLE} ({reason})"),
        None => selection.network,
    };
    let network = truncate_unicode(&network, left_capacity);
    let network_width = network.width();
    let gap = width.saturating_sub(network_width + tag_width);
    format!("{network}{}{tag}", " ".repeat(gap))
}
