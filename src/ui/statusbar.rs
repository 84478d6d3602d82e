use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, ResolvedKeybinds, StatusKind, StatusMessage, key_label};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_mode: InputMode,
    save_path: &str,
    status_message: Option<&StatusMessage>,
    keybinds: &ResolvedKeybinds,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority, except over an open prompt
    if let Some(msg) = status_message
        && input_mode != InputMode::SavePrompt
    {
        let color = match msg.kind {
            StatusKind::Ok => theme.status_ok,
            StatusKind::Error => theme.status_err,
        };
        let line = Line::from(Span::styled(
            format!(" {}", msg.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let line = match input_mode {
        InputMode::SavePrompt => {
            let mut spans = vec![
                Span::styled(
                    " Save to ",
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {save_path}"),
                    Style::default().fg(theme.pill_desc_fg),
                ),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            spans.extend(pill_spans("Esc", "Cancel", theme));
            spans.extend(pill_spans("Enter", "Write", theme));
            Line::from(spans)
        }
        InputMode::Normal | InputMode::Help => {
            let keys = [
                (key_label(keybinds.refresh), "Refresh"),
                (key_label(keybinds.save), "Save"),
                (key_label(keybinds.clear), "Clear"),
                (key_label(keybinds.help), "Help"),
                (key_label(keybinds.quit), "Quit"),
            ];
            let mut spans = Vec::new();
            for (key, desc) in &keys {
                spans.extend(pill_spans(key, desc, theme));
            }
            spans.extend(pill_spans("\u{2191}\u{2193}", "Nav", theme));
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn pill_spans(key: &str, desc: &str, theme: &Theme) -> Vec<Span<'static>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
