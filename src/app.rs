use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::action::{Action, Direction};
use crate::config::{Config, InvalidConfig, parse_key};
use crate::format::unix_now;
use crate::report::{DisplayRow, render_rows, write_report};
use crate::system::collector::SystemSource;
use crate::system::process::{ConnectionError, ProcessRecord};
use crate::system::snapshot::Snapshotter;
use crate::system::source::ProcessSource;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    SavePrompt,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub refresh: KeyCode,
    pub save: KeyCode,
    pub clear: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            save: parse_key(&kb.save).unwrap_or(KeyCode::Char('s')),
            clear: parse_key(&kb.clear).unwrap_or(KeyCode::Char('c')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.refresh), "Refresh process list"),
            (key_label(self.save), "Save report to file"),
            (key_label(self.clear), "Clear the table"),
            (key_label(self.help), "Toggle help"),
            (key_label(self.quit), "Quit"),
        ];
        entries.push(("\u{2191}\u{2193}".to_string(), "Move selection"));
        entries.push(("PgUp/PgDn".to_string(), "Scroll a page"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub created: Instant,
}

pub struct App<S: ProcessSource = SystemSource> {
    pub running: bool,
    pub snapshotter: Snapshotter<S>,
    pub records: Vec<ProcessRecord>,
    pub rows: Vec<DisplayRow>,
    pub table_state: TableState,
    pub input_mode: InputMode,
    pub save_path: String,
    pub status_message: Option<StatusMessage>,
    pub last_refresh: Option<u64>,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    default_save_path: PathBuf,
    status_timeout: Duration,
    page_size: usize,
    clock: fn() -> u64,
}

impl App<SystemSource> {
    pub fn new(config: &Config) -> Self {
        App::with_source(config, SystemSource::new(), unix_now)
    }
}

impl<S: ProcessSource> App<S> {
    pub fn with_source(config: &Config, source: S, clock: fn() -> u64) -> Self {
        let mut app = App {
            running: true,
            snapshotter: Snapshotter::new(source, config.cache.evict_exited),
            records: Vec::new(),
            rows: Vec::new(),
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            save_path: String::new(),
            status_message: None,
            last_refresh: None,
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            default_save_path: config.report.default_path.clone(),
            status_timeout: Duration::from_millis(config.general.status_timeout_ms),
            page_size: 10,
            clock,
        };
        app.refresh();
        app
    }

    pub fn refresh(&mut self) {
        let now = (self.clock)();
        self.records = self.snapshotter.list_processes();
        self.rows = render_rows(&self.records, self.snapshotter.cache(), now);
        self.last_refresh = Some(now);

        let selected = match self.table_state.selected() {
            _ if self.rows.is_empty() => None,
            Some(i) => Some(i.min(self.rows.len() - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    /// Empties the table; the start-time cache is left alone.
    pub fn clear(&mut self) {
        self.records.clear();
        self.rows.clear();
        self.table_state = TableState::default();
    }

    /// Takes a fresh snapshot and writes it to `path`. Returns the number of lines written.
    pub fn save(&mut self, path: &Path) -> Result<usize> {
        let records = self.snapshotter.list_processes();
        write_report(&records, self.snapshotter.cache(), (self.clock)(), path)?;
        Ok(records.len())
    }

    pub fn on_tick(&mut self) {
        if let Some(msg) = &self.status_message
            && msg.created.elapsed() >= self.status_timeout
        {
            self.status_message = None;
        }
    }

    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::SavePrompt => self.map_key_save(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Navigation keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Home),
            KeyCode::End => return Action::Navigate(Direction::End),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == kb.save {
            return Action::BeginSave;
        }
        if code == kb.clear {
            return Action::Clear;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_save(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::CancelSave,
            KeyCode::Enter => Action::ConfirmSave,
            KeyCode::Backspace => {
                let mut text = self.save_path.clone();
                text.pop();
                Action::UpdateSavePath(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.save_path.clone();
                text.push(c);
                Action::UpdateSavePath(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::Refresh => self.refresh(),
            Action::Clear => self.clear(),
            Action::BeginSave => {
                self.save_path = self.default_save_path.display().to_string();
                self.input_mode = InputMode::SavePrompt;
            }
            Action::UpdateSavePath(text) => {
                self.save_path = text;
            }
            Action::CancelSave => {
                self.save_path.clear();
                self.input_mode = InputMode::Normal;
            }
            Action::ConfirmSave => {
                self.input_mode = InputMode::Normal;
                let path = PathBuf::from(std::mem::take(&mut self.save_path));
                if path.as_os_str().is_empty() {
                    self.set_status("No file name given".to_string(), StatusKind::Error);
                    return;
                }
                match self.save(&path) {
                    Ok(lines) => self.set_status(
                        format!("Saved {lines} processes to {}", path.display()),
                        StatusKind::Ok,
                    ),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "report save failed");
                        self.set_status(format!("{err:#}"), StatusKind::Error);
                    }
                }
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let current = self.table_state.selected().unwrap_or(0);
        let next = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
            Direction::PageUp => current.saturating_sub(self.page_size),
            Direction::PageDown => (current + self.page_size).min(last),
            Direction::Home => 0,
            Direction::End => last,
        };
        self.table_state.select(Some(next));
    }

    pub fn show_invalid_config(&mut self, invalid: &InvalidConfig) {
        self.set_status(
            format!("Invalid config {}, using defaults", invalid.path.display()),
            StatusKind::Error,
        );
    }

    fn set_status(&mut self, text: String, kind: StatusKind) {
        self.status_message = Some(StatusMessage {
            text,
            kind,
            created: Instant::now(),
        });
    }

    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.table_state.selected().and_then(|i| self.rows.get(i))
    }

    /// Why the selected row's sockets could not be read, if they could not.
    pub fn selected_unavailable_reason(&self) -> Option<&ConnectionError> {
        self.table_state
            .selected()
            .and_then(|i| self.records.get(i))
            .and_then(|record| record.connections.unavailable_reason())
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }
}
