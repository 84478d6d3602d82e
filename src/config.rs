use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub report: ReportConfig,
    pub cache: CacheConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub tick_rate_ms: u64,
    pub status_timeout_ms: u64,
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            tick_rate_ms: 250,
            status_timeout_ms: 3000,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub default_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            default_path: PathBuf::from("processes.txt"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Forget start times of pids missing from the latest enumeration.
    pub evict_exited: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { evict_exited: true }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub refresh: String,
    pub save: String,
    pub clear: String,
    pub help: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            refresh: "r".to_string(),
            save: "s".to_string(),
            clear: "c".to_string(),
            help: "?".to_string(),
        }
    }
}

/// Parses a keybind such as `"q"`, `"Enter"` or `"F5"`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        other => other
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procsnap").join("config.toml"))
}

/// A config file that exists but does not parse.
#[derive(Debug)]
pub struct InvalidConfig {
    pub path: PathBuf,
    pub error: toml::de::Error,
}

impl InvalidConfig {
    /// Emits the warning; call once tracing is installed.
    pub fn log(&self) {
        tracing::warn!(
            path = %self.path.display(),
            err = %self.error,
            "invalid config, using defaults"
        );
    }
}

/// Loads `path`, or the default location when `None`. Missing or unreadable
/// files give defaults; an invalid file gives defaults plus the parse error.
pub fn load_config(path: Option<&Path>) -> (Config, Option<InvalidConfig>) {
    match path.map(Path::to_path_buf).or_else(config_path) {
        Some(path) => load_config_from_path(&path),
        None => (Config::default(), None),
    }
}

pub fn load_config_from_path(path: &Path) -> (Config, Option<InvalidConfig>) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return (Config::default(), None);
    };
    match toml::from_str(&contents) {
        Ok(config) => (config, None),
        Err(error) => (
            Config::default(),
            Some(InvalidConfig {
                path: path.to_path_buf(),
                error,
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.tick_rate_ms, 250);
        assert_eq!(config.general.status_timeout_ms, 3000);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.report.default_path, PathBuf::from("processes.txt"));
        assert!(config.cache.evict_exited);
        assert_eq!(config.colors.theme, "dark");
        assert_eq!(config.keybinds.quit, "q");
        assert_eq!(config.keybinds.save, "s");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[report]
default_path = "/tmp/snap.txt"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.report.default_path, PathBuf::from("/tmp/snap.txt"));
        // Other fields should be defaults
        assert_eq!(config.general.tick_rate_ms, 250);
        assert!(config.cache.evict_exited);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
tick_rate_ms = 100
status_timeout_ms = 5000
log_level = "debug"

[report]
default_path = "out.txt"

[cache]
evict_exited = false

[colors]
theme = "light"

[keybinds]
quit = "x"
refresh = "F5"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.tick_rate_ms, 100);
        assert_eq!(config.general.status_timeout_ms, 5000);
        assert_eq!(config.general.log_level, "debug");
        assert!(!config.cache.evict_exited);
        assert_eq!(config.colors.theme, "light");
        assert_eq!(config.keybinds.quit, "x");
        assert_eq!(config.keybinds.refresh, "F5");
        assert_eq!(config.keybinds.clear, "c");
    }

    #[test]
    fn parse_key_variants() {
        assert_eq!(parse_key("q"), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("?"), Some(KeyCode::Char('?')));
        assert_eq!(parse_key("Enter"), Some(KeyCode::Enter));
        assert_eq!(parse_key("escape"), Some(KeyCode::Esc));
        assert_eq!(parse_key("F5"), Some(KeyCode::F(5)));
        assert_eq!(parse_key("F13"), None);
        assert_eq!(parse_key("nonsense"), None);
    }

    #[test]
    fn missing_file_returns_default() {
        let (config, invalid) = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.tick_rate_ms, 250);
        assert!(invalid.is_none());
    }

    #[test]
    fn invalid_toml_returns_default_and_error() {
        let temp = std::env::temp_dir().join(format!("procsnap_invalid_{}.toml", std::process::id()));
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let (config, invalid) = load_config_from_path(&temp);
        let _ = std::fs::remove_file(&temp);

        assert_eq!(config.general.tick_rate_ms, 250);
        let invalid = invalid.expect("parse error not reported");
        assert_eq!(invalid.path, temp);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn invalid_config_warning_reaches_installed_subscriber() {
        let temp = std::env::temp_dir().join(format!("procsnap_warn_{}.toml", std::process::id()));
        std::fs::write(&temp, "[general]\ntick_rate_ms = \"fast\"\n").unwrap();
        let (_, invalid) = load_config_from_path(&temp);
        let _ = std::fs::remove_file(&temp);

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            invalid.as_ref().expect("parse error not reported").log();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "output: {output}");
        assert!(output.contains("invalid config, using defaults"));
        assert!(output.contains(&temp.display().to_string()));
    }
}
