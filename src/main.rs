mod event;

use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::KeyEventKind;
use event::{Event, EventHandler};
use procsnap::app::App;
use procsnap::config::{Config, InvalidConfig, load_config};
use procsnap::format::unix_now;
use procsnap::logging::{LogTarget, init_tracing, parse_level};
use procsnap::report::{self, render_rows, write_report};
use procsnap::system::snapshot::Snapshotter;
use procsnap::ui;

#[derive(Parser)]
#[command(
    name = "procsnap",
    about = "List running processes with their sockets and uptime, and save snapshots"
)]
struct Cli {
    /// Path to config file (default: <config dir>/procsnap/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the process list and exit
    #[arg(long, conflicts_with_all = ["save", "check"])]
    list: bool,

    /// With --list, print one JSON object per process
    #[arg(long, requires = "list")]
    json: bool,

    /// Write a snapshot report to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with = "check")]
    save: Option<PathBuf>,

    /// Validate a saved report and print its record count
    #[arg(long, value_name = "REPORT")]
    check: Option<PathBuf>,

    /// Write JSON-lines tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn is_headless(&self) -> bool {
        self.list || self.save.is_some() || self.check.is_some()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let (config, invalid_config) = load_config(cli.config.as_deref());

    let level = parse_level(cli.log_level.as_deref().unwrap_or(&config.general.log_level))?;
    let target = match (&cli.log_file, cli.is_headless()) {
        (Some(path), _) => LogTarget::File(path.as_path()),
        (None, true) => LogTarget::Stderr,
        // stderr would scribble over the terminal UI
        (None, false) => LogTarget::Off,
    };
    init_tracing(target, level)?;
    if let Some(invalid) = &invalid_config {
        invalid.log();
    }

    if let Some(path) = &cli.check {
        return run_check(path);
    }
    if let Some(path) = &cli.save {
        return run_save(&config, path);
    }
    if cli.list {
        return run_list(&config, cli.json);
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, &config, invalid_config.as_ref()).await;

    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: &Config,
    invalid_config: Option<&InvalidConfig>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.tick_rate_ms.max(1));
    let mut app = App::new(config);
    if let Some(invalid) = invalid_config {
        app.show_invalid_config(invalid);
    }
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                }
            }
            Event::Tick => app.on_tick(),
            Event::Resize => {}
        }
        terminal.draw(|frame| ui::draw(frame, &mut app))?;
    }

    Ok(())
}

fn run_list(config: &Config, json: bool) -> Result<()> {
    let mut snapshotter = Snapshotter::system(config.cache.evict_exited);
    let records = snapshotter.list_processes();
    let rows = render_rows(&records, snapshotter.cache(), unix_now());

    let mut out = stdout().lock();
    for row in &rows {
        if json {
            serde_json::to_writer(&mut out, row)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", report::report_line(row))?;
        }
    }
    Ok(())
}

fn run_save(config: &Config, path: &Path) -> Result<()> {
    let mut snapshotter = Snapshotter::system(config.cache.evict_exited);
    let records = snapshotter.list_processes();
    write_report(&records, snapshotter.cache(), unix_now(), path)?;
    println!("Saved {} processes to {}", records.len(), path.display());
    Ok(())
}

fn run_check(path: &Path) -> Result<()> {
    let rows = report::read_report(path)?;
    println!("{}: {} process records", path.display(), rows.len());
    Ok(())
}
