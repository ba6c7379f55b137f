//! booktable binary entry point.
//!
//! Loads configuration, sets up file logging and the tokio runtime,
//! initializes the terminal in raw mode, runs the TUI event loop,
//! and restores the terminal state on exit.
//!
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use booktable::app::dispatch::Dispatcher;
use booktable::app::keymap::Keymap;
use booktable::app::{self, AppState, Theme};
use booktable::cli::Cli;
use booktable::config::ClientConfig;
use booktable::service::{BookService, HttpBookService};

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Send `tracing` output to `path`; stdout belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = cli.config_dir();
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("create config dir {}", config_dir.display()))?;

    init_logging(&cli.log_file())?;

    let mut config = ClientConfig::load_or_init(&config_dir.join("booktable.conf"));
    cli.apply(&mut config);
    if cli.dump_config {
        print!("{}", config.to_file_string());
        return Ok(());
    }
    tracing::info!(base_url = %config.base_url, page_size = config.page_size, "starting booktable");

    let theme = Theme::load_or_init(&config_dir.join("theme.conf").to_string_lossy());
    let keymap = Keymap::load_or_init(&config_dir.join("keybinds.conf").to_string_lossy());

    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    let service: Arc<dyn BookService> =
        Arc::new(HttpBookService::new(&config).context("build HTTP client")?);
    let (dispatcher, mut completions) = Dispatcher::new(runtime.handle().clone(), service);
    let mut state = AppState::new(&config, theme, keymap);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &dispatcher, &mut completions);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    // In-flight requests are abandoned on exit.
    runtime.shutdown_background();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
