//! crud-table binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal in
//! raw mode, runs the TUI event loop, and restores the terminal state on exit.
//!
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use crud_table::app::{self, Settings, Variant};
use crud_table::error::{Context, Result};
use crud_table::paging::DEFAULT_ROWS_PER_PAGE;
use crud_table::source::DEFAULT_USERS_URL;

/// Searchable CRUD table in the terminal.
#[derive(Parser, Debug)]
#[command(name = "crud-table", version, about)]
struct Cli {
    /// Which table to run.
    #[arg(long, value_enum, default_value_t = Variant::Static)]
    mode: Variant,
    /// Endpoint returning a JSON array of users (remote and paged modes).
    #[arg(long, env = "CRUD_TABLE_URL", default_value = DEFAULT_USERS_URL)]
    url: String,
    /// Rows per page in paged mode.
    #[arg(long, default_value_t = DEFAULT_ROWS_PER_PAGE)]
    rows_per_page: usize,
    /// Move back to the last page when a search leaves the current one empty.
    #[arg(long)]
    clamp_pages: bool,
    /// Theme file (key = #RRGGBB).
    #[arg(long, default_value = "theme.conf")]
    theme: String,
    /// Keybindings file (Action = Key).
    #[arg(long, default_value = "keybinds.conf")]
    keybinds: String,
    /// Write logs here; logging is off without it. Level via RUST_LOG.
    #[arg(long, env = "CRUD_TABLE_LOG")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            variant: self.mode,
            url: self.url.clone(),
            rows_per_page: self.rows_per_page,
            clamp_pages: self.clamp_pages,
            theme_path: self.theme.clone(),
            keybinds_path: self.keybinds.clone(),
        }
    }
}

/// Send `tracing` output to `path`; the terminal itself belongs to the TUI.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let settings = cli.settings();
    tracing::info!(mode = ?settings.variant, "starting");

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {e}"))?;

    let res = app::run(&mut terminal, &settings);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
