//! Application state types and entry glue.
//!
//! `AppState` is the single owned state of the TUI: the record store and its
//! form, the search query, the optional pager and the view bookkeeping around
//! them. The filtered and paged views are recomputed from it on every access.
//!
pub mod keymap;
pub mod update;

use std::path::PathBuf;
use std::time::Instant;

use rand::Rng;
use ratatui::style::Color;

use crate::error::FetchError;
use crate::paging::{DEFAULT_ROWS_PER_PAGE, Pager};
use crate::search;
use crate::source::{self, RemoteUser};
use crate::table::{FormField, Record, TableStore};
use keymap::Keymap;

/// Which table variant is running.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// Fixed seed rows.
    Static,
    /// Rows fetched once from the endpoint.
    Remote,
    /// Fetched rows, split into pages.
    Paged,
}

impl Variant {
    pub fn is_remote(self) -> bool {
        !matches!(self, Variant::Static)
    }

    pub fn title(self) -> &'static str {
        match self {
            Variant::Static => "CRUD Table with Search",
            Variant::Remote => "CRUD Table with Search (remote)",
            Variant::Paged => "CRUD Table with Search and Pagination",
        }
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form(FormField),
    Modal,
}

/// Progress of the initial remote load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing to load (static variant).
    Idle,
    Loading,
    Loaded(usize),
    Failed(String),
}

/// Modal dialogs. While one is open, keys go to the modal only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Info {
        message: String,
    },
    DeleteConfirm {
        id: u64,
        /// 0 = Yes, 1 = No.
        selected: usize,
    },
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            let Some(color) = Self::parse_color(val) else {
                tracing::debug!(key, val, "ignoring unparsable theme color");
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# crud-table theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // best-effort hex for named colors
                Color::Black => "#000000".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::White => "#FFFFFF".to_string(),
                _ => "reset".to_string(),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);

        std::fs::write(path, buf)
    }

    /// Load the theme at `path` (or from the config dir); write `mocha` there if neither exists.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing.to_string_lossy()).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

/// Directory holding `theme.conf` and `keybinds.conf`:
/// `$XDG_CONFIG_HOME/crud-table`, else `$HOME/.config/crud-table`.
pub fn config_dir() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("crud-table"))
}

/// Path of an existing config file named `name` in [`config_dir`].
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    let p = config_dir()?.join(name);
    p.is_file().then_some(p)
}

/// Startup options, filled from the command line.
#[derive(Clone, Debug)]
pub struct Settings {
    pub variant: Variant,
    pub url: String,
    pub rows_per_page: usize,
    pub clamp_pages: bool,
    pub theme_path: String,
    pub keybinds_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Static,
            url: source::DEFAULT_USERS_URL.to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            clamp_pages: false,
            theme_path: "theme.conf".to_string(),
            keybinds_path: "keybinds.conf".to_string(),
        }
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub variant: Variant,
    pub store: TableStore,
    pub search_query: String,
    pub pager: Option<Pager>,
    /// Pull the current page back in range when the view shrinks.
    pub clamp_pages: bool,
    /// Index into [`AppState::visible`].
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    /// Mode to go back to when the open modal closes.
    pub modal_return: InputMode,
    pub load_state: LoadState,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    /// Fresh state for `variant`: seed rows for static, empty and loading otherwise.
    pub fn new(variant: Variant) -> Self {
        let (records, load_state) = if variant.is_remote() {
            (Vec::new(), LoadState::Loading)
        } else {
            (source::seed_records(), LoadState::Idle)
        };
        Self {
            started_at: Instant::now(),
            variant,
            store: TableStore::new(records),
            search_query: String::new(),
            pager: matches!(variant, Variant::Paged).then(Pager::default),
            clamp_pages: false,
            selected_index: 0,
            input_mode: InputMode::Normal,
            modal: None,
            modal_return: InputMode::Normal,
            load_state,
            theme: Theme::mocha(),
            keymap: Keymap::default(),
        }
    }

    /// Build from startup settings, reading theme and keybindings from disk.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut app = Self::new(settings.variant);
        if app.pager.is_some() {
            app.pager = Some(Pager::new(settings.rows_per_page));
        }
        app.clamp_pages = settings.clamp_pages;
        app.theme = Theme::load_or_init(&settings.theme_path);
        app.keymap = Keymap::load_or_init(&settings.keybinds_path);
        app
    }

    /// Replace the rows, e.g. to seed a test.
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.store.replace_all(records);
        self.refresh_view();
        self
    }

    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        if self.pager.is_some() {
            self.pager = Some(Pager::new(rows_per_page));
        }
        self
    }

    pub fn filtered(&self) -> Vec<&Record> {
        search::filter(&self.store.records, &self.search_query)
    }

    /// Rows on screen: the filtered view, sliced to the current page when paged.
    pub fn visible(&self) -> Vec<&Record> {
        let filtered = self.filtered();
        match &self.pager {
            Some(pager) => pager.slice(&filtered).to_vec(),
            None => filtered,
        }
    }

    /// Page count of the filtered view; `None` when not paginated.
    pub fn total_pages(&self) -> Option<usize> {
        self.pager.as_ref().map(|p| p.total_pages(self.filtered().len()))
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.visible().get(self.selected_index).copied()
    }

    /// Keep the page (when clamping is on) and the selection inside the current view.
    fn refresh_view(&mut self) {
        if self.clamp_pages {
            let total = self.total_pages();
            if let (Some(pager), Some(total)) = (self.pager.as_mut(), total) {
                pager.clamp(total);
            }
        }
        let len = self.visible().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.selected_index = 0;
        self.refresh_view();
    }

    pub fn push_search(&mut self, c: char) {
        let mut q = std::mem::take(&mut self.search_query);
        q.push(c);
        self.set_search(q);
    }

    pub fn pop_search(&mut self) {
        let mut q = std::mem::take(&mut self.search_query);
        q.pop();
        self.set_search(q);
    }

    /// Commit the form. An empty field opens a blocking info modal instead.
    pub fn submit_form(&mut self) -> bool {
        match self.store.submit() {
            Ok(()) => {
                self.input_mode = InputMode::Normal;
                self.refresh_view();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "form rejected");
                self.open_info(e.to_string());
                false
            }
        }
    }

    pub fn clear_form(&mut self) {
        self.store.clear_form();
    }

    /// Focus the form for a new row. A pending edit is dropped first.
    pub fn start_add(&mut self) {
        if self.store.form.is_edit() {
            self.store.clear_form();
        }
        self.input_mode = InputMode::Form(FormField::Name);
    }

    /// Load the selected row into the form and focus it.
    pub fn edit_selected(&mut self) -> bool {
        let Some(id) = self.selected_record().map(|r| r.id) else {
            return false;
        };
        let found = self.store.edit(id);
        if found {
            self.input_mode = InputMode::Form(FormField::Name);
        }
        found
    }

    /// Ask for confirmation before deleting the selected row.
    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_record().map(|r| r.id) {
            self.open_modal(ModalState::DeleteConfirm { id, selected: 1 });
        }
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let removed = self.store.delete(id);
        self.refresh_view();
        removed
    }

    /// Jump to page `n`; no-op when out of range or not paginated.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        let Some(total) = self.total_pages() else {
            return false;
        };
        let changed = self.pager.as_mut().is_some_and(|p| p.go_to_page(n, total));
        if changed {
            self.selected_index = 0;
        }
        changed
    }

    pub fn next_page(&mut self) -> bool {
        match self.pager.map(|p| p.current_page()) {
            Some(current) => self.go_to_page(current + 1),
            None => false,
        }
    }

    pub fn previous_page(&mut self) -> bool {
        match self.pager.map(|p| p.current_page()) {
            Some(current) if current > 1 => self.go_to_page(current - 1),
            _ => false,
        }
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.visible().len() {
            self.selected_index += 1;
        }
    }

    /// Apply the outcome of the initial load.
    ///
    /// Success replaces every row. Failure is logged and leaves the rows as they are.
    pub fn apply_loaded<R: Rng>(&mut self, result: Result<Vec<RemoteUser>, FetchError>, rng: &mut R) {
        match result {
            Ok(users) => {
                let records = source::into_records(users, rng);
                tracing::info!(count = records.len(), "loaded remote records");
                self.load_state = LoadState::Loaded(records.len());
                self.store.replace_all(records);
                self.refresh_view();
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching data");
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Show `modal` and route keys to it; closing returns to the current mode.
    pub fn open_modal(&mut self, modal: ModalState) {
        if self.input_mode != InputMode::Modal {
            self.modal_return = self.input_mode;
        }
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn open_info(&mut self, message: impl Into<String>) {
        self.open_modal(ModalState::Info { message: message.into() });
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = std::mem::replace(&mut self.modal_return, InputMode::Normal);
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
