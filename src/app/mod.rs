//! Application state types and entry glue.
//!
//! Holds the top-level [`AppState`] wrapping the table page, re-exports the
//! theme, and re-exports the event loop as `run`.
//!
pub mod dispatch;
pub mod forms;
pub mod keymap;
pub mod page;
pub mod theme;
pub mod toast;
pub mod update;

use crate::config::ClientConfig;
use keymap::Keymap;
use page::TablePage;
pub use theme::Theme;

pub struct AppState {
    pub page: TablePage,
    pub theme: Theme,
    pub keymap: Keymap,
    pub show_keybinds: bool,
    /// Rows that fit in the grid body; set while rendering.
    pub rows_per_view: usize,
    pub should_quit: bool,
    /// Backend shown in the header.
    pub backend: String,
}

impl AppState {
    pub fn new(config: &ClientConfig, theme: Theme, keymap: Keymap) -> Self {
        Self {
            page: TablePage::new(config.page_size),
            theme,
            keymap,
            show_keybinds: false,
            rows_per_view: 1,
            should_quit: false,
            backend: config.base_url.clone(),
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
