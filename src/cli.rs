//! Command-line flags. Values given here override `booktable.conf`.
use std::path::PathBuf;

use clap::Parser;

use crate::config::ClientConfig;

#[derive(Debug, Parser)]
#[command(name = "booktable", version, about = "Manage book records from the terminal")]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long, env = "BOOKTABLE_BASE_URL")]
    pub base_url: Option<String>,

    /// Rows requested per page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// Directory holding booktable.conf, theme.conf and keybinds.conf
    #[arg(long, env = "BOOKTABLE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Log file (stdout is owned by the TUI)
    #[arg(long, env = "BOOKTABLE_LOG")]
    pub log_file: Option<PathBuf>,

    /// Print the effective client configuration and exit
    #[arg(long)]
    pub dump_config: bool,
}

impl Cli {
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(crate::config::config_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.config_dir().join("booktable.log"))
    }

    /// Apply flag overrides on top of a loaded config.
    pub fn apply(&self, cfg: &mut ClientConfig) {
        if let Some(url) = &self.base_url {
            cfg.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(n) = self.page_size {
            cfg.page_size = n.max(1);
        }
    }
}
