//! Client configuration: parse/write `booktable.conf` and resolve config paths.
//!
//! The file uses the same `<key> = <value>` format as `theme.conf` and
//! `keybinds.conf`. Comments (`#`) and blank lines are ignored, unknown keys
//! are skipped.
//!
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Context, Result};
use crate::model::DEFAULT_PAGE_SIZE;
use crate::service::Endpoints;

/// Name of the directory created under the user's config home.
pub const APP_DIR: &str = "booktable";

/// Settings for talking to the book API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Paths of the list/create/update/remove endpoints.
    pub endpoints: Endpoints,
    /// Rows requested per page.
    pub page_size: u64,
    /// Optional per-request timeout. Unset means requests may wait forever.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            endpoints: Endpoints::default(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }

    /// Load from `path`, or write defaults there if the file does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(path) {
            tracing::warn!(error = %e, path = %path.display(), "could not write default client config");
        }
        cfg
    }

    /// Parse a config file. Returns `None` if it cannot be read.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse config text, starting from defaults.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() {
                continue;
            }
            match key {
                "base_url" if !val.is_empty() => cfg.base_url = val.trim_end_matches('/').to_string(),
                "list_path" if !val.is_empty() => cfg.endpoints.list = val.to_string(),
                "create_path" if !val.is_empty() => cfg.endpoints.create = val.to_string(),
                "update_path" if !val.is_empty() => cfg.endpoints.update = val.to_string(),
                "remove_path" if !val.is_empty() => cfg.endpoints.remove = val.to_string(),
                "page_size" => {
                    if let Ok(n) = val.parse::<u64>() {
                        cfg.page_size = n.max(1);
                    }
                }
                "request_timeout_secs" => {
                    cfg.request_timeout_secs = match val {
                        "" | "none" | "None" => None,
                        v => v.parse::<u64>().ok().or(cfg.request_timeout_secs),
                    };
                }
                _ => {}
            }
        }
        cfg
    }

    /// Render the config in file format.
    pub fn to_file_string(&self) -> String {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# booktable client configuration\n");
        buf.push_str("# Format: <key> = <value>\n\n");
        let _ = writeln!(&mut buf, "base_url = {}", self.base_url);
        let _ = writeln!(&mut buf, "list_path = {}", self.endpoints.list);
        let _ = writeln!(&mut buf, "create_path = {}", self.endpoints.create);
        let _ = writeln!(&mut buf, "update_path = {}", self.endpoints.update);
        let _ = writeln!(&mut buf, "remove_path = {}", self.endpoints.remove);
        let _ = writeln!(&mut buf, "page_size = {}", self.page_size);
        buf.push_str("# Seconds; 'none' waits indefinitely\n");
        match self.request_timeout_secs {
            Some(s) => {
                let _ = writeln!(&mut buf, "request_timeout_secs = {}", s);
            }
            None => buf.push_str("request_timeout_secs = none\n"),
        }
        buf
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_ctx(|| format!("create config dir {}", parent.display()))?;
        }
        std::fs::write(path, self.to_file_string())
            .with_ctx(|| format!("write {}", path.display()))
    }
}

/// Directory holding `booktable.conf`, `theme.conf` and `keybinds.conf`.
///
/// `$XDG_CONFIG_HOME/booktable`, else `$HOME/.config/booktable`, else the working directory.
pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_defaults_and_skips_junk() {
        let cfg = ClientConfig::parse(
            "# comment\n\
             base_url = http://books.local:9000/\n\
             list_path = /api/v2/books\n\
             page_size = 0\n\
             nonsense\n\
             unknown = 1\n\
             request_timeout_secs = 15\n",
        );
        assert_eq!(cfg.base_url, "http://books.local:9000");
        assert_eq!(cfg.endpoints.list, "/api/v2/books");
        assert_eq!(cfg.endpoints.remove, "/api/rule");
        assert_eq!(cfg.page_size, 1);
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn file_string_parses_back() {
        let cfg = ClientConfig {
            base_url: "http://x:1".into(),
            page_size: 25,
            ..ClientConfig::default()
        };
        assert_eq!(ClientConfig::parse(&cfg.to_file_string()), cfg);
    }

    #[derive(Clone)]
    struct SharedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unwritable_default_config_is_logged() {
        let blocker = std::env::temp_dir().join(format!("booktable_blocker_{}", std::process::id()));
        std::fs::write(&blocker, "not a dir").unwrap();
        let path = blocker.join("booktable.conf");

        let log = SharedLog(Default::default());
        let sink = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        let cfg = tracing::subscriber::with_default(subscriber, || ClientConfig::load_or_init(&path));

        assert_eq!(cfg, ClientConfig::default());
        let out = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("could not write default client config"), "{out}");
        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn zero_timeout_means_none() {
        let cfg = ClientConfig {
            request_timeout_secs: Some(0),
            ..ClientConfig::default()
        };
        assert_eq!(cfg.request_timeout(), None);
    }
}
