//! Color palette and its `theme.conf` file.
//!
//! Values are anything `ratatui::style::Color` parses: names (`red`,
//! `light-blue`), `#RRGGBB`, an ANSI index, or `reset`. Bare `RRGGBB` is
//! accepted as well.
//!
use std::str::FromStr;

use ratatui::style::Color;

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
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
    pub selected_fg: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha palette.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            selected_fg: Color::Rgb(0x94, 0xe2, 0xd5),
            success: Color::Rgb(0xa6, 0xe3, 0xa1),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
            warning: Color::Rgb(0xfa, 0xb3, 0x87),
        }
    }

    /// Every palette slot with its file key, in file order.
    fn slots(&mut self) -> [(&'static str, &mut Color); 14] {
        [
            ("text", &mut self.text),
            ("muted", &mut self.muted),
            ("title", &mut self.title),
            ("border", &mut self.border),
            ("header_bg", &mut self.header_bg),
            ("header_fg", &mut self.header_fg),
            ("status_bg", &mut self.status_bg),
            ("status_fg", &mut self.status_fg),
            ("highlight_fg", &mut self.highlight_fg),
            ("highlight_bg", &mut self.highlight_bg),
            ("selected_fg", &mut self.selected_fg),
            ("success", &mut self.success),
            ("error", &mut self.error),
            ("warning", &mut self.warning),
        ]
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Overlay `key = color` lines on the default palette. Bad lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for line in contents.lines().map(str::trim) {
            if line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            let Some(color) = parse_color(val) else {
                tracing::debug!(key, val, "ignoring unparsable theme color");
                continue;
            };
            if let Some((_, slot)) = theme.slots().into_iter().find(|(k, _)| *k == key) {
                *slot = color;
            }
        }
        theme
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::from(
            "# booktable theme\n# Colors: names, #RRGGBB, ANSI index or 'reset'\n\n",
        );
        let mut copy = *self;
        for (key, color) in copy.slots() {
            let _ = writeln!(buf, "{key} = {color}");
        }
        std::fs::write(path, buf)
    }

    /// Load from `path` if present; otherwise write the default palette there.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let theme = Self::mocha();
        if let Err(e) = theme.write_file(path) {
            tracing::warn!(error = %e, path, "could not write default theme");
        }
        theme
    }
}

fn parse_color(s: &str) -> Option<Color> {
    if s.len() == 6 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Color::from_str(&format!("#{s}")).ok();
    }
    Color::from_str(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_hex_names_and_reset() {
        let t = Theme::parse("error = #112233\nsuccess = reset\nborder = nothex\ntitle = 445566\nmuted = light-red\n");
        assert_eq!(t.error, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(t.success, Color::Reset);
        assert_eq!(t.border, Theme::mocha().border);
        assert_eq!(t.title, Color::Rgb(0x44, 0x55, 0x66));
        assert_eq!(t.muted, Color::LightRed);
    }

    #[test]
    fn written_file_parses_back() {
        let mut theme = Theme::mocha();
        theme.warning = Color::Yellow;
        theme.highlight_bg = Color::Indexed(236);
        let path = std::env::temp_dir().join(format!("booktable_theme_{}.conf", std::process::id()));
        let path = path.to_string_lossy().to_string();
        theme.write_file(&path).unwrap();
        assert_eq!(Theme::from_file(&path), Some(theme));
        let _ = std::fs::remove_file(&path);
    }
}
