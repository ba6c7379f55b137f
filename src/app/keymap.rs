//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! The file holds `<Action> = <KeySpec>` lines layered over the defaults, so
//! a file only needs the bindings it changes. Key specs are a single
//! character, a named key (`Enter`, `PageDown`, `Space`, ...), or either of
//! those behind `Ctrl+`.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions available while the grid has focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    OpenHelp,
    /// Filter the list by name.
    StartSearch,
    NewBook,
    /// Edit the row under the cursor.
    EditBook,
    ToggleSelect,
    /// Select every row on the page, or clear them if all are selected.
    SelectPage,
    ClearSelection,
    /// Needs a non-empty selection.
    OpenBulkMenu,
    ViewDetails,
    SortScore,
    SortPrice,
    Reload,
    ToggleKeybindsPane,
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    /// Swallow the key.
    Ignore,
}

/// Action, its name in `keybinds.conf`, and its help text. Help order follows this table.
const ACTIONS: [(KeyAction, &str, &str); 19] = [
    (KeyAction::Quit, "Quit", "Quit"),
    (KeyAction::OpenHelp, "OpenHelp", "Help"),
    (KeyAction::StartSearch, "StartSearch", "Search by name"),
    (KeyAction::NewBook, "NewBook", "New book"),
    (KeyAction::EditBook, "EditBook", "Edit book"),
    (KeyAction::ToggleSelect, "ToggleSelect", "Select row"),
    (KeyAction::SelectPage, "SelectPage", "Select page"),
    (KeyAction::ClearSelection, "ClearSelection", "Clear selection"),
    (KeyAction::OpenBulkMenu, "OpenBulkMenu", "Bulk operations"),
    (KeyAction::ViewDetails, "ViewDetails", "View details"),
    (KeyAction::SortScore, "SortScore", "Sort by score"),
    (KeyAction::SortPrice, "SortPrice", "Sort by price"),
    (KeyAction::Reload, "Reload", "Reload"),
    (KeyAction::ToggleKeybindsPane, "ToggleKeybindsPane", "Toggle this panel"),
    (KeyAction::MoveUp, "MoveUp", "Move up"),
    (KeyAction::MoveDown, "MoveDown", "Move down"),
    (KeyAction::PrevPage, "PrevPage", "Previous page"),
    (KeyAction::NextPage, "NextPage", "Next page"),
    (KeyAction::Ignore, "Ignore", ""),
];

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Enter", KeyCode::Enter),
    ("Delete", KeyCode::Delete),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("BackTab", KeyCode::BackTab),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Space", KeyCode::Char(' ')),
];

const DEFAULT_BINDINGS: &[(&str, KeyAction)] = &[
    ("q", KeyAction::Quit),
    ("Ctrl+c", KeyAction::Quit),
    ("Esc", KeyAction::Ignore),
    ("?", KeyAction::OpenHelp),
    ("/", KeyAction::StartSearch),
    ("n", KeyAction::NewBook),
    ("e", KeyAction::EditBook),
    ("Space", KeyAction::ToggleSelect),
    ("a", KeyAction::SelectPage),
    ("x", KeyAction::ClearSelection),
    ("b", KeyAction::OpenBulkMenu),
    ("Delete", KeyAction::OpenBulkMenu),
    ("Enter", KeyAction::ViewDetails),
    ("s", KeyAction::SortScore),
    ("p", KeyAction::SortPrice),
    ("r", KeyAction::Reload),
    ("K", KeyAction::ToggleKeybindsPane),
    ("Up", KeyAction::MoveUp),
    ("k", KeyAction::MoveUp),
    ("Down", KeyAction::MoveDown),
    ("j", KeyAction::MoveDown),
    ("Left", KeyAction::PrevPage),
    ("h", KeyAction::PrevPage),
    ("PageUp", KeyAction::PrevPage),
    ("Right", KeyAction::NextPage),
    ("l", KeyAction::NextPage),
    ("PageDown", KeyAction::NextPage),
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

impl Keymap {
    /// Arrow and vim-style navigation plus single-letter actions.
    pub fn new_defaults() -> Self {
        let bindings = DEFAULT_BINDINGS
            .iter()
            .filter_map(|(spec, action)| parse_key(spec).map(|key| (key, *action)))
            .collect();
        Self { bindings }
    }

    /// Load a keymap from `path`, or write the defaults there if missing.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(error = %e, path, "could not write default keybindings");
        }
        km
    }

    /// Returns `None` if the file cannot be read.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Layer `<Action> = <KeySpec>` lines over the defaults.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::new_defaults();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::debug!(line, "ignoring keybinding line"),
            }
        }
        map
    }

    /// Write every binding, grouped by action.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::from(
            "# booktable keybindings\n# Format: <Action> = <KeySpec>\n# KeySpec: a character, Ctrl+<key>, or one of \
             Enter Delete Esc Tab BackTab Up Down Left Right PageUp PageDown Space\n\n",
        );
        for (action, name, _) in ACTIONS {
            for key in self.keys_for(action) {
                let _ = writeln!(buf, "{name} = {key}");
            }
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        let exact = self.bindings.get(&(key.modifiers, key.code));
        // Uppercase letters arrive with or without SHIFT depending on the terminal.
        let unshifted = || {
            (key.modifiers == KeyModifiers::SHIFT)
                .then(|| self.bindings.get(&(KeyModifiers::NONE, key.code)))
                .flatten()
        };
        exact.or_else(unshifted).copied()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Inverse of the key spec parser, e.g. `Ctrl+c`, `Space`, `PageDown`.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        let base = match NAMED_KEYS.iter().find(|(_, c)| *c == code) {
            Some((name, _)) => name.to_string(),
            None => match code {
                KeyCode::Char(c) => c.to_string(),
                other => format!("{other:?}"),
            },
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    let spec = spec.trim();
    let (mods, rest) = match spec.strip_prefix("Ctrl+") {
        Some(rest) => (KeyModifiers::CONTROL, rest),
        None => (KeyModifiers::NONE, spec),
    };
    let rest = if rest == "Escape" { "Esc" } else { rest };
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(name, _)| *name == rest) {
        return Some((mods, *code));
    }
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some((mods, KeyCode::Char(c))),
        _ => None,
    }
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTIONS
        .iter()
        .find(|(_, name, _)| *name == s)
        .map(|(action, _, _)| *action)
}

/// Human-readable description used by the help and keybinding panels.
pub fn describe_action(action: KeyAction) -> &'static str {
    ACTIONS
        .iter()
        .find(|(a, _, _)| *a == action)
        .map_or("", |(_, _, help)| *help)
}

/// Actions listed in the help and keybinding panels, in display order.
pub fn listed_actions() -> impl Iterator<Item = KeyAction> {
    ACTIONS
        .into_iter()
        .map(|(action, _, _)| action)
        .filter(|a| *a != KeyAction::Ignore)
}
