//! Shared UI components (status bar, selection alert, toasts, help and keybinds panels).
//!
//! Small building blocks reused around the book grid.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::keymap::{describe_action, listed_actions};
use crate::app::page::PageMode;
use crate::app::toast::ToastKind;
use crate::grid::SortColumn;
use crate::model::format_number;

/// Render the bottom status bar with mode, paging and sort.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let page = &app.page;
    let mode = match page.mode {
        PageMode::Idle => "NORMAL",
        PageMode::BulkMenu { .. } => "BULK",
        PageMode::Create(_) => "NEW",
        PageMode::Update(_) => "EDIT",
        PageMode::Search { .. } => "SEARCH",
        PageMode::Help => "HELP",
    };
    let sort = match page.sort {
        Some(s) => {
            let col = match s.column {
                SortColumn::Score => "score",
                SortColumn::Price => "price",
            };
            format!("  sort:{col}{}", s.arrow())
        }
        None => String::new(),
    };
    let msg = format!(
        "mode: {mode}  rows:{}  page:{}/{}  size:{}  selected:{}{sort}",
        page.rows.len(),
        page.pager.current,
        page.pager.page_count(),
        page.pager.page_size,
        page.selection.len(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Text of the selection alert, e.g. `Selected 2 items  Total 35.5 yuan`.
pub fn selection_alert(app: &AppState) -> Option<String> {
    let (count, total) = app.page.selection_summary();
    if count == 0 {
        return None;
    }
    Some(format!(
        "Selected {count} items  Total {} yuan",
        format_number(total)
    ))
}

/// Render the line above the grid: selection summary, or a hint when nothing is selected.
pub fn render_table_alert(f: &mut Frame, area: Rect, app: &AppState) {
    let line = match selection_alert(app) {
        Some(text) => Line::from(Span::styled(
            text,
            Style::default()
                .fg(app.theme.selected_fg)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "Space selects rows; b opens bulk operations",
            Style::default().fg(app.theme.muted),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Stack toasts at the top-right corner, newest last.
pub fn render_toasts(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 48u16.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);
    for (i, toast) in app.page.toasts.iter().enumerate() {
        let y = area.y + 1 + i as u16;
        if y >= area.y + area.height {
            break;
        }
        let (glyph, color) = match toast.kind {
            ToastKind::Loading => ("⟳", app.theme.title),
            ToastKind::Success => ("✔", app.theme.success),
            ToastKind::Error => ("✖", app.theme.error),
            ToastKind::Warning => ("!", app.theme.warning),
        };
        let rect = Rect { x, y, width, height: 1 };
        let p = Paragraph::new(format!(" {glyph} {}", toast.message)).style(
            Style::default()
                .fg(color)
                .bg(app.theme.header_bg)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the right-side keybinds viewer.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let lines: Vec<Line> = listed_actions()
        .map(|action| {
            let keys = app.keymap.keys_for(action).join(", ");
            Line::from(vec![
                Span::styled(
                    format!("{:<18}", describe_action(action)),
                    Style::default().fg(app.theme.text),
                ),
                Span::styled(keys, Style::default().fg(app.theme.highlight_fg)),
            ])
        })
        .collect();
    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

/// Compute a centered rectangle of at most `width` x `height` inside `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal with usage notes and the active key bindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 28u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Book table",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw("Rows are loaded one page at a time; sorting applies to the loaded page."),
        Line::raw("Bulk delete runs immediately for every selected row, with no confirmation."),
        Line::raw(""),
    ];
    for action in listed_actions() {
        lines.push(Line::from(vec![
            Span::raw(format!("{}: ", describe_action(action))),
            Span::styled(
                app.keymap.keys_for(action).join(" / "),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Close help: "),
        Span::styled("Esc / Enter", Style::default().add_modifier(Modifier::ITALIC)),
    ]));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
