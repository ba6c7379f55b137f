//! Modal rendering for the create/update forms and the bulk-operations menu.
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::forms::{CreateForm, TextField, UpdateForm};
use crate::app::page::BulkAction;
use crate::ui::components::centered_rect;

fn field_lines(field: &TextField, focused: bool, app: &AppState) -> Vec<Line<'static>> {
    let marker = if focused { "▶ " } else { "  " };
    let required = if field.required { "*" } else { "" };
    let cursor = if focused { "_" } else { "" };
    vec![
        Line::from(Span::styled(
            format!("{marker}{required}{}", field.label),
            Style::default().fg(app.theme.title),
        )),
        Line::from(format!("    {}{cursor}", field.value)),
    ]
}

fn error_line(error: &Option<String>, app: &AppState) -> Option<Line<'static>> {
    error
        .as_ref()
        .map(|e| Line::from(Span::styled(e.clone(), Style::default().fg(app.theme.error))))
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, title: &str, lines: Vec<Line<'static>>) {
    let width = 60u16.min(area.width.saturating_sub(4)).max(30);
    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_create_modal(f: &mut Frame, area: Rect, app: &AppState, form: &CreateForm) {
    let mut lines = field_lines(&form.desc, true, app);
    lines.push(Line::raw(""));
    if let Some(err) = error_line(&form.error, app) {
        lines.push(err);
    }
    lines.push(Line::styled(
        "Enter: submit  Esc: cancel",
        Style::default().add_modifier(Modifier::DIM),
    ));
    render_modal(f, area, app, "New book", lines);
}

pub fn render_update_modal(f: &mut Frame, area: Rect, app: &AppState, form: &UpdateForm) {
    let key = form.key.map(|k| k.to_string()).unwrap_or_else(|| "-".to_string());
    let mut lines = vec![Line::from(format!("  key: {key}")), Line::raw("")];
    lines.extend(field_lines(&form.name, form.focus == 0, app));
    lines.extend(field_lines(&form.desc, form.focus == 1, app));
    lines.push(Line::raw(""));
    if let Some(err) = error_line(&form.error, app) {
        lines.push(err);
    }
    lines.push(Line::styled(
        "Tab: next field  Enter: submit  Esc: cancel",
        Style::default().add_modifier(Modifier::DIM),
    ));
    render_modal(f, area, app, "Edit book", lines);
}

pub fn render_bulk_menu(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let (count, _) = app.page.selection_summary();
    let mut text = format!("{count} selected\n\n");
    for (idx, action) in BulkAction::ALL.iter().enumerate() {
        if idx == selected {
            text.push_str(&format!("▶ {}\n", action.label()));
        } else {
            text.push_str(&format!("  {}\n", action.label()));
        }
    }
    let rect = centered_rect(34, 7, area);
    let p = Paragraph::new(text).block(
        Block::default()
            .title("Bulk operations")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
