//! The book grid: composite info block, ISBN, score, price, creation date and action column.
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::app::AppState;
use crate::grid::{SortColumn, SortState};
use crate::model::{BookRecord, FieldValue, format_number};

/// Lines per row: cover image plus six labeled fields.
pub const ROW_HEIGHT: u16 = 7;

fn sort_title(base: &str, column: SortColumn, sort: Option<SortState>) -> String {
    match sort {
        Some(s) if s.column == column => format!("{base} {}", s.arrow()),
        _ => base.to_string(),
    }
}

/// Multi-line "book details" cell.
pub fn book_info_text(rec: &BookRecord) -> Text<'static> {
    let img = rec
        .book
        .as_ref()
        .and_then(|b| b.img.clone())
        .unwrap_or_else(|| "-".to_string());
    let mut lines = vec![Line::from(vec![
        Span::styled("img: ", Style::default().add_modifier(Modifier::DIM)),
        Span::raw(img),
    ])];
    for (fallback, field) in rec.info_fields() {
        let (label, value) = match field {
            Some(f) if !f.label.is_empty() => (f.label.clone(), f.value.to_string()),
            Some(f) => (fallback.to_string(), f.value.to_string()),
            None => (fallback.to_string(), String::new()),
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
        ]));
    }
    Text::from(lines)
}

fn score_cell(rec: &BookRecord) -> String {
    match rec.book.as_ref().and_then(|b| b.score.as_ref()) {
        Some(FieldValue::Number(n)) => format_number(*n),
        Some(FieldValue::Text(s)) => s.clone(),
        None => "-".to_string(),
    }
}

fn created_cell(rec: &BookRecord) -> String {
    if !rec.created_at.is_empty() {
        rec.created_at.clone()
    } else {
        rec.updated_at.clone().unwrap_or_default()
    }
}

/// Render the current page and keep `rows_per_view` in sync with the area.
pub fn render_book_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3);
    app.rows_per_view = (body_height / ROW_HEIGHT).max(1) as usize;

    let page = &app.page;
    let rpv = app.rows_per_view;
    let start = (page.cursor / rpv) * rpv;
    let end = (start + rpv).min(page.rows.len());
    let slice = &page.rows[start.min(end)..end];

    let rows = slice.iter().enumerate().map(|(i, rec)| {
        let absolute_index = start + i;
        let selected = page.is_selected(rec.key);
        let mut style = Style::default().fg(app.theme.text);
        if selected {
            style = style.fg(app.theme.selected_fg);
        }
        if absolute_index == page.cursor {
            style = style
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD);
        }
        let price = rec
            .price
            .as_ref()
            .map(|p| p.value.to_string())
            .unwrap_or_else(|| "-".to_string());
        Row::new(vec![
            Cell::from(if selected { "[x]" } else { "[ ]" }),
            Cell::from(book_info_text(rec)),
            Cell::from(rec.isbn.clone()),
            Cell::from(score_cell(rec)),
            Cell::from(price),
            Cell::from(created_cell(rec)),
            Cell::from("View details"),
        ])
        .height(ROW_HEIGHT)
        .style(style)
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Min(36),
        Constraint::Length(18),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(20),
        Constraint::Length(12),
    ];
    let header = Row::new(vec![
        String::new(),
        "Book details".to_string(),
        "ISBN".to_string(),
        sort_title("Score", SortColumn::Score, page.sort),
        sort_title("Price (yuan)", SortColumn::Price, page.sort),
        "Created".to_string(),
        "Action".to_string(),
    ])
    .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = format!(
        "Query table - page {}/{} ({} total){}",
        page.pager.current,
        page.pager.page_count(),
        page.pager.total,
        if page.loading { "  loading…" } else { "" }
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
