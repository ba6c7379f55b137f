pub mod components;
pub mod forms;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::app::page::PageMode;

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let body = if app.show_keybinds {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(root[2])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(root[2])
    };

    let prompt = match &app.page.mode {
        PageMode::Search { query } => format!("  Search name: {query}_"),
        _ => match &app.page.name_filter {
            Some(q) => format!("  filter: \"{q}\""),
            None => String::new(),
        },
    };
    let p = Paragraph::new(format!(
        "Books @ {}{prompt}  | n: new; e: edit; Space: select; b: bulk; /: search; ?: help; q: quit",
        app.backend
    ))
    .block(
        Block::default()
            .title(Line::styled("booktable", Style::default().add_modifier(Modifier::BOLD)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    components::render_table_alert(f, root[1], app);
    table::render_book_table(f, body[0], app);
    if app.show_keybinds {
        components::render_keybinds_panel(f, body[1], app);
    }
    components::render_status_bar(f, root[3], app);

    render_overlay(f, app);
    let area = f.area();
    components::render_toasts(f, area, app);
}

fn render_overlay(f: &mut Frame, app: &AppState) {
    let area = f.area();
    match &app.page.mode {
        PageMode::Idle | PageMode::Search { .. } => {}
        PageMode::BulkMenu { selected } => forms::render_bulk_menu(f, area, app, *selected),
        PageMode::Create(form) => forms::render_create_modal(f, area, app, form),
        PageMode::Update(form) => forms::render_update_modal(f, area, app, form),
        PageMode::Help => components::render_help_modal(f, area, app),
    }
}
