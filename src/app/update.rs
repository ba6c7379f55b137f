//! Event loop and key routing.
//!
//! Keys go to the active overlay first (forms, bulk menu, search, help);
//! with no overlay they are resolved through the [`Keymap`](crate::app::keymap::Keymap).
//!
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;

use crate::app::AppState;
use crate::app::dispatch::Dispatcher;
use crate::app::keymap::KeyAction;
use crate::app::page::{BulkAction, Completion, PageMode, Request};
use crate::ui;

/// Drive the UI until the user quits.
///
/// Issues the initial page load, then alternates between drawing, draining
/// request completions and polling the terminal for keys.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    dispatcher: &Dispatcher,
    completions: &mut UnboundedReceiver<Completion>,
) -> Result<()> {
    dispatcher.dispatch(app.page.reload());

    while !app.should_quit {
        app.page.tick(Instant::now());
        terminal.draw(|f| ui::render(f, app))?;

        loop {
            match completions.try_recv() {
                Ok(done) => {
                    if let Some(next) = app.page.complete(done) {
                        dispatcher.dispatch(next);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("completion channel closed");
                    app.should_quit = true;
                    break;
                }
            }
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(request) = handle_key(app, key)
        {
            dispatcher.dispatch(request);
        }
    }

    Ok(())
}

/// Apply one key press. Returns a request when the key triggers backend work.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Option<Request> {
    if app.page.mode == PageMode::Idle {
        let action = app.keymap.resolve(&key)?;
        return handle_action(app, action);
    }
    let page = &mut app.page;
    match &mut page.mode {
        PageMode::Create(form) => {
            let outcome = form.handle_key(key.code)?;
            page.on_create_form(outcome)
        }
        PageMode::Update(form) => {
            let outcome = form.handle_key(key.code)?;
            page.on_update_form(outcome)
        }
        PageMode::BulkMenu { selected } => match key.code {
            KeyCode::Esc => {
                page.close_overlay();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                *selected = selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if *selected + 1 < BulkAction::ALL.len() {
                    *selected += 1;
                }
                None
            }
            KeyCode::Enter => {
                let action = BulkAction::ALL[*selected];
                page.run_bulk(action)
            }
            _ => None,
        },
        PageMode::Search { query } => match key.code {
            KeyCode::Enter => {
                let q = query.clone();
                Some(page.apply_search(&q))
            }
            KeyCode::Esc => {
                page.close_overlay();
                None
            }
            KeyCode::Backspace => {
                query.pop();
                None
            }
            KeyCode::Char(c) => {
                query.push(c);
                None
            }
            _ => None,
        },
        PageMode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')) {
                page.close_overlay();
            }
            None
        }
        PageMode::Idle => None,
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Option<Request> {
    let page = &mut app.page;
    match action {
        KeyAction::Quit => {
            app.should_quit = true;
            None
        }
        KeyAction::OpenHelp => {
            page.open_help();
            None
        }
        KeyAction::StartSearch => {
            page.start_search();
            None
        }
        KeyAction::NewBook => {
            page.open_create();
            None
        }
        KeyAction::EditBook => {
            page.open_update_current();
            None
        }
        KeyAction::ToggleSelect => {
            page.toggle_select_current();
            None
        }
        KeyAction::SelectPage => {
            page.toggle_select_page();
            None
        }
        KeyAction::ClearSelection => {
            page.clear_selection();
            None
        }
        KeyAction::OpenBulkMenu => {
            page.open_bulk_menu();
            None
        }
        KeyAction::ViewDetails => {
            page.view_details();
            None
        }
        KeyAction::SortScore => {
            page.toggle_sort(crate::grid::SortColumn::Score);
            None
        }
        KeyAction::SortPrice => {
            page.toggle_sort(crate::grid::SortColumn::Price);
            None
        }
        KeyAction::Reload => Some(page.reload()),
        KeyAction::ToggleKeybindsPane => {
            app.show_keybinds = !app.show_keybinds;
            None
        }
        KeyAction::MoveUp => {
            page.move_up();
            None
        }
        KeyAction::MoveDown => {
            page.move_down();
            None
        }
        KeyAction::PrevPage => page.prev_page(),
        KeyAction::NextPage => page.next_page(),
        KeyAction::Ignore => None,
    }
}
