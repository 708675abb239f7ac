use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::models::User;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database, user: &User) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::load(db, user)?;
    app.refresh_all(db)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Tab, status, and command bars plus table borders/header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Search => handle_search_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Transactions)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Income)?,
        KeyCode::Char('4') => switch_screen(app, db, Screen::Categories)?,
        KeyCode::Char('5') => switch_screen(app, db, Screen::NetWorth)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 {
                screens.len() - 1
            } else {
                idx - 1
            };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Enter => handle_enter(app, db)?,
        KeyCode::Esc => handle_escape(app, db)?,
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('v') if app.screen == Screen::Categories => {
            app.category_view_known = !app.category_view_known;
        }
        KeyCode::Char('H') => {
            commands::handle_command("prev-month", app, db)?;
        }
        KeyCode::Char('L') => {
            commands::handle_command("next-month", app, db)?;
        }
        KeyCode::Char('D') => match app.screen {
            Screen::Transactions => commands::handle_command("delete-txn", app, db)?,
            Screen::Income => commands::handle_command("delete-income", app, db)?,
            Screen::Categories if !app.category_view_known => {
                commands::handle_command("delete-category", app, db)?;
            }
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.screen = Screen::Transactions;
            app.refresh_transactions(db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.refresh_transactions(db)?;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            // Live filter: narrow as you type
            app.screen = Screen::Transactions;
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.refresh_transactions(db)?;
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            // Live filter: narrow as you type
            app.screen = Screen::Transactions;
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.refresh_transactions(db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::DeleteTransaction { id, description } => {
                        if db.delete_transaction(app.user_id, id)? {
                            app.refresh_all(db)?;
                            app.set_status(format!("Deleted: {description}"));
                        } else {
                            app.set_status("Expense not found");
                        }
                    }
                    PendingAction::DeleteIncome { id, description } => {
                        if db.delete_income(app.user_id, id)? {
                            app.refresh_all(db)?;
                            app.set_status(format!("Deleted income: {description}"));
                        } else {
                            app.set_status("Income not found");
                        }
                    }
                    PendingAction::DeleteCategory { id, name } => {
                        // One transaction: the category and its expenses go
                        // together, or not at all.
                        if db.delete_category(app.user_id, id)? {
                            app.refresh_all(db)?;
                            app.set_status(format!("Deleted category: {name}"));
                        } else {
                            app.set_status("Category not found");
                        }
                    }
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard => app.refresh_dashboard(db)?,
        Screen::Transactions => app.refresh_transactions(db)?,
        Screen::Income => app.refresh_incomes(db)?,
        Screen::Categories => app.refresh_categories(db)?,
        Screen::NetWorth => app.refresh_net_worth(db)?,
    }
    Ok(())
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Transactions => scroll_down(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            page,
        ),
        Screen::Income => scroll_down(
            &mut app.income_index,
            &mut app.income_scroll,
            app.incomes.len(),
            page,
        ),
        Screen::Categories => {
            if app.category_view_known {
                if app.known_index + 1 < app.known_categories.len() {
                    app.known_index += 1;
                }
            } else if app.category_index + 1 < app.categories.len() {
                app.category_index += 1;
            }
        }
        Screen::NetWorth => scroll_down(
            &mut app.net_worth_index,
            &mut app.net_worth_scroll,
            app.net_worth.len(),
            page,
        ),
        _ => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Transactions => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::Income => scroll_up(&mut app.income_index, &mut app.income_scroll),
        Screen::Categories => {
            if app.category_view_known {
                app.known_index = app.known_index.saturating_sub(1);
            } else {
                app.category_index = app.category_index.saturating_sub(1);
            }
        }
        Screen::NetWorth => scroll_up(&mut app.net_worth_index, &mut app.net_worth_scroll),
        _ => {}
    }
}

fn handle_enter(app: &mut App, db: &mut Database) -> Result<()> {
    // Re-add a known category (with its last budget) to the selected month
    if app.screen == Screen::Categories && app.category_view_known {
        if let Some(known) = app.known_categories.get(app.known_index).cloned() {
            let cat = crate::models::Category::new(
                app.user_id,
                known.name.clone(),
                known.budget,
                app.selected_month.clone(),
            );
            db.insert_category(&cat)?;
            app.refresh_all(db)?;
            app.set_status(format!(
                "Added {} to {} with budget {}",
                known.name, app.selected_month, known.budget
            ));
        }
    }
    Ok(())
}

fn handle_escape(app: &mut App, db: &mut Database) -> Result<()> {
    app.status_message.clear();
    if !app.search_input.is_empty() {
        app.search_input.clear();
        app.refresh_transactions(db)?;
    }
    Ok(())
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll)
        }
        Screen::Income => scroll_to_top(&mut app.income_index, &mut app.income_scroll),
        Screen::Categories => {
            if app.category_view_known {
                app.known_index = 0;
            } else {
                app.category_index = 0;
            }
        }
        Screen::NetWorth => scroll_to_top(&mut app.net_worth_index, &mut app.net_worth_scroll),
        _ => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Transactions => scroll_to_bottom(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            page,
        ),
        Screen::Income => scroll_to_bottom(
            &mut app.income_index,
            &mut app.income_scroll,
            app.incomes.len(),
            page,
        ),
        Screen::Categories => {
            if app.category_view_known {
                if !app.known_categories.is_empty() {
                    app.known_index = app.known_categories.len() - 1;
                }
            } else if !app.categories.is_empty() {
                app.category_index = app.categories.len() - 1;
            }
        }
        Screen::NetWorth => scroll_to_bottom(
            &mut app.net_worth_index,
            &mut app.net_worth_scroll,
            app.net_worth.len(),
            page,
        ),
        _ => {}
    }
}
