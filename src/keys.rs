use crate::app::{App, MenuItem};
use crate::state::messages::UiEvent;
use crate::state::spinner::SpinKind;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    ui_events: &mpsc::Sender<UiEvent>,
) {
    let mut guard = app.lock().await;

    if guard.state.team_count.editing {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Enter, _) => guard.commit_team_count_edit(),
            (KeyCode::Esc, _) => guard.cancel_team_count_edit(),
            (KeyCode::Backspace, _) => guard.state.team_count.pop(),
            (Char(ch), _) => guard.state.team_count.push(ch),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Selector),
        (_, Char('2'), _) => guard.update_tab(MenuItem::History),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Draws
        (_, Char('g'), _) => {
            guard.begin_spin(SpinKind::Game, ui_events);
        }
        (_, Char('t'), _) => {
            guard.begin_spin(SpinKind::Team, ui_events);
        }

        // Total teams
        (_, Char('n'), _) => guard.start_team_count_edit(),
        (_, Char('+') | Char('='), _) => guard.adjust_total_teams(1),
        (_, Char('-'), _) => guard.adjust_total_teams(-1),

        // History navigation
        (MenuItem::History, Char('j') | KeyCode::Down, _) => guard.history_scroll_down(),
        (MenuItem::History, Char('k') | KeyCode::Up, _) => guard.history_scroll_up(),
        (MenuItem::History, KeyCode::Esc, _) => guard.update_tab(MenuItem::Selector),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
