use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::messages::UiEvent;
use crate::state::spinner::{SpinKind, SpinTimer};
use frc_selector::engine::MAX_TEAMS;
use frc_selector::{
    Catalog, FileStore, LogSink, PersistentStore, SelectionEngine, parse_total_teams,
};
use log::{error, info, warn};
use rand::Rng;
use std::path::Path;
use tokio::sync::mpsc;

pub type Engine = SelectionEngine<FileStore, LogSink>;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Selector,
    History,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub engine: Engine,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        let catalog = load_catalog(settings.catalog_path.as_deref());
        let backend = FileStore::open(&settings.state_path).unwrap_or_else(|e| {
            error!("{e}; starting from a fresh state file");
            FileStore::empty(&settings.state_path)
        });
        info!("state file: {}", backend.path().display());
        let engine = SelectionEngine::load(catalog, PersistentStore::new(backend, LogSink));

        Self::with_engine(settings, engine)
    }

    pub fn with_engine(settings: AppSettings, mut engine: Engine) -> Self {
        engine.refill_empty_pools();
        let state = AppState::new(engine.selected_game().cloned(), engine.selected_team());
        Self { settings, state, engine }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if self.state.active_tab == MenuItem::History {
            self.state.history.scroll_offset = 0;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Spins
    // -----------------------------------------------------------------------

    /// Whether the trigger for `kind` is enabled.
    pub fn can_spin(&self, kind: SpinKind) -> bool {
        if self.state.is_spinning(kind) {
            return false;
        }
        match kind {
            SpinKind::Game => self.engine.can_select_game(),
            SpinKind::Team => self.engine.can_select_team(),
        }
    }

    /// Start the cosmetic delay for a draw. Returns false if the trigger is
    /// disabled.
    pub fn begin_spin(&mut self, kind: SpinKind, events: &mpsc::Sender<UiEvent>) -> bool {
        if !self.can_spin(kind) {
            return false;
        }
        let timer = SpinTimer::start(kind, events.clone());
        self.state.spin(kind).start(timer);
        true
    }

    pub fn on_spin_tick<R: Rng + ?Sized>(&mut self, kind: SpinKind, rng: &mut R) {
        if !self.state.is_spinning(kind) {
            return;
        }
        match kind {
            SpinKind::Game => {
                if let Some(game) = self.engine.preview_game(rng) {
                    self.state.game_reel.display = Some(game.clone());
                }
            }
            SpinKind::Team => {
                if let Some(team) = self.engine.preview_team(rng) {
                    self.state.team_reel.display = Some(team);
                }
            }
        }
    }

    /// Commit the draw behind a finished spin. The reel is synchronised to
    /// the committed value, whatever it flashed during the spin.
    pub fn finish_spin<R: Rng + ?Sized>(&mut self, kind: SpinKind, rng: &mut R) {
        if !self.state.is_spinning(kind) {
            return;
        }
        self.state.spin(kind).stop();

        match kind {
            SpinKind::Game => match self.engine.select_game(rng) {
                Some(game) => {
                    self.state.set_status(format!("Drew {game}"));
                    self.state.game_reel.display = Some(game);
                }
                None => {
                    warn!("game spin finished with nothing to draw");
                    self.state.game_reel.display = self.engine.selected_game().cloned();
                    self.state.set_status("No games to draw");
                }
            },
            SpinKind::Team => match self.engine.select_team(rng) {
                Some(selection) => {
                    self.state.set_status(format!(
                        "Team {} gets {}",
                        selection.team, selection.game
                    ));
                    self.state.team_reel.display = Some(selection.team);
                }
                None => {
                    self.state.team_reel.display = self.engine.selected_team();
                    self.state.set_status("Select a game first");
                }
            },
        }
    }

    /// Pools that ran dry during the last event are refilled here.
    pub fn refill_pools(&mut self) {
        self.engine.refill_empty_pools();
    }

    // -----------------------------------------------------------------------
    // Total teams
    // -----------------------------------------------------------------------

    pub fn start_team_count_edit(&mut self) {
        let current = self.engine.total_teams();
        self.state.team_count.begin(current);
    }

    pub fn commit_team_count_edit(&mut self) {
        let input = self.state.team_count.finish();
        let total = self.engine.set_total_teams(i64::from(parse_total_teams(&input)));
        self.state.set_status(team_count_status(total));
    }

    pub fn cancel_team_count_edit(&mut self) {
        self.state.team_count.cancel();
    }

    pub fn adjust_total_teams(&mut self, delta: i64) {
        let requested = i64::from(self.engine.total_teams()) + delta;
        let total = self.engine.set_total_teams(requested);
        self.state.set_status(team_count_status(total));
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    pub fn history_scroll_down(&mut self) {
        let max = last_history_row(self.engine.selections().len());
        self.state.history.scroll_offset =
            self.state.history.scroll_offset.saturating_add(1).min(max);
    }

    pub fn history_scroll_up(&mut self) {
        self.state.history.scroll_offset = self.state.history.scroll_offset.saturating_sub(1);
    }
}

fn team_count_status(total: u32) -> String {
    if total == MAX_TEAMS {
        format!("Total teams set to {total} (the maximum)")
    } else {
        format!("Total teams set to {total}")
    }
}

/// Highest scroll offset for a log of `len` rows.
fn last_history_row(len: usize) -> u16 {
    u16::try_from(len.saturating_sub(1)).unwrap_or(u16::MAX)
}

/// The catalog named by the settings, else the embedded one. A catalog that
/// cannot be loaded at all leaves the game reel disabled.
fn load_catalog(path: Option<&Path>) -> Catalog {
    if let Some(path) = path {
        match Catalog::from_path(path) {
            Ok(catalog) => return catalog,
            Err(e) => error!("{e}; using the built-in game list"),
        }
    }
    Catalog::embedded().unwrap_or_else(|e| {
        error!("{e}");
        Catalog::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use frc_selector::Game;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    fn test_app(games: Vec<Game>) -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();
        let engine =
            SelectionEngine::load(Catalog::from_games(games), PersistentStore::new(store, LogSink));
        (App::with_engine(AppSettings::default(), engine), dir)
    }

    fn two_games() -> Vec<Game> {
        vec![Game::new(2020, "Infinite Recharge"), Game::new(2021, "Infinite Recharge at Home")]
    }

    #[tokio::test]
    async fn game_spin_commits_on_finish() {
        let (mut app, _dir) = test_app(two_games());
        let (tx, _rx) = mpsc::channel(16);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(app.begin_spin(SpinKind::Game, &tx));
        assert!(!app.begin_spin(SpinKind::Game, &tx), "busy flag should block a second spin");
        assert!(app.engine.selected_game().is_none());

        app.on_spin_tick(SpinKind::Game, &mut rng);
        assert!(app.state.game_reel.display.is_some());
        assert_eq!(app.engine.available_games().len(), 2);

        app.finish_spin(SpinKind::Game, &mut rng);
        assert!(!app.state.is_spinning(SpinKind::Game));
        assert!(app.state.game_reel.spin.timer.is_none());
        let selected = app.engine.selected_game().cloned();
        assert!(selected.is_some());
        assert_eq!(app.state.game_reel.display, selected);
        assert_eq!(app.engine.available_games().len(), 1);
    }

    #[tokio::test]
    async fn team_spin_needs_a_game() {
        let (mut app, _dir) = test_app(two_games());
        let (tx, _rx) = mpsc::channel(16);
        assert!(!app.can_spin(SpinKind::Team));
        assert!(!app.begin_spin(SpinKind::Team, &tx));
        assert!(!app.state.is_spinning(SpinKind::Team));
    }

    #[tokio::test]
    async fn team_display_matches_logged_team() {
        let (mut app, _dir) = test_app(two_games());
        let (tx, _rx) = mpsc::channel(16);
        let mut rng = StdRng::seed_from_u64(17);

        app.begin_spin(SpinKind::Game, &tx);
        app.finish_spin(SpinKind::Game, &mut rng);
        assert!(app.begin_spin(SpinKind::Team, &tx));
        for _ in 0..5 {
            app.on_spin_tick(SpinKind::Team, &mut rng);
        }
        app.finish_spin(SpinKind::Team, &mut rng);

        let logged = app.engine.selections().last().unwrap().team;
        assert_eq!(app.state.team_reel.display, Some(logged));
        assert_eq!(app.engine.selected_team(), Some(logged));
    }

    #[test]
    fn stale_events_are_ignored() {
        let (mut app, _dir) = test_app(two_games());
        let mut rng = StdRng::seed_from_u64(1);
        app.on_spin_tick(SpinKind::Game, &mut rng);
        app.finish_spin(SpinKind::Game, &mut rng);
        assert!(app.state.game_reel.display.is_none());
        assert!(app.engine.selected_game().is_none());
        assert_eq!(app.engine.available_games().len(), 2);
    }

    #[tokio::test]
    async fn drained_game_pool_refills_after_event() {
        let (mut app, _dir) = test_app(two_games());
        let (tx, _rx) = mpsc::channel(16);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..2 {
            app.begin_spin(SpinKind::Game, &tx);
            app.finish_spin(SpinKind::Game, &mut rng);
        }
        assert!(app.engine.available_games().is_empty());
        app.refill_pools();
        assert_eq!(app.engine.available_games().len(), 2);
    }

    #[test]
    fn team_count_edit_clamps_input() {
        let (mut app, _dir) = test_app(two_games());
        app.start_team_count_edit();
        assert_eq!(app.state.team_count.input, "20");
        app.state.team_count.pop();
        app.state.team_count.pop();
        app.commit_team_count_edit();
        assert_eq!(app.engine.total_teams(), 1);

        app.start_team_count_edit();
        app.state.team_count.pop();
        for ch in "37".chars() {
            app.state.team_count.push(ch);
        }
        app.commit_team_count_edit();
        assert_eq!(app.engine.total_teams(), 37);
        assert_eq!(app.engine.available_teams().len(), 37);
    }

    #[test]
    fn adjust_total_teams_never_drops_below_one() {
        let (mut app, _dir) = test_app(two_games());
        app.engine.set_total_teams(1);
        app.adjust_total_teams(-1);
        assert_eq!(app.engine.total_teams(), 1);
        app.adjust_total_teams(1);
        assert_eq!(app.engine.total_teams(), 2);
    }

    #[test]
    fn team_count_status_mentions_the_cap() {
        let (mut app, _dir) = test_app(two_games());
        app.start_team_count_edit();
        for ch in "999999".chars() {
            app.state.team_count.push(ch);
        }
        app.commit_team_count_edit();
        assert_eq!(app.engine.total_teams(), MAX_TEAMS);
        let status = app.state.status.as_ref().unwrap();
        assert!(status.text.ends_with("(the maximum)"), "{}", status.text);

        app.adjust_total_teams(-1);
        let status = app.state.status.as_ref().unwrap();
        assert_eq!(status.text, format!("Total teams set to {}", MAX_TEAMS - 1));
    }

    #[test]
    fn history_row_limit_saturates() {
        assert_eq!(last_history_row(0), 0);
        assert_eq!(last_history_row(3), 2);
        assert_eq!(last_history_row(70_000), u16::MAX);
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let (mut app, _dir) = test_app(two_games());
        app.update_tab(MenuItem::History);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::History);
    }

    #[test]
    fn history_scroll_is_bounded() {
        let (mut app, _dir) = test_app(two_games());
        app.history_scroll_down();
        assert_eq!(app.state.history.scroll_offset, 0);
        app.history_scroll_up();
        assert_eq!(app.state.history.scroll_offset, 0);
    }
}
