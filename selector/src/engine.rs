use crate::pool::{GamePool, TeamPool};
use crate::store::{DiagnosticSink, KeyValueStore, LogSink, PersistentStore};
use crate::{Catalog, Game, Selection, keys};
use log::{debug, info};
use rand::Rng;

pub const DEFAULT_TOTAL_TEAMS: u32 = 20;
/// Upper bound on the team count so the team pool stays a small allocation.
pub const MAX_TEAMS: u32 = 10_000;

/// Clamp a requested team count into `1..=MAX_TEAMS`.
pub fn clamp_total_teams(n: i64) -> u32 {
    n.clamp(1, i64::from(MAX_TEAMS)) as u32
}

/// Interpret free-form team-count input. Anything that is not an integer
/// resolves to 1.
pub fn parse_total_teams(input: &str) -> u32 {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => clamp_total_teams(n),
        // Digits only, but too long for i64.
        Err(_) if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) => MAX_TEAMS,
        Err(_) => 1,
    }
}

/// Two depleting pools and the log of confirmed pairings, written through to
/// a [`PersistentStore`] on every change.
pub struct SelectionEngine<S, D = LogSink> {
    store: PersistentStore<S, D>,
    catalog: Catalog,
    game_pool: GamePool,
    team_pool: TeamPool,
    selections: Vec<Selection>,
    selected_game: Option<Game>,
    selected_team: Option<u32>,
    total_teams: u32,
}

impl<S: KeyValueStore, D: DiagnosticSink> SelectionEngine<S, D> {
    /// Restore every persisted value, falling back to first-run defaults per
    /// key, and reconcile the pools with the catalog and team count.
    pub fn load(catalog: Catalog, store: PersistentStore<S, D>) -> Self {
        let total_teams = clamp_total_teams(
            store.read::<i64>(keys::TOTAL_TEAMS, i64::from(DEFAULT_TOTAL_TEAMS)),
        );
        let game_pool = GamePool::from_games(
            store.read(keys::AVAILABLE_GAMES, catalog.games().to_vec()),
            &catalog,
        );
        let team_pool = TeamPool::from_teams(
            store.read(keys::AVAILABLE_TEAMS, (1..=total_teams).collect()),
            total_teams,
        );
        let selections: Vec<Selection> = store.read(keys::SELECTIONS, Vec::new());
        let selected_game: Option<Game> = store.read(keys::SELECTED_GAME, None);
        let selected_team: Option<u32> = store.read(keys::SELECTED_TEAM, None);

        debug!(
            "restored {} games, {} teams, {} selections (total teams {total_teams})",
            game_pool.len(),
            team_pool.len(),
            selections.len()
        );

        Self {
            store,
            catalog,
            game_pool,
            team_pool,
            selections,
            selected_game,
            selected_team,
            total_teams,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn available_games(&self) -> &GamePool {
        &self.game_pool
    }

    pub fn available_teams(&self) -> &TeamPool {
        &self.team_pool
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn selected_game(&self) -> Option<&Game> {
        self.selected_game.as_ref()
    }

    pub fn selected_team(&self) -> Option<u32> {
        self.selected_team
    }

    pub fn total_teams(&self) -> u32 {
        self.total_teams
    }

    pub fn store(&self) -> &PersistentStore<S, D> {
        &self.store
    }

    /// Whether a game draw has anything to draw from, counting a refill.
    pub fn can_select_game(&self) -> bool {
        !self.game_pool.is_empty() || !self.catalog.is_empty()
    }

    /// Team draws need a current game; the team pool always refills to at
    /// least one member.
    pub fn can_select_team(&self) -> bool {
        self.selected_game.is_some()
    }

    /// Refill whichever pool has run dry. Returns true if anything changed.
    pub fn refill_empty_pools(&mut self) -> bool {
        let games = self.refill_game_pool();
        let teams = self.refill_team_pool();
        games || teams
    }

    /// Restore the full catalog once every game has been drawn.
    pub fn refill_game_pool(&mut self) -> bool {
        if !self.game_pool.is_empty() || self.catalog.is_empty() {
            return false;
        }
        self.game_pool = GamePool::full(&self.catalog);
        self.store.write(keys::AVAILABLE_GAMES, self.game_pool.games());
        debug!("game pool refilled with {} games", self.game_pool.len());
        true
    }

    /// Restore `1..=total` once every team has been drawn.
    pub fn refill_team_pool(&mut self) -> bool {
        if !self.team_pool.is_empty() {
            return false;
        }
        self.team_pool = TeamPool::full(self.total_teams);
        self.store.write(keys::AVAILABLE_TEAMS, self.team_pool.teams());
        debug!("team pool refilled with {} teams", self.team_pool.len());
        true
    }

    /// Draw a game and make it current. `None` leaves all state unchanged.
    pub fn select_game<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Game> {
        self.refill_game_pool();
        let game = self.game_pool.draw(rng)?;
        info!("selected game {game} ({} remaining)", self.game_pool.len());

        self.selected_game = Some(game.clone());
        self.store.write(keys::SELECTED_GAME, &self.selected_game);
        self.store.write(keys::AVAILABLE_GAMES, self.game_pool.games());
        Some(game)
    }

    /// Draw a team for the current game and log the pairing. `None` when no
    /// game is selected; state is unchanged in that case.
    pub fn select_team<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Selection> {
        let game = self.selected_game.clone()?;
        self.refill_team_pool();
        let team = self.team_pool.draw(rng)?;
        info!("selected team {team} for {game} ({} remaining)", self.team_pool.len());

        let selection = Selection { game, team };
        self.selected_team = Some(team);
        self.selections.push(selection.clone());
        self.store.write(keys::SELECTED_TEAM, &self.selected_team);
        self.store.write(keys::AVAILABLE_TEAMS, self.team_pool.teams());
        self.store.write(keys::SELECTIONS, &self.selections);
        Some(selection)
    }

    /// Set the team count and start a fresh team pool. Returns the clamped
    /// count actually applied.
    pub fn set_total_teams(&mut self, n: i64) -> u32 {
        let total = clamp_total_teams(n);
        self.total_teams = total;
        self.team_pool = TeamPool::full(total);
        self.store.write(keys::TOTAL_TEAMS, &self.total_teams);
        self.store.write(keys::AVAILABLE_TEAMS, self.team_pool.teams());
        info!("total teams set to {total}");
        total
    }

    /// A random game to flash while spinning. Does not touch the pool.
    pub fn preview_game<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Game> {
        self.game_pool.peek(rng)
    }

    pub fn preview_team<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u32> {
        self.team_pool.peek(rng)
    }
}
