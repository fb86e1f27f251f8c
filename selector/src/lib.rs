pub mod catalog;
pub mod engine;
pub mod pool;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use catalog::{Catalog, CatalogError};
pub use engine::{SelectionEngine, clamp_total_teams, parse_total_teams};
pub use pool::{GamePool, TeamPool};
pub use store::{
    CollectingSink, DiagnosticSink, FileStore, KeyValueStore, LogSink, MemoryStore,
    PersistentStore, StoreError,
};

// ---------------------------------------------------------------------------
// Domain types, which double as the persisted JSON shapes
// ---------------------------------------------------------------------------

/// One FRC season game. Unique by `year` within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Game {
    pub year: u16,
    pub name: String,
}

impl Game {
    pub fn new(year: u16, name: impl Into<String>) -> Self {
        Self { year, name: name.into() }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.name)
    }
}

/// A confirmed (game, team) pairing. Entries are only ever appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub game: Game,
    pub team: u32,
}

/// Storage keys. The layout is flat: one JSON value per key, no versioning.
pub mod keys {
    pub const SELECTED_GAME: &str = "selectedGame";
    pub const SELECTED_TEAM: &str = "selectedTeam";
    pub const AVAILABLE_GAMES: &str = "availableGames";
    pub const AVAILABLE_TEAMS: &str = "availableTeams";
    pub const SELECTIONS: &str = "selections";
    pub const TOTAL_TEAMS: &str = "totalTeams";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_serializes_with_year_and_name() {
        let json = serde_json::to_string(&Game::new(2023, "Charged Up")).unwrap();
        assert_eq!(json, r#"{"year":2023,"name":"Charged Up"}"#);
    }

    #[test]
    fn selection_reads_the_persisted_shape() {
        let raw = r#"{"game":{"year":2019,"name":"Destination: Deep Space"},"team":7}"#;
        let selection: Selection = serde_json::from_str(raw).unwrap();
        assert_eq!(selection.team, 7);
        assert_eq!(selection.game.year, 2019);
    }
}
