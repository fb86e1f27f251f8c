use crate::{Catalog, Game};
use rand::Rng;
use std::collections::HashSet;

/// Uniform index into a pool of `len` items, `None` for an empty pool.
fn random_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    (len > 0).then(|| rng.random_range(0..len))
}

// ---------------------------------------------------------------------------
// Game pool
// ---------------------------------------------------------------------------

/// Games not yet drawn, in catalog order. Unique by year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamePool {
    games: Vec<Game>,
}

impl GamePool {
    pub fn full(catalog: &Catalog) -> Self {
        Self { games: catalog.games().to_vec() }
    }

    /// Rebuild a pool from stored games. Repeated years and years the
    /// catalog does not list are dropped; kept entries take the catalog's name.
    pub fn from_games(games: Vec<Game>, catalog: &Catalog) -> Self {
        let mut seen = HashSet::new();
        let games = games
            .into_iter()
            .filter_map(|g| catalog.games().iter().find(|c| c.year == g.year))
            .filter(|g| seen.insert(g.year))
            .cloned()
            .collect();
        Self { games }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn contains_year(&self, year: u16) -> bool {
        self.games.iter().any(|g| g.year == year)
    }

    /// A random member, left in place. Used for the spin flicker.
    pub fn peek<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Game> {
        random_index(self.games.len(), rng).map(|i| &self.games[i])
    }

    /// Remove and return a uniformly random member.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Game> {
        random_index(self.games.len(), rng).map(|i| self.games.remove(i))
    }
}

// ---------------------------------------------------------------------------
// Team pool
// ---------------------------------------------------------------------------

/// Team numbers not yet drawn, always a subset of `1..=total`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamPool {
    teams: Vec<u32>,
}

impl TeamPool {
    pub fn full(total: u32) -> Self {
        Self { teams: (1..=total).collect() }
    }

    /// Rebuild a pool from stored numbers. Repeats and numbers outside
    /// `1..=total` are discarded.
    pub fn from_teams(teams: Vec<u32>, total: u32) -> Self {
        let mut seen = HashSet::new();
        let teams = teams
            .into_iter()
            .filter(|t| (1..=total).contains(t) && seen.insert(*t))
            .collect();
        Self { teams }
    }

    pub fn teams(&self) -> &[u32] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn contains(&self, team: u32) -> bool {
        self.teams.contains(&team)
    }

    pub fn peek<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u32> {
        random_index(self.teams.len(), rng).map(|i| self.teams[i])
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u32> {
        random_index(self.teams.len(), rng).map(|i| self.teams.remove(i))
    }
}
