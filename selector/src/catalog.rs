use crate::Game;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

const EMBEDDED_CATALOG_JSON: &str = include_str!("../../frc_games.json");

#[derive(Debug)]
pub enum CatalogError {
    Read(std::io::Error, String),
    Parse(serde_json::Error, String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Read(e, source) => write!(f, "could not read catalog {source}: {e}"),
            CatalogError::Parse(e, source) => write!(f, "invalid catalog json in {source}: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Read(e, _) => Some(e),
            CatalogError::Parse(e, _) => Some(e),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// The fixed universe of games a session draws from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    games: Vec<Game>,
}

impl Catalog {
    /// Build a catalog, keeping the first entry for any repeated year.
    pub fn from_games(games: Vec<Game>) -> Self {
        let mut seen = HashSet::new();
        let games = games.into_iter().filter(|g| seen.insert(g.year)).collect();
        Self { games }
    }

    /// The FRC game list compiled into the binary.
    pub fn embedded() -> CatalogResult<Self> {
        Self::from_json(EMBEDDED_CATALOG_JSON, "embedded catalog")
    }

    pub fn from_path(path: &Path) -> CatalogResult<Self> {
        let source = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::Read(e, source.clone()))?;
        Self::from_json(&content, &source)
    }

    pub fn from_json(content: &str, source: &str) -> CatalogResult<Self> {
        let games: Vec<Game> = serde_json::from_str(content)
            .map_err(|e| CatalogError::Parse(e, source.to_string()))?;
        Ok(Self::from_games(games))
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = Catalog::embedded().expect("embedded catalog should parse");
        assert!(!catalog.is_empty());
        assert_eq!(catalog.games().first().map(|g| g.year), Some(1992));
    }

    #[test]
    fn embedded_catalog_is_unique_by_year() {
        let raw: Vec<Game> = serde_json::from_str(EMBEDDED_CATALOG_JSON).unwrap();
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(raw.len(), catalog.len());
    }

    #[test]
    fn repeated_year_keeps_first_entry() {
        let catalog = Catalog::from_games(vec![
            Game::new(2020, "Infinite Recharge"),
            Game::new(2020, "Duplicate"),
            Game::new(2022, "Rapid React"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.games()[0].name, "Infinite Recharge");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Catalog::from_json("[{\"year\": \"soon\"}]", "test").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_, _)));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read(_, _)));
    }

    #[test]
    fn loads_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"year": 2024, "name": "Crescendo"}}]"#).unwrap();
        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.games(), &[Game::new(2024, "Crescendo")]);
    }
}
