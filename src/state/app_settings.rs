use log::LevelFilter;
use std::path::PathBuf;

pub const STATE_FILE_ENV: &str = "FRCSPIN_STATE_FILE";
pub const CATALOG_ENV: &str = "FRCSPIN_CATALOG_JSON";
pub const LOG_LEVEL_ENV: &str = "FRCSPIN_LOG";

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub state_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
}

impl AppSettings {
    /// Everything comes from the environment; there is no config file.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_level = non_blank(LOG_LEVEL_ENV)
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .or(Some(LevelFilter::Info));

        let state_path = non_blank(STATE_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_state_path(non_blank("XDG_CONFIG_HOME"), non_blank("HOME")));

        Self {
            full_screen: false,
            log_level,
            state_path,
            catalog_path: non_blank(CATALOG_ENV).map(PathBuf::from),
        }
    }
}

fn default_state_path(config_dir: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(config_dir) = config_dir {
        return PathBuf::from(config_dir).join("frcspin").join("state.json");
    }
    if let Some(home) = home {
        return PathBuf::from(home).join(".config").join("frcspin").join("state.json");
    }
    PathBuf::from("frcspin_state.json")
}
