//! Simulator configuration read from the environment.
use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Everything the headless simulator needs to run one encounter.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Content directory (`spells.ron`, `encounters.ron`, ...).
    pub data_dir: PathBuf,
    pub encounter: String,
    pub character: String,
    /// Session seed; random when unset.
    pub seed: Option<u64>,
    /// Safety cap on player turns before the run is abandoned.
    pub max_turns: u32,
    /// Where reports (and, with persistence, sessions) are written.
    pub save_dir: Option<PathBuf>,
    /// Checkpoint the session after every request.
    pub enable_persistence: bool,
    /// Mirror logs to stderr on top of the log file.
    pub log_to_stderr: bool,
    /// Print the battlefield after each player turn.
    pub show_map: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::bundled_data_dir(),
            encounter: "cellar".to_owned(),
            character: "hero".to_owned(),
            seed: None,
            max_turns: 200,
            save_dir: None,
            enable_persistence: false,
            log_to_stderr: false,
            show_map: true,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_DATA_DIR` - Content directory (default: bundled sample data)
    /// - `TACTICS_ENCOUNTER` - Encounter id (default: cellar)
    /// - `TACTICS_CHARACTER` - Character id (default: hero)
    /// - `TACTICS_SEED` - Session seed (default: random)
    /// - `TACTICS_MAX_TURNS` - Player turn cap (default: 200)
    /// - `TACTICS_SAVE_DIR` - Report/session directory (default: platform data dir)
    /// - `TACTICS_PERSIST` - Checkpoint sessions to disk (default: false)
    /// - `TACTICS_LOG_STDERR` - Also log to stderr (default: false)
    /// - `TACTICS_SHOW_MAP` - Print the grid each turn (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = read("TACTICS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(encounter) = read("TACTICS_ENCOUNTER") {
            config.encounter = encounter;
        }
        if let Some(character) = read("TACTICS_CHARACTER") {
            config.character = character;
        }
        config.seed = read("TACTICS_SEED").and_then(|seed| parse_seed(&seed));
        if let Some(turns) = read("TACTICS_MAX_TURNS").and_then(|v| v.parse::<u32>().ok()) {
            config.max_turns = turns.max(1);
        }
        config.save_dir = read("TACTICS_SAVE_DIR").map(PathBuf::from);
        if let Some(persist) = read("TACTICS_PERSIST").and_then(|v| parse_flag(&v)) {
            config.enable_persistence = persist;
        }
        if let Some(stderr) = read("TACTICS_LOG_STDERR").and_then(|v| parse_flag(&v)) {
            config.log_to_stderr = stderr;
        }
        if let Some(show) = read("TACTICS_SHOW_MAP").and_then(|v| parse_flag(&v)) {
            config.show_map = show;
        }

        config
    }

    fn bundled_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../game/content/data")
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "tactics")
    }

    /// Platform data directory unless overridden.
    pub fn resolved_save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| env::temp_dir().join("tactics"))
        })
    }

    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.cache_dir().join("logs"))
            .unwrap_or_else(|| env::temp_dir().join("tactics").join("logs"))
    }
}

/// Decimal or `0x`-prefixed hexadecimal.
fn parse_seed(value: &str) -> Option<u64> {
    let value = value.trim();
    match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert_eq!(config.encounter, "cellar");
        assert_eq!(config.seed, None);
        assert!(!config.enable_persistence);
        assert!(config.data_dir.ends_with("data"));
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("TACTICS_ENCOUNTER", "crypt"),
            ("TACTICS_SEED", "0xff"),
            ("TACTICS_MAX_TURNS", "0"),
            ("TACTICS_PERSIST", "yes"),
            ("TACTICS_SHOW_MAP", "off"),
        ]);
        assert_eq!(config.encounter, "crypt");
        assert_eq!(config.seed, Some(255));
        assert_eq!(config.max_turns, 1);
        assert!(config.enable_persistence);
        assert!(!config.show_map);
    }

    #[test]
    fn ignores_garbage_values() {
        let config = config(&[("TACTICS_SEED", "soon"), ("TACTICS_PERSIST", "maybe")]);
        assert_eq!(config.seed, None);
        assert!(!config.enable_persistence);
    }
}
