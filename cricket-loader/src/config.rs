use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Loader configuration. Resolution order: built-in defaults, then an
/// optional TOML file, then `CRICKET_*` environment variables. CLI flags
/// override all of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub database_path: PathBuf,
    pub input_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("cricket_data.db"),
            input_dir: PathBuf::from("data/matches"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl LoaderConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(value) = env::var("CRICKET_DATABASE_PATH") {
            self.database_path = PathBuf::from(value);
        }
        if let Ok(value) = env::var("CRICKET_INPUT_DIR") {
            self.input_dir = PathBuf::from(value);
        }
        if let Ok(value) = env::var("CRICKET_LOG_DIR") {
            self.log_dir = PathBuf::from(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let config = LoaderConfig::load_from(Path::new("/nonexistent/cricket.toml")).unwrap();
        assert_eq!(config.database_path, PathBuf::from("cricket_data.db"));
        assert_eq!(config.input_dir, PathBuf::from("data/matches"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cricket.toml");
        std::fs::write(&path, "database_path = \"/tmp/test.db\"\n").unwrap();

        let config = LoaderConfig::load_from(&path).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.input_dir, PathBuf::from("data/matches"));
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cricket.toml");
        std::fs::write(&path, "database_path = [not toml").unwrap();

        assert!(LoaderConfig::load_from(&path).is_err());
    }
}
