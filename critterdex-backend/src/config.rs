use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritterConfig {
    /// Directory holding fish.json / bugs.json and the caught-state entry
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_caught_file")]
    pub caught_file: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Initial value of the hemisphere toggle
    #[serde(default)]
    pub southern_hemisphere: bool,

    /// Jaro-Winkler threshold for "did you mean" suggestions
    #[serde(default = "default_suggestion_threshold")]
    pub suggestion_threshold: f64,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_caught_file() -> String {
    "caught.json".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_suggestion_threshold() -> f64 {
    0.85
}

impl Default for CritterConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            caught_file: default_caught_file(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            southern_hemisphere: false,
            suggestion_threshold: default_suggestion_threshold(),
        }
    }
}

impl CritterConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CritterConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn caught_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.caught_file)
    }
}

pub static CONFIG: OnceLock<CritterConfig> = OnceLock::new();

/// Load `config.toml` from the working directory into [`CONFIG`].
///
/// A missing file is not an error; defaults are used instead.
pub fn read_config() -> anyhow::Result<&'static CritterConfig> {
    let config = if Path::new(CONFIG_PATH).exists() {
        CritterConfig::from_file(CONFIG_PATH)?
    } else {
        CritterConfig::default()
    };

    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CritterConfig = toml::from_str(
            r#"
            data_dir = "/srv/critterdex"
            southern_hemisphere = true
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, "/srv/critterdex");
        assert!(config.southern_hemisphere);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.caught_path(), Path::new("/srv/critterdex").join("caught.json"));
    }

    #[test]
    fn test_empty_config() {
        let config: CritterConfig = toml::from_str("").unwrap();
        assert_eq!(config.data_dir, "data");
        assert!((config.suggestion_threshold - 0.85).abs() < f64::EPSILON);
    }
}
