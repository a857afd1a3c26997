use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Match-level limits. Each side bats one innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub overs_per_innings: u32,
    pub max_wickets: u32,
    /// How many of a team's players make up its batting order.
    pub squad_size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            overs_per_innings: 20,
            max_wickets: 10,
            squad_size: 11,
        }
    }
}

/// Descriptive fields of a match. None of them affect scoring.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchDetails {
    /// Falls back to "<batting first> vs <chasing>" when blank.
    pub title: Option<String>,
    pub venue: Option<String>,
    pub date: Option<NaiveDate>,
    /// Free-form label such as "T20".
    pub format: Option<String>,
}

impl MatchDetails {
    /// Trimmed copy with blank text fields dropped.
    pub fn normalized(&self) -> Self {
        Self {
            title: non_blank(&self.title),
            venue: non_blank(&self.venue),
            date: self.date,
            format: non_blank(&self.format),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl MatchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overs_per_innings == 0 {
            return Err(ConfigError::Invalid("overs_per_innings must be positive".into()));
        }
        if self.max_wickets == 0 {
            return Err(ConfigError::Invalid("max_wickets must be positive".into()));
        }
        if self.squad_size < 2 {
            return Err(ConfigError::Invalid("squad_size must be at least 2".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.overs_per_innings, 20);
        assert_eq!(config.max_wickets, 10);
        assert_eq!(config.squad_size, 11);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = MatchConfig::from_toml_str("overs_per_innings = 5\n").unwrap();
        assert_eq!(config.overs_per_innings, 5);
        assert_eq!(config.max_wickets, 10);
    }

    #[test]
    fn rejects_zero_overs() {
        let err = MatchConfig::from_toml_str("overs_per_innings = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = MatchConfig::from_toml_str("overs_per_innings = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file_and_render() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "overs_per_innings = 10\nsquad_size = 6").unwrap();
        let config = MatchConfig::load(file.path()).unwrap();
        assert_eq!(config.overs_per_innings, 10);
        assert_eq!(config.squad_size, 6);

        let rendered = config.to_toml_string().unwrap();
        assert_eq!(MatchConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn details_parse_and_normalize() {
        let text = "title = \"  \"\nvenue = \" Eden Gardens \"\ndate = \"2026-03-14\"\n";
        let details: MatchDetails = toml::from_str(text).unwrap();
        let details = details.normalized();
        assert_eq!(details.title, None);
        assert_eq!(details.venue.as_deref(), Some("Eden Gardens"));
        assert_eq!(details.date, NaiveDate::from_ymd_opt(2026, 3, 14));
        assert_eq!(details.format, None);

        assert!(toml::from_str::<MatchDetails>("date = \"14/03/2026\"").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MatchConfig::load(Path::new("/nonexistent/crease.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
