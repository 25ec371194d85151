use std::path::Path;

use serde::Deserialize;

use crate::ConsoleError;

/// Display settings. Every key is optional; the file may also carry a
/// `database` section, which is read by the storage layer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Teams listed on the dashboard.
    pub top_teams: usize,
    /// Scorers listed on the dashboard.
    pub top_scorers: usize,
    /// Completed matches shown for a signed-in player.
    pub recent_matches: usize,
    /// Standings rows highlighted as qualification places.
    pub highlight_top: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            top_teams: 4,
            top_scorers: 5,
            recent_matches: 5,
            highlight_top: 3,
        }
    }
}

impl ConsoleConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConsoleError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConsoleError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| ConsoleError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config =
            ConsoleConfig::from_yaml_str("top_scorers: 10\ndatabase:\n  url: league.db\n").unwrap();
        assert_eq!(config.top_scorers, 10);
        assert_eq!(config.top_teams, 4);
        assert_eq!(config.highlight_top, 3);
    }

    #[test]
    fn empty_file_is_the_default() {
        assert_eq!(ConsoleConfig::from_yaml_str("").unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn malformed_values_are_reported() {
        assert!(matches!(
            ConsoleConfig::from_yaml_str("top_teams: many\n"),
            Err(ConsoleError::Config(_))
        ));
    }
}
