use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tandem_battle::TableDex;

/// How to start the simulator process
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            program: "pokemon-showdown".to_string(),
            args: vec!["simulate-battle".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub simulator: SimulatorConfig,
    /// Format id passed in the start directive
    pub format_id: String,
    /// Parsed simulator chunks buffered per match before the reader blocks
    pub chunk_capacity: usize,
    /// Pending inputs buffered before senders to the mediator wait
    pub inbox_capacity: usize,
    /// JSON name tables for species, moves, items and abilities
    pub dex_path: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            format_id: "gen9customgame".to_string(),
            chunk_capacity: 32,
            inbox_capacity: 256,
            dex_path: None,
        }
    }
}

impl HostConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// The configured dex, or an empty one when no path is set
    pub fn load_dex(&self) -> Result<TableDex> {
        let Some(path) = &self.dex_path else {
            return Ok(TableDex::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dex {}", path.display()))?;
        TableDex::from_json(&text).with_context(|| format!("Invalid dex {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = HostConfig::from_json(r#"{"format_id":"gen9ou","chunk_capacity":4}"#).unwrap();
        assert_eq!(config.format_id, "gen9ou");
        assert_eq!(config.chunk_capacity, 4);
        assert_eq!(config.inbox_capacity, 256);
        assert_eq!(config.simulator, SimulatorConfig::default());
    }

    #[test]
    fn test_simulator_override() {
        let config = HostConfig::from_json(
            r#"{"simulator":{"program":"node","args":["ps/pokemon-showdown","simulate-battle"]}}"#,
        )
        .unwrap();
        assert_eq!(config.simulator.program, "node");
        assert_eq!(config.simulator.args.len(), 2);
    }

    #[test]
    fn test_missing_dex_path_is_empty_dex() {
        let dex = HostConfig::default().load_dex().unwrap();
        assert_eq!(dex.species_count(), 0);
    }
}
