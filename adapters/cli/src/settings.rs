//! Game settings read from an optional TOML file and command-line overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_escape_core::{ConfigError, GameConfig, DEFAULT_ACTIVATION_TURN};
use serde::Deserialize;

/// Countdown assigned to dynamic walls when nothing else is configured.
pub(crate) const DEFAULT_DYNAMIC_WALL_TURNS: u32 = 3;

/// Tunable rules of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Committed moves after which the pursuer appears.
    pub(crate) activation_turn: u32,
    /// Countdown given to every dynamic wall in a loaded maze file.
    pub(crate) dynamic_wall_turns: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            activation_turn: DEFAULT_ACTIVATION_TURN,
            dynamic_wall_turns: DEFAULT_DYNAMIC_WALL_TURNS,
        }
    }
}

impl Settings {
    /// Reads settings from the TOML file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    /// Parses settings from TOML text; missing keys keep their defaults.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }

    /// Replaces file values with the ones given on the command line.
    pub(crate) fn apply_overrides(
        &mut self,
        activation_turn: Option<u32>,
        dynamic_wall_turns: Option<u32>,
    ) {
        if let Some(value) = activation_turn {
            self.activation_turn = value;
        }
        if let Some(value) = dynamic_wall_turns {
            self.dynamic_wall_turns = value;
        }
    }

    /// Validated world rules.
    pub(crate) fn game_config(&self) -> Result<GameConfig, ConfigError> {
        GameConfig::new(self.activation_turn)
    }
}
