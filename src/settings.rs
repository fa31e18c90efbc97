//! Match settings
//!
//! Loaded from a JSON file when one is given; every field falls back to its
//! default when missing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::{LookaheadRule, SearchConfig};

/// Who controls a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Minimax,
    Random,
}

impl PlayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerKind::Minimax => "minimax",
            PlayerKind::Random => "random",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "minimax" | "ai" | "bot" => Some(PlayerKind::Minimax),
            "random" | "rand" => Some(PlayerKind::Random),
            _ => None,
        }
    }
}

/// Search tuning for minimax seats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Plies to look ahead
    pub max_depth: u32,
    /// Cap on game-tree nodes per decision (`null` for no cap)
    pub node_budget: Option<usize>,
    /// Propagation used to simulate moves during search
    pub lookahead: LookaheadRule,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_SEARCH_DEPTH,
            node_budget: Some(DEFAULT_NODE_BUDGET),
            lookahead: LookaheadRule::Simplified,
        }
    }
}

impl SearchSettings {
    pub fn to_config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            node_budget: self.node_budget,
            lookahead: self.lookahead,
        }
    }
}

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    pub rows: usize,
    pub cols: usize,

    // === Players ===
    /// Seat controllers, player one first
    pub players: [PlayerKind; 2],
    pub search: SearchSettings,
    /// Seed for random seats
    pub seed: u64,

    // === Match ===
    /// Moves before the match is called a draw
    pub max_turns: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            players: [PlayerKind::Minimax, PlayerKind::Random],
            search: SearchSettings::default(),
            seed: 0,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows < 2 || self.cols < 2 {
            return Err(Error::InvalidSettings(format!(
                "board {}x{} needs at least 2x2",
                self.rows, self.cols
            )));
        }
        if self.search.node_budget == Some(0) {
            return Err(Error::InvalidSettings("node_budget must be positive".into()));
        }
        if self.max_turns == 0 {
            return Err(Error::InvalidSettings("max_turns must be positive".into()));
        }
        Ok(())
    }
}
