//! Configuration of a simulation run.
//!
//! Every field has a default, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! size = 7
//! max_ticks = 100
//! tick_delay_ms = 500
//! seed = 0
//! policy = "infection"
//! replay_filename = "output/replay.json"
//! history_filename = "output/history.csv"
//!
//! [energy]
//! max_energy = 10
//! duplicate_cost = 3
//! ```

use crate::error::Result;
use crate::grid::Grid;
use crate::policy::{EnergyParams, PolicyKind};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Dimension of the default board. Ignored when `board` is set.
    pub size: usize,
    pub max_ticks: usize,
    /// Pause between ticks when running interactively.
    pub tick_delay_ms: u64,
    pub seed: u64,
    pub policy: PolicyKind,
    pub energy: EnergyParams,
    /// Board layout in the format understood by [`Grid::parse`].
    pub board: Option<String>,
    /// Where to write the replay. No replay is kept when `None`.
    pub replay_filename: Option<String>,
    /// Where to write the cell histories as CSV. Nothing is written when `None`.
    pub history_filename: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            size: 7,
            max_ticks: 100,
            tick_delay_ms: 500,
            seed: 0,
            policy: PolicyKind::default(),
            energy: EnergyParams::default(),
            board: None,
            replay_filename: None,
            history_filename: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml(contents: &str) -> Result<SimulationConfig> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<SimulationConfig> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// The initial grid: the configured layout, or the default board.
    pub fn grid(&self) -> Result<Grid> {
        match &self.board {
            Some(layout) => Grid::parse(layout),
            None => Grid::default_board(self.size),
        }
    }
}
