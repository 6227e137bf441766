use crate::core::{Action, BattleView, ScriptedBattle};
use crate::utils::{make_rng, seeded_rng};

use super::driver::{Decision, TurnMemory};
use super::options::EngineOptions;
use super::search::{timed_decide, SearchOptions};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use std::fs;
use std::path::Path;

/// Engine holds the current position, the options and the memory carried
/// between turns, and answers `go` with one decision at a time
pub struct Engine {
    pub options: EngineOptions,
    pub battle: Option<ScriptedBattle>,
    pub memory: TurnMemory,
    rng: StdRng,
    last_tree: Option<String>,
}

impl Engine {
    /// Create a new engine instance with default options
    pub fn new() -> Self {
        Self {
            options: EngineOptions::default(),
            battle: None,
            memory: TurnMemory::default(),
            rng: make_rng(),
            last_tree: None,
        }
    }

    /// Set engine options; a new seed restarts the random stream
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        self.options.set_option(name, value)?;

        if name == "seed" {
            if let Some(seed) = self.options.seed {
                self.rng = seeded_rng(seed);
            }
        }

        Ok(())
    }

    /// Replace the position with one in snapshot notation
    pub fn set_position(&mut self, notation: &str) -> Result<()> {
        self.battle = Some(notation.parse()?);
        Ok(())
    }

    /// Read the position from a snapshot file
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let notation = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
        self.set_position(&notation)
    }

    /// Decide on the current position, returning the decision and the seconds it took
    pub fn go(&mut self, search_options: &SearchOptions) -> Result<(Decision, f64)> {
        let battle = self.battle.take().context("No position set")?;
        let result = self.decide(&battle, search_options);
        self.battle = Some(battle);
        result
    }

    /// Decide on any battle view, updating the turn memory
    pub fn decide<V: BattleView>(&mut self, view: &V, search_options: &SearchOptions) -> Result<(Decision, f64)> {
        let config = self.options.driver_config(search_options.depth);
        let (decision, memory, time) = timed_decide(view, &config, &self.memory, &mut self.rng)?;

        self.memory = memory;
        if decision.tree.is_some() {
            self.last_tree = decision.tree.clone();
        }

        Ok((decision, time))
    }

    pub fn previous(&self) -> Option<&Action> {
        self.memory.previous_action.as_ref()
    }

    pub fn forget(&mut self) {
        self.memory = TurnMemory::default();
    }

    pub fn display(&self) -> Result<String> {
        let battle = self.battle.as_ref().context("No position set")?;
        Ok(battle.to_string())
    }

    /// DOT rendering of the last tree searched with `graphviz` on
    pub fn tree(&self) -> Option<&str> {
        self.last_tree.as_deref()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
