//! Actions explored by the search and orders emitted to the battle

use super::roster::{MonId, Slot};
use super::types::PokeType;

use anyhow::{bail, ensure, Context, Result};
use std::fmt;

/// An attack known to a combatant
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub id: String,
    /// `None` for status and utility moves
    pub base_power: Option<u32>,
    pub move_type: Option<PokeType>,
}

impl Move {
    pub fn new(id: &str, base_power: Option<u32>, move_type: Option<PokeType>) -> Self {
        Self {
            id: id.to_string(),
            base_power,
            move_type,
        }
    }

    /// <id>:<power or ->[:<type>]
    pub fn from_notation(s: &str) -> Result<Self> {
        let mut parts = s.split(':');

        let id = parts.next().filter(|id| !id.is_empty()).context("Missing move id")?;
        let base_power = match parts.next() {
            None | Some("-") => None,
            Some(power) => Some(power.parse().with_context(|| format!("Invalid base power for {}", id))?),
        };
        let move_type = parts.next().map(|t| t.parse::<PokeType>()).transpose()?;

        ensure!(parts.next().is_none(), "Too many fields in move {}", s);

        Ok(Self::new(id, base_power, move_type))
    }

    pub fn to_notation(&self) -> String {
        let power = self
            .base_power
            .map_or_else(|| "-".to_string(), |p| p.to_string());

        match self.move_type {
            Some(t) => format!("{}:{}:{}", self.id, power, t),
            None => format!("{}:{}", self.id, power),
        }
    }
}

/// A transition between two search nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Attack {
        mv: Move,
        target: Slot,
        dynamax: bool,
    },
    Switch(Slot),
    /// Stand-in for a side with nothing to do; never emitted
    Pass,
}

impl Action {
    pub fn is_switch(&self) -> bool {
        matches!(self, Action::Switch(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Attack { mv, target, dynamax: false } => write!(f, "{} -> {}", mv.id, target),
            Action::Attack { mv, target, dynamax: true } => write!(f, "max {} -> {}", mv.id, target),
            Action::Switch(slot) => write!(f, "switch {}", slot),
            Action::Pass => write!(f, "pass"),
        }
    }
}

/// The command handed back to the battle for this turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Move { id: String, dynamax: bool },
    Switch(String),
    /// Let the battle pick its default choice
    Default,
}

impl Order {
    /// Resolve an action into an order, naming switch targets from the agent's roster
    pub fn from_action(action: &Action, agent_names: &[String]) -> Result<Self> {
        Ok(match action {
            Action::Attack { mv, dynamax, .. } => Order::Move {
                id: mv.id.clone(),
                dynamax: *dynamax,
            },
            Action::Switch(slot) => {
                let MonId(idx) = slot.id;
                let name = agent_names
                    .get(idx)
                    .with_context(|| format!("No combatant at {}", slot))?;
                Order::Switch(name.clone())
            }
            Action::Pass => bail!("Pass is not an order"),
        })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Move { id, dynamax: false } => write!(f, "move {}", id),
            Order::Move { id, dynamax: true } => write!(f, "move {} dynamax", id),
            Order::Switch(name) => write!(f, "switch {}", name),
            Order::Default => write!(f, "default"),
        }
    }
}
