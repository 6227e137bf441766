//! Read-only view of the live battle consumed by the search

use super::action::Move;
use super::roster::{MonId, MonStatus, Slot};
use super::side::Side;

use thiserror::Error;

/// Dynamax bookkeeping for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DynamaxState {
    /// The side may still dynamax this battle
    pub available: bool,
    /// The side's active combatant is currently dynamaxed
    pub active: bool,
}

impl DynamaxState {
    pub fn new(available: bool, active: bool) -> Self {
        Self { available, active }
    }

    pub fn can_dynamax(&self) -> bool {
        self.available && !self.active
    }

    /// State after spending the dynamax on this turn's attack
    pub fn spent(&self) -> Self {
        Self {
            available: false,
            active: true,
        }
    }
}

/// A snapshot that breaks the reader's contract; the search refuses to run on it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("{0} roster is empty")]
    EmptyRoster(Side),

    #[error("{0} has no active combatant")]
    MissingActive(Side),

    #[error("combatant {0} is not on its roster")]
    UnknownCombatant(Slot),
}

/// Everything the search reads from the battle engine for one decision.
///
/// Opponent information is limited to what has been publicly revealed.
pub trait BattleView {
    /// Every combatant known on `side`, indexed by `MonId`
    fn roster(&self, side: Side) -> Vec<MonStatus>;

    fn active(&self, side: Side) -> Option<MonId>;

    /// Attacks the agent may legally use this turn
    fn legal_moves(&self) -> Vec<Move>;

    /// Teammates the agent may legally switch to this turn
    fn legal_switches(&self) -> Vec<MonId>;

    /// Attacks known for a combatant; revealed moves only for the opponent
    fn known_moves(&self, slot: Slot) -> Vec<Move>;

    /// HP the defender loses, or `None` when the engine cannot say
    fn simulate_damage(&self, mv: &Move, attacker: Slot, defender: Slot, dynamax: bool) -> Option<i32>;

    /// How hard the attacker's types hit the defender (4, 2, 1, 0.5, 0.25, 0)
    fn type_multiplier(&self, defender: Slot, attacker: Slot) -> f64;

    fn outspeeds(&self, attacker: Slot, defender: Slot) -> bool;

    fn dynamax(&self, side: Side) -> DynamaxState;
}
