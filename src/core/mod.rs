//! Battle representations and the boundary to the battle engine

pub mod action;
pub mod battle;
pub mod roster;
pub mod scripted;
pub mod side;
pub mod types;

pub use action::{Action, Move, Order};
pub use battle::{BattleView, DynamaxState, SnapshotError};
pub use roster::{HpTable, MonId, MonStatus, Slot};
pub use scripted::{ScriptedBattle, ScriptedMon};
pub use side::{Side, SideArray};
pub use types::PokeType;
