//! Combatant identities and hit point bookkeeping

use super::side::Side;

use bumpalo::{collections::Vec as BumpVec, Bump};
use std::fmt;

/// Position of a combatant within its side's roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonId(pub usize);

/// A combatant on a specific side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub side: Side,
    pub id: MonId,
}

impl Slot {
    pub fn new(side: Side, id: MonId) -> Self {
        Self { side, id }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.side, self.id.0)
    }
}

/// Publicly visible status of one combatant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonStatus {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
}

impl MonStatus {
    pub fn new(name: &str, hp: i32, max_hp: i32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            max_hp,
        }
    }
}

/// Hypothetical HP of every combatant on one side, keyed by `MonId`.
///
/// Values may go negative while damage is applied; anything at or below
/// zero counts as fainted.
#[derive(Debug)]
pub struct HpTable<'a> {
    hp: BumpVec<'a, i32>,
}

impl<'a> HpTable<'a> {
    pub fn from_roster(roster: &[MonStatus], arena: &'a Bump) -> Self {
        Self {
            hp: BumpVec::from_iter_in(roster.iter().map(|mon| mon.hp), arena),
        }
    }

    /// A value copy living in `arena`
    pub fn copy_in(&self, arena: &'a Bump) -> Self {
        Self {
            hp: BumpVec::from_iter_in(self.hp.iter().copied(), arena),
        }
    }

    pub fn len(&self) -> usize {
        self.hp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hp.is_empty()
    }

    pub fn contains(&self, id: MonId) -> bool {
        id.0 < self.hp.len()
    }

    pub fn get(&self, id: MonId) -> Option<i32> {
        self.hp.get(id.0).copied()
    }

    /// Unknown combatants count as fainted
    pub fn is_fainted(&self, id: MonId) -> bool {
        self.get(id).map_or(true, |hp| hp <= 0)
    }

    pub fn all_fainted(&self) -> bool {
        self.hp.iter().all(|hp| *hp <= 0)
    }

    /// Returns false when `id` is not on this roster
    pub fn apply_damage(&mut self, id: MonId, amount: i32) -> bool {
        match self.hp.get_mut(id.0) {
            Some(hp) => {
                *hp -= amount;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonId, i32)> + '_ {
        self.hp.iter().enumerate().map(|(i, hp)| (MonId(i), *hp))
    }

    /// Combatants still standing, in roster order
    pub fn alive(&self) -> impl Iterator<Item = MonId> + '_ {
        self.iter().filter(|(_, hp)| *hp > 0).map(|(id, _)| id)
    }
}
