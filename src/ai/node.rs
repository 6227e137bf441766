//! Search tree nodes

use crate::core::{
    Action, BattleView, DynamaxState, HpTable, MonId, Side, SideArray, Slot, SnapshotError,
};

use bumpalo::{collections::Vec as BumpVec, Bump};
use std::cell::RefCell;
use std::fmt;

pub type NodeRef<'a> = &'a RefCell<Node<'a>>;

/// What an action does to the position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Damage { target: Slot, amount: i32 },
    /// Bring in the combatant at this slot
    Switch(Slot),
    None,
}

/// One hypothetical position. The arena owns every node; `parent` is a
/// plain back reference and `children` is filled once by the generator.
pub struct Node<'a> {
    /// Side whose ply produced this node; the root counts as the opponent's
    pub turn_owner: Side,
    pub active: SideArray<MonId>,
    pub hp: SideArray<HpTable<'a>>,
    pub dynamax: SideArray<DynamaxState>,
    pub action: Option<Action>,
    pub parent: Option<NodeRef<'a>>,
    pub children: BumpVec<'a, NodeRef<'a>>,
    score: Option<f64>,
}

impl<'a> Node<'a> {
    /// Build the root from the live battle, rejecting snapshots whose
    /// active combatants are missing from their own rosters
    pub fn root<V: BattleView>(view: &V, arena: &'a Bump) -> Result<Self, SnapshotError> {
        let rosters = Side::all().map(|side| view.roster(side));
        let [agent_roster, opponent_roster] = &rosters;

        let mut active = [MonId(0); 2];
        for (side, roster) in Side::all().into_iter().zip(rosters.iter()) {
            if roster.is_empty() {
                return Err(SnapshotError::EmptyRoster(side));
            }
            let id = view.active(side).ok_or(SnapshotError::MissingActive(side))?;
            if id.0 >= roster.len() {
                return Err(SnapshotError::UnknownCombatant(Slot::new(side, id)));
            }
            active[side as usize] = id;
        }

        Ok(Self {
            turn_owner: Side::Opponent,
            active: SideArray { values: active },
            hp: SideArray::new(
                HpTable::from_roster(agent_roster, arena),
                HpTable::from_roster(opponent_roster, arena),
            ),
            dynamax: SideArray::new(view.dynamax(Side::Agent), view.dynamax(Side::Opponent)),
            action: None,
            parent: None,
            children: BumpVec::new_in(arena),
            score: None,
        })
    }

    /// Child of `parent` reached by `owner` playing `action`
    pub fn derive(
        parent: NodeRef<'a>,
        owner: Side,
        action: Action,
        effect: Effect,
        arena: &'a Bump,
    ) -> Result<Self, SnapshotError> {
        let p = parent.borrow();

        let mut hp = SideArray::new(p.hp[Side::Agent].copy_in(arena), p.hp[Side::Opponent].copy_in(arena));
        let mut active = p.active;
        let mut dynamax = p.dynamax;

        match effect {
            Effect::Damage { target, amount } => {
                if !hp[target.side].apply_damage(target.id, amount) {
                    return Err(SnapshotError::UnknownCombatant(target));
                }
            }
            Effect::Switch(slot) => {
                if !hp[slot.side].contains(slot.id) {
                    return Err(SnapshotError::UnknownCombatant(slot));
                }
                active[slot.side] = slot.id;
                // dynamax ends when the combatant leaves the field
                dynamax[slot.side].active = false;
            }
            Effect::None => {}
        }

        if let Action::Attack { dynamax: true, .. } = action {
            dynamax[owner] = dynamax[owner].spent();
        }

        Ok(Self {
            turn_owner: owner,
            active,
            hp,
            dynamax,
            action: Some(action),
            parent: Some(parent),
            children: BumpVec::new_in(arena),
            score: None,
        })
    }

    pub fn alloc(self, arena: &'a Bump) -> NodeRef<'a> {
        arena.alloc(RefCell::new(self))
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.action, Some(Action::Pass))
    }

    pub fn active_slot(&self, side: Side) -> Slot {
        Slot::new(side, self.active[side])
    }

    pub fn active_fainted(&self, side: Side) -> bool {
        self.hp[side].is_fainted(self.active[side])
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Scores are written once per search
    pub fn set_score(&mut self, score: f64) {
        debug_assert!(self.score.is_none(), "node scored twice");
        self.score = Some(score);
    }

    /// Highest-scoring child; the earliest generated wins ties
    pub fn best_child(&self) -> Option<NodeRef<'a>> {
        let mut best: Option<(NodeRef<'a>, f64)> = None;

        for child in self.children.iter() {
            let score = child.borrow().score.unwrap_or(f64::NEG_INFINITY);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((*child, score)),
            }
        }

        best.map(|(child, _)| child)
    }

    /// Number of plies between this node and the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent;
        while let Some(node) = current {
            depth += 1;
            current = node.borrow().parent;
        }
        depth
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("turn_owner", &self.turn_owner)
            .field("active", &self.active)
            .field("hp", &self.hp)
            .field("dynamax", &self.dynamax)
            .field("action", &self.action)
            .field("children", &self.children.len())
            .field("score", &self.score)
            .finish()
    }
}
