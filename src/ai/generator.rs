//! Move and switch generation

use super::node::{Effect, Node, NodeRef};
use crate::core::{Action, BattleView, MonId, Move, Side, Slot, SnapshotError};

use bumpalo::Bump;
use derive_where::derive_where;
use std::vec::Vec as StdVec;
use tracing::trace;

/// Expands nodes into the positions reachable in one ply
#[derive_where(Clone, Copy)]
pub struct Generator<'a, V: BattleView> {
    view: &'a V,
    arena: &'a Bump,
    include_dynamax: bool,
}

impl<'a, V: BattleView> Generator<'a, V> {
    pub fn new(view: &'a V, arena: &'a Bump, include_dynamax: bool) -> Self {
        Self {
            view,
            arena,
            include_dynamax,
        }
    }

    /// Children for `perspective` moving from `node`: attacks and switches
    /// for the agent, attacks for the opponent, forced switches for a side
    /// whose active combatant has fainted. An opponent with nothing to do
    /// yields a single pass child already scored as the worst case.
    pub fn generate(&self, node: NodeRef<'a>, perspective: Side) -> Result<StdVec<NodeRef<'a>>, SnapshotError> {
        if let Some(existing) = Self::existing(node) {
            return Ok(existing);
        }

        let (fainted, is_root) = {
            let n = node.borrow();
            (n.active_fainted(perspective), n.is_root())
        };

        let children = if fainted {
            self.switch_children(node, perspective, is_root)?
        } else {
            match perspective {
                Side::Agent => self.agent_children(node, is_root)?,
                Side::Opponent => self.opponent_children(node)?,
            }
        };

        Ok(self.attach(node, perspective, children))
    }

    /// Forced replacement of `side`'s active combatant; switching deals no damage
    pub fn generate_switches(&self, node: NodeRef<'a>, side: Side) -> Result<StdVec<NodeRef<'a>>, SnapshotError> {
        if let Some(existing) = Self::existing(node) {
            return Ok(existing);
        }

        let is_root = node.borrow().is_root();
        let children = self.switch_children(node, side, is_root)?;

        Ok(self.attach(node, side, children))
    }

    fn existing(node: NodeRef<'a>) -> Option<StdVec<NodeRef<'a>>> {
        let n = node.borrow();
        (!n.children.is_empty()).then(|| n.children.iter().copied().collect())
    }

    fn attach(&self, node: NodeRef<'a>, perspective: Side, children: StdVec<Node<'a>>) -> StdVec<NodeRef<'a>> {
        let refs: StdVec<NodeRef<'a>> = children
            .into_iter()
            .map(|child| child.alloc(self.arena))
            .collect();

        node.borrow_mut().children.extend(refs.iter().copied());
        trace!(side = %perspective, children = refs.len(), "expanded node");

        refs
    }

    fn agent_children(&self, node: NodeRef<'a>, is_root: bool) -> Result<StdVec<Node<'a>>, SnapshotError> {
        let (active, can_dynamax) = {
            let n = node.borrow();
            (n.active_slot(Side::Agent), n.dynamax[Side::Agent].can_dynamax())
        };

        let moves = if is_root {
            self.view.legal_moves()
        } else {
            self.view.known_moves(active)
        };

        let mut children = self.attack_children(node, Side::Agent, &moves, can_dynamax)?;
        children.extend(self.switch_children(node, Side::Agent, is_root)?);

        Ok(children)
    }

    fn opponent_children(&self, node: NodeRef<'a>) -> Result<StdVec<Node<'a>>, SnapshotError> {
        let (active, can_dynamax) = {
            let n = node.borrow();
            (n.active_slot(Side::Opponent), n.dynamax[Side::Opponent].can_dynamax())
        };

        let moves = self.view.known_moves(active);
        if moves.is_empty() {
            let mut pass = Node::derive(node, Side::Opponent, Action::Pass, Effect::None, self.arena)?;
            pass.set_score(f64::NEG_INFINITY);
            return Ok(vec![pass]);
        }

        self.attack_children(node, Side::Opponent, &moves, can_dynamax)
    }

    /// One child per move, then the dynamax variants when the side may still dynamax
    fn attack_children(
        &self,
        node: NodeRef<'a>,
        side: Side,
        moves: &[Move],
        can_dynamax: bool,
    ) -> Result<StdVec<Node<'a>>, SnapshotError> {
        let (attacker, defender, attacker_dynamaxed) = {
            let n = node.borrow();
            (n.active_slot(side), n.active_slot(!side), n.dynamax[side].active)
        };

        let variants: &[bool] = if self.include_dynamax && can_dynamax {
            &[false, true]
        } else {
            &[false]
        };

        let mut children = StdVec::with_capacity(moves.len() * variants.len());
        for &dynamax in variants {
            for mv in moves {
                let amount = self.damage(mv, attacker, defender, dynamax || attacker_dynamaxed);
                let action = Action::Attack {
                    mv: mv.clone(),
                    target: defender,
                    dynamax,
                };
                let effect = Effect::Damage {
                    target: defender,
                    amount,
                };
                children.push(Node::derive(node, side, action, effect, self.arena)?);
            }
        }

        Ok(children)
    }

    fn switch_children(&self, node: NodeRef<'a>, side: Side, is_root: bool) -> Result<StdVec<Node<'a>>, SnapshotError> {
        let targets: StdVec<MonId> = {
            let n = node.borrow();
            let active = n.active[side];
            let hp = &n.hp[side];

            if is_root && side == Side::Agent {
                self.view
                    .legal_switches()
                    .into_iter()
                    .filter(|id| *id != active && !hp.is_fainted(*id))
                    .collect()
            } else {
                hp.alive().filter(|id| *id != active).collect()
            }
        };

        targets
            .into_iter()
            .map(|id| {
                let slot = Slot::new(side, id);
                Node::derive(node, side, Action::Switch(slot), Effect::Switch(slot), self.arena)
            })
            .collect()
    }

    /// Moves without a base power, or that the battle cannot simulate, deal nothing
    fn damage(&self, mv: &Move, attacker: Slot, defender: Slot, dynamax: bool) -> i32 {
        if mv.base_power.is_none() {
            return 0;
        }

        self.view
            .simulate_damage(mv, attacker, defender, dynamax)
            .unwrap_or(0)
    }
}
