//! Static evaluation of search leaves

use super::node::Node;
use crate::core::{BattleView, MonStatus, Side, SideArray};

const MATCHUP_EPS: f64 = 1e-9;

/// Weights of the linear leaf heuristic. The last three terms are off
/// unless given a non-zero weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalWeights {
    /// Per opponent combatant knocked out
    pub knockout_bonus: f64,
    /// Per point of HP taken from the opponent
    pub damage_dealt: f64,
    /// Per agent combatant knocked out
    pub knockout_penalty: f64,
    /// Per fraction of max HP the agent loses
    pub damage_taken: f64,
    /// Charged when the opponent's active outspeeds ours
    pub speed_penalty: f64,
    /// Unit of the type matchup term: x4 costs 2 units, x2 one, x0.5 earns one, x0.25 two
    pub type_matchup: f64,
    /// Charged once the agent has spent its dynamax
    pub dynamax_penalty: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            knockout_bonus: 300.0,
            damage_dealt: 3.0,
            knockout_penalty: 100.0,
            damage_taken: 1.0,
            speed_penalty: 0.0,
            type_matchup: 0.0,
            dynamax_penalty: 0.0,
        }
    }
}

impl EvalWeights {
    /// Default weights with the positional terms switched on
    pub fn with_positional_terms() -> Self {
        Self {
            speed_penalty: 25.0,
            type_matchup: 25.0,
            dynamax_penalty: 25.0,
            ..Self::default()
        }
    }
}

/// Scores nodes against the HP the battle reported when the tree was built
pub struct Evaluator<'a, V: BattleView> {
    view: &'a V,
    weights: EvalWeights,
    live: SideArray<Vec<MonStatus>>,
    agent_could_dynamax: bool,
}

impl<'a, V: BattleView> Evaluator<'a, V> {
    pub fn new(view: &'a V, weights: EvalWeights) -> Self {
        Self {
            view,
            weights,
            live: SideArray::new(view.roster(Side::Agent), view.roster(Side::Opponent)),
            agent_could_dynamax: view.dynamax(Side::Agent).can_dynamax(),
        }
    }

    /// Score `node` and record the score on it
    pub fn evaluate(&self, node: &mut Node<'_>) -> f64 {
        let score = self.score(node);
        node.set_score(score);
        score
    }

    pub fn score(&self, node: &Node<'_>) -> f64 {
        let w = &self.weights;
        let mut score = 0.0;

        for (id, hp) in node.hp[Side::Opponent].iter() {
            let Some(live) = self.live[Side::Opponent].get(id.0) else {
                continue;
            };
            if hp <= 0 && live.hp > 0 {
                score += w.knockout_bonus;
            } else {
                // HP below zero is not worth anything
                score += w.damage_dealt * (live.hp.max(0) - hp.max(0)) as f64;
            }
        }

        for (id, hp) in node.hp[Side::Agent].iter() {
            let Some(live) = self.live[Side::Agent].get(id.0) else {
                continue;
            };
            if hp <= 0 && live.hp > 0 {
                score -= w.knockout_penalty;
            } else if live.max_hp > 0 {
                let lost = (live.hp.max(0) - hp.max(0)) as f64 / live.max_hp as f64;
                score -= w.damage_taken * lost;
            }
        }

        score + self.positional(node)
    }

    fn positional(&self, node: &Node<'_>) -> f64 {
        let w = &self.weights;
        let ours = node.active_slot(Side::Agent);
        let theirs = node.active_slot(Side::Opponent);
        let mut score = 0.0;

        if w.speed_penalty != 0.0 && self.view.outspeeds(theirs, ours) {
            score -= w.speed_penalty;
        }

        if w.type_matchup != 0.0 {
            score += w.type_matchup * matchup_units(self.view.type_multiplier(ours, theirs));
        }

        if w.dynamax_penalty != 0.0 && self.agent_could_dynamax && node.dynamax[Side::Agent].active {
            score -= w.dynamax_penalty;
        }

        score
    }
}

fn matchup_units(multiplier: f64) -> f64 {
    let is = |x: f64| (multiplier - x).abs() < MATCHUP_EPS;

    if is(4.0) {
        -2.0
    } else if is(2.0) {
        -1.0
    } else if is(0.5) {
        1.0
    } else if is(0.25) {
        2.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::node::{Effect, NodeRef};
    use crate::core::{Action, MonId, Move, ScriptedBattle, Slot};
    use bumpalo::Bump;
    use test_case::test_case;

    fn hit<'a>(parent: NodeRef<'a>, target: Slot, amount: i32, arena: &'a Bump) -> NodeRef<'a> {
        let action = Action::Attack {
            mv: Move::new("hit", Some(1), None),
            target,
            dynamax: false,
        };
        Node::derive(parent, !target.side, action, Effect::Damage { target, amount }, arena)
            .unwrap()
            .alloc(arena)
    }

    const BATTLE: &str = "agent A hp=80/100 spd=10 types=grass; agent B hp=100/100; opponent X hp=10/100 spd=20 types=fire";

    #[test]
    fn test_knockout_bonus_replaces_damage_term() {
        let battle: ScriptedBattle = BATTLE.parse().unwrap();
        let arena = Bump::new();
        let root = Node::root(&battle, &arena).unwrap().alloc(&arena);
        let evaluator = Evaluator::new(&battle, EvalWeights::default());

        let x = Slot::new(Side::Opponent, MonId(0));
        let ko = hit(root, x, 15, &arena);
        let chip = hit(root, x, 6, &arena);

        assert_eq!(evaluator.score(&ko.borrow()), 300.0);
        assert_eq!(evaluator.score(&chip.borrow()), 18.0);
    }

    #[test]
    fn test_agent_losses_are_fractional() {
        let battle: ScriptedBattle = BATTLE.parse().unwrap();
        let arena = Bump::new();
        let root = Node::root(&battle, &arena).unwrap().alloc(&arena);
        let evaluator = Evaluator::new(&battle, EvalWeights::default());

        let a = Slot::new(Side::Agent, MonId(0));
        let hurt = hit(root, a, 40, &arena);
        let fainted = hit(root, a, 90, &arena);

        assert!((evaluator.score(&hurt.borrow()) + 0.4).abs() < 1e-9);
        assert_eq!(evaluator.score(&fainted.borrow()), -100.0);
    }

    #[test]
    fn test_hits_on_fainted_combatants_are_worthless() {
        let battle: ScriptedBattle = "agent A hp=0/100; agent B hp=100/100; opponent X hp=0/100; opponent Y hp=100/100"
            .parse()
            .unwrap();
        let arena = Bump::new();
        let root = Node::root(&battle, &arena).unwrap().alloc(&arena);
        let evaluator = Evaluator::new(&battle, EvalWeights::default());

        let on_x = hit(root, Slot::new(Side::Opponent, MonId(0)), 40, &arena);
        let on_a = hit(root, Slot::new(Side::Agent, MonId(0)), 40, &arena);

        assert_eq!(evaluator.score(&on_x.borrow()), 0.0);
        assert_eq!(evaluator.score(&on_a.borrow()), 0.0);
    }

    #[test]
    fn test_evaluate_records_score() {
        let battle: ScriptedBattle = BATTLE.parse().unwrap();
        let arena = Bump::new();
        let root = Node::root(&battle, &arena).unwrap().alloc(&arena);
        let evaluator = Evaluator::new(&battle, EvalWeights::default());

        let score = evaluator.evaluate(&mut root.borrow_mut());
        assert_eq!(score, 0.0);
        assert_eq!(root.borrow().score(), Some(0.0));
    }

    #[test]
    fn test_knockout_bonus_is_monotonic() {
        let battle: ScriptedBattle = BATTLE.parse().unwrap();
        let arena = Bump::new();
        let root = Node::root(&battle, &arena).unwrap().alloc(&arena);
        let ko = hit(root, Slot::new(Side::Opponent, MonId(0)), 15, &arena);

        let low = Evaluator::new(&battle, EvalWeights::default());
        let high = Evaluator::new(&battle, EvalWeights { knockout_bonus: 301.0, ..EvalWeights::default() });

        assert!(high.score(&ko.borrow()) > low.score(&ko.borrow()));
    }

    #[test]
    fn test_positional_terms() {
        let battle: ScriptedBattle = BATTLE.parse().unwrap();
        let arena = Bump::new();
        let root = Node::root(&battle, &arena).unwrap();

        // slower, and fire hits grass for x2: -25 speed, -25 matchup
        let evaluator = Evaluator::new(&battle, EvalWeights::with_positional_terms());
        assert_eq!(evaluator.score(&root), -50.0);
    }

    #[test]
    fn test_dynamax_penalty_only_after_spending() {
        let battle: ScriptedBattle = "agent A hp=10/10; opponent X hp=10/10; dynamax agent available".parse().unwrap();
        let arena = Bump::new();
        let root = Node::root(&battle, &arena).unwrap().alloc(&arena);
        let weights = EvalWeights {
            dynamax_penalty: 25.0,
            ..EvalWeights::default()
        };
        let evaluator = Evaluator::new(&battle, weights);

        let x = Slot::new(Side::Opponent, MonId(0));
        let action = Action::Attack {
            mv: Move::new("max", Some(1), None),
            target: x,
            dynamax: true,
        };
        let spent = Node::derive(root, Side::Agent, action, Effect::Damage { target: x, amount: 0 }, &arena).unwrap();

        assert_eq!(evaluator.score(&root.borrow()), 0.0);
        assert_eq!(evaluator.score(&spent), -25.0);
    }

    #[test_case(4.0, -2.0)]
    #[test_case(2.0, -1.0)]
    #[test_case(1.0, 0.0)]
    #[test_case(0.5, 1.0)]
    #[test_case(0.25, 2.0)]
    #[test_case(0.0, 0.0)]
    fn test_matchup_units(multiplier: f64, expected: f64) {
        assert_eq!(matchup_units(multiplier), expected);
    }
}
