//! Depth-limited minimax over agent and opponent plies

use super::eval::Evaluator;
use super::generator::Generator;
use super::node::{Node, NodeRef};
use crate::core::{BattleView, Side, SnapshotError};

use tracing::trace;

/// Counters for one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose children were generated
    pub expanded: u32,
    /// Nodes scored by the evaluator
    pub evaluated: u32,
}

/// A battle is over once either roster is entirely at or below zero HP
pub fn is_terminal(node: &Node<'_>) -> bool {
    node.hp[Side::Agent].all_fainted() || node.hp[Side::Opponent].all_fainted()
}

/// Minimax where one unit of depth is a full round: the agent's ply
/// followed by the opponent's
pub struct Minimax<'a, V: BattleView> {
    generator: Generator<'a, V>,
    evaluator: Evaluator<'a, V>,
    max_depth: usize,
    pub stats: SearchStats,
}

impl<'a, V: BattleView> Minimax<'a, V> {
    pub fn new(generator: Generator<'a, V>, evaluator: Evaluator<'a, V>, max_depth: usize) -> Self {
        Self {
            generator,
            evaluator,
            max_depth,
            stats: SearchStats::default(),
        }
    }

    /// Score `node`, writing a score to every node visited on the way.
    ///
    /// An agent with no children scores negative infinity; the caller sees
    /// the empty child list and handles it. An opponent with nothing to do
    /// also scores negative infinity, without recursing.
    pub fn search(&mut self, node: NodeRef<'a>, depth: usize, maximizing: bool) -> Result<f64, SnapshotError> {
        if depth >= self.max_depth || is_terminal(&node.borrow()) {
            self.stats.evaluated += 1;
            return Ok(self.evaluator.evaluate(&mut node.borrow_mut()));
        }

        let score = if maximizing {
            let children = self.expand(node, Side::Agent)?;

            let mut best = f64::NEG_INFINITY;
            for child in children {
                best = best.max(self.search(child, depth, false)?);
            }
            best
        } else {
            let children = self.expand(node, Side::Opponent)?;

            if children.iter().any(|child| child.borrow().is_pass()) {
                f64::NEG_INFINITY
            } else {
                let mut worst = f64::INFINITY;
                for child in children {
                    worst = worst.min(self.search(child, depth + 1, true)?);
                }
                worst
            }
        };

        trace!(depth, maximizing, score, "scored node");
        node.borrow_mut().set_score(score);
        Ok(score)
    }

    /// Entry used when the agent's active combatant is down: only switches
    /// are possible, and each is answered by the opponent
    pub fn pick_best_switch(&mut self, node: NodeRef<'a>, depth: usize) -> Result<f64, SnapshotError> {
        self.stats.expanded += 1;
        let switches = self.generator.generate_switches(node, Side::Agent)?;

        let mut best = f64::NEG_INFINITY;
        for switch in switches {
            best = best.max(self.search(switch, depth, false)?);
        }

        node.borrow_mut().set_score(best);
        Ok(best)
    }

    fn expand(&mut self, node: NodeRef<'a>, side: Side) -> Result<Vec<NodeRef<'a>>, SnapshotError> {
        self.stats.expanded += 1;
        self.generator.generate(node, side)
    }
}
