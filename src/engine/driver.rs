//! One decision per turn: build the tree, search it, emit the best child

use crate::ai::{graphviz::export_search_tree, EvalWeights, Evaluator, Generator, Minimax, Node, SearchStats};
use crate::core::{Action, BattleView, Order, Side};

use anyhow::{bail, Result};
use bumpalo::Bump;
use rand::{prelude::*, rngs::StdRng};
use std::str::FromStr;
use tracing::{debug, warn};

/// What to emit when the search leaves the agent with nothing to choose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// A uniformly random legal action, or the battle's default if there is none
    Random,
    /// Always the battle's default
    Default,
}

impl FromStr for FallbackPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(FallbackPolicy::Random),
            "default" => Ok(FallbackPolicy::Default),
            _ => bail!("Unknown fallback policy: {}", s),
        }
    }
}

/// State carried from one decision to the next
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnMemory {
    pub previous_action: Option<Action>,
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Full rounds searched below the root
    pub max_depth: usize,
    pub include_dynamax: bool,
    pub weights: EvalWeights,
    pub fallback: FallbackPolicy,
    /// Render the searched tree as DOT into the decision
    pub export_tree: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            include_dynamax: true,
            weights: EvalWeights::default(),
            fallback: FallbackPolicy::Random,
            export_tree: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Decision {
    pub order: Order,
    /// The searched action behind `order`; `None` when the fallback chose
    pub action: Option<Action>,
    /// Score of the chosen child
    pub score: Option<f64>,
    pub root_score: f64,
    /// The agent's active was down, so only switches were searched
    pub switch_only: bool,
    pub stats: SearchStats,
    pub tree: Option<String>,
}

/// Choose the agent's action for the position `view` describes.
///
/// The returned memory replaces `memory`: it holds the chosen action, or
/// nothing if the fallback had to choose.
pub fn decide<V: BattleView>(
    view: &V,
    config: &DriverConfig,
    memory: &TurnMemory,
    rng: &mut StdRng,
) -> Result<(Decision, TurnMemory)> {
    let arena = Bump::new();
    let root = Node::root(view, &arena)?.alloc(&arena);
    let switch_only = root.borrow().active_fainted(Side::Agent);

    let mut minimax = Minimax::new(
        Generator::new(view, &arena, config.include_dynamax),
        Evaluator::new(view, config.weights),
        config.max_depth,
    );

    let root_score = if switch_only {
        minimax.pick_best_switch(root, 0)?
    } else {
        minimax.search(root, 0, true)?
    };

    let tree = config.export_tree.then(|| export_search_tree(root));
    let best = root.borrow().best_child();

    let Some(best) = best else {
        warn!(previous = ?memory.previous_action, "no action to choose from, falling back");
        let order = fallback(view, config.fallback, rng);
        let decision = Decision {
            order,
            action: None,
            score: None,
            root_score,
            switch_only,
            stats: minimax.stats,
            tree,
        };
        return Ok((decision, TurnMemory::default()));
    };

    let best = best.borrow();
    let action = best.action.clone();
    let order = match &action {
        Some(action) => Order::from_action(action, &agent_names(view))?,
        None => bail!("Root child without an action"),
    };

    debug!(
        %order,
        root_score,
        switch_only,
        expanded = minimax.stats.expanded,
        evaluated = minimax.stats.evaluated,
        "decided"
    );

    let decision = Decision {
        order,
        action: action.clone(),
        score: best.score(),
        root_score,
        switch_only,
        stats: minimax.stats,
        tree,
    };

    Ok((decision, TurnMemory { previous_action: action }))
}

fn agent_names<V: BattleView>(view: &V) -> Vec<String> {
    view.roster(Side::Agent).into_iter().map(|mon| mon.name).collect()
}

fn fallback<V: BattleView>(view: &V, policy: FallbackPolicy, rng: &mut StdRng) -> Order {
    if policy == FallbackPolicy::Default {
        return Order::Default;
    }

    let names = agent_names(view);
    let mut orders: Vec<Order> = view
        .legal_moves()
        .into_iter()
        .map(|mv| Order::Move { id: mv.id, dynamax: false })
        .collect();
    orders.extend(
        view.legal_switches()
            .into_iter()
            .filter_map(|id| names.get(id.0).cloned())
            .map(Order::Switch),
    );

    orders.choose(rng).cloned().unwrap_or(Order::Default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MonId, ScriptedBattle, Slot};
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_decide_remembers_choice() {
        let battle: ScriptedBattle = "agent A hp=100/100 moves=tackle:40; opponent X hp=100/100 moves=bite:10"
            .parse()
            .unwrap();

        let (decision, memory) = decide(&battle, &DriverConfig::default(), &TurnMemory::default(), &mut rng()).unwrap();

        assert_eq!(decision.order, Order::Move { id: "tackle".to_string(), dynamax: false });
        assert_eq!(memory.previous_action, decision.action);
        assert!(decision.tree.is_none());
    }

    #[test]
    fn test_fallback_default_clears_memory() {
        let battle: ScriptedBattle = "agent A hp=100/100; opponent X hp=100/100 moves=bite:10".parse().unwrap();
        let memory = TurnMemory {
            previous_action: Some(Action::Switch(Slot::new(Side::Agent, MonId(0)))),
        };

        let (decision, memory) = decide(&battle, &DriverConfig::default(), &memory, &mut rng()).unwrap();

        assert_eq!(decision.order, Order::Default);
        assert_eq!(decision.action, None);
        assert_eq!(decision.root_score, f64::NEG_INFINITY);
        assert_eq!(memory, TurnMemory::default());
    }

    #[test]
    fn test_random_fallback_picks_legal_order() {
        // the opponent is already down, so the root is never expanded
        let battle: ScriptedBattle = "agent A hp=100/100 moves=tackle:10,growl:-; agent B hp=100/100; opponent X hp=0/100"
            .parse()
            .unwrap();

        let (decision, memory) = decide(&battle, &DriverConfig::default(), &TurnMemory::default(), &mut rng()).unwrap();

        let legal = [
            Order::Move { id: "tackle".to_string(), dynamax: false },
            Order::Move { id: "growl".to_string(), dynamax: false },
            Order::Switch("B".to_string()),
        ];
        assert!(legal.contains(&decision.order));
        assert_eq!(memory.previous_action, None);
    }

    #[test]
    fn test_fallback_without_legal_actions_is_default() {
        let battle: ScriptedBattle = "agent A hp=0/100 moves=tackle:10; agent B hp=0/100; opponent X hp=100/100 moves=bite:10"
            .parse()
            .unwrap();

        let (decision, _) = decide(&battle, &DriverConfig::default(), &TurnMemory::default(), &mut rng()).unwrap();

        assert!(decision.switch_only);
        assert_eq!(decision.order, Order::Default);
    }

    #[test]
    fn test_fallback_policy_parse() {
        assert_eq!("random".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Random);
        assert_eq!("default".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Default);
        assert!("sometimes".parse::<FallbackPolicy>().is_err());
    }

    #[test]
    fn test_export_tree_on_request() {
        let battle: ScriptedBattle = "agent A hp=100/100 moves=tackle:40; opponent X hp=100/100 moves=bite:10"
            .parse()
            .unwrap();
        let config = DriverConfig {
            export_tree: true,
            ..DriverConfig::default()
        };

        let (decision, _) = decide(&battle, &config, &TurnMemory::default(), &mut rng()).unwrap();

        assert!(decision.tree.unwrap().starts_with("digraph"));
    }
}
