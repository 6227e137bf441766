use duelist::core::{Action, MonId, Order, ScriptedBattle, Side, SnapshotError};
use duelist::engine::{decide, DriverConfig, FallbackPolicy, TurnMemory};
use duelist::utils::seeded_rng;

use indoc::indoc;

fn run(battle: &ScriptedBattle, config: &DriverConfig, memory: &TurnMemory) -> (duelist::engine::Decision, TurnMemory) {
    decide(battle, config, memory, &mut seeded_rng(11)).unwrap()
}

#[test]
fn test_knockout_is_chosen() {
    let battle: ScriptedBattle = indoc! {"
        agent A hp=100/100 moves=strike:15
        agent B hp=100/100 moves=strike:15
        opponent X hp=10/100 moves=bite:20
    "}
    .parse()
    .unwrap();

    let (decision, memory) = run(&battle, &DriverConfig::default(), &TurnMemory::default());

    assert_eq!(decision.order, Order::Move { id: "strike".to_string(), dynamax: false });
    assert_eq!(decision.order.to_string(), "move strike");
    assert_eq!(decision.score, Some(300.0));
    assert_eq!(decision.root_score, 300.0);
    assert!(matches!(memory.previous_action, Some(Action::Attack { .. })));
}

#[test]
fn test_no_legal_action_falls_back_to_default() {
    let battle: ScriptedBattle = "agent A hp=100/100; opponent X hp=100/100 moves=bite:10; noswitch"
        .parse()
        .unwrap();
    let remembered = TurnMemory {
        previous_action: Some(Action::Pass),
    };
    let config = DriverConfig {
        fallback: FallbackPolicy::Default,
        ..DriverConfig::default()
    };

    let (decision, memory) = run(&battle, &config, &remembered);

    assert_eq!(decision.order, Order::Default);
    assert_eq!(decision.order.to_string(), "default");
    assert_eq!(memory.previous_action, None);
}

#[test]
fn test_ties_go_to_the_first_action() {
    let battle: ScriptedBattle = "agent A hp=100/100 moves=first:10,second:10; opponent X hp=100/100 moves=bite:10"
        .parse()
        .unwrap();

    let (decision, _) = run(&battle, &DriverConfig::default(), &TurnMemory::default());

    assert_eq!(decision.order.to_string(), "move first");
}

#[test]
fn test_fainted_active_only_switches() {
    let battle: ScriptedBattle = indoc! {"
        agent A hp=0/100 moves=strike:15
        agent B hp=100/100 types=grass moves=strike:15
        agent C hp=100/100 types=water moves=strike:15
        opponent X hp=100/100 moves=ember:40:fire
    "}
    .parse()
    .unwrap();

    let (decision, memory) = run(&battle, &DriverConfig::default(), &TurnMemory::default());

    assert!(decision.switch_only);
    assert_eq!(decision.order, Order::Switch("C".to_string()));
    assert!(memory.previous_action.as_ref().is_some_and(Action::is_switch));
}

#[test]
fn test_dynamax_variant_emitted() {
    let battle: ScriptedBattle = indoc! {"
        agent A hp=100/100 moves=strike:60
        opponent X hp=80/100 moves=bite:10
        dynamax agent available
    "}
    .parse()
    .unwrap();

    let (decision, _) = run(&battle, &DriverConfig::default(), &TurnMemory::default());
    assert_eq!(decision.order.to_string(), "move strike dynamax");

    let config = DriverConfig {
        include_dynamax: false,
        ..DriverConfig::default()
    };
    let (decision, _) = run(&battle, &config, &TurnMemory::default());
    assert_eq!(decision.order.to_string(), "move strike");
}

#[test]
fn test_decisions_are_deterministic() {
    let battle: ScriptedBattle = indoc! {"
        agent A hp=70/100 spd=80 types=water moves=surf:90:water,tackle:40:normal
        agent B hp=100/100 spd=60 types=grass moves=leafblade:90:grass
        opponent X hp=100/100 spd=70 types=fire moves=flamethrower:90:fire,bite:60:dark
        opponent Y hp=100/100 spd=50 types=rock moves=rockslide:75:rock
        dynamax agent available
    "}
    .parse()
    .unwrap();
    let config = DriverConfig {
        max_depth: 2,
        ..DriverConfig::default()
    };

    let (first, _) = run(&battle, &config, &TurnMemory::default());
    let (second, _) = run(&battle, &config, &TurnMemory::default());

    assert_eq!(first.order, second.order);
    assert_eq!(first.root_score, second.root_score);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_malformed_snapshot_is_rejected() {
    let mut battle: ScriptedBattle = "agent A hp=100/100 moves=strike:15; opponent X hp=100/100".parse().unwrap();
    battle.active[Side::Opponent] = Some(MonId(4));

    let err = decide(&battle, &DriverConfig::default(), &TurnMemory::default(), &mut seeded_rng(11)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SnapshotError>(),
        Some(SnapshotError::UnknownCombatant(slot)) if slot.side == Side::Opponent
    ));
}
