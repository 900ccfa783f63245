//! Integration tests for cascade behavior across full turns
//!
//! Fire spread and collapse chains are the engine's hard part: these tests
//! run them through `advance_turn` so ordering against decay, consumption
//! and the disaster phase is exercised too.

use spire::actions::Action;
use spire::core::config::EngineConfig;
use spire::engine::Engine;
use spire::simulation::events::EventKind;
use spire::tower::{SectorKind, Tower};

fn quiet_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.minor_event_chance = 0.0;
    config.dilemma_chance = 0.0;
    config.pity_chance = 0.0;
    config
}

/// Engine with a bare tower and deep stockpiles so only structural
/// mechanics move the numbers.
fn rig(seed: u64, levels: &[(SectorKind, u32)]) -> Engine {
    let mut engine = Engine::new(quiet_config(), seed).expect("valid config");
    engine.tower = Tower::new();
    for (kind, workers) in levels {
        engine.tower.build(*kind, *workers);
    }
    engine.ledger.food = 100_000.0;
    engine.ledger.power = 100_000.0;
    engine
}

#[test]
fn test_collapse_chain_settles_within_one_turn() {
    let mut engine = rig(
        3,
        &[
            (SectorKind::Power, 10),
            (SectorKind::Farm, 5),
            (SectorKind::Housing, 5),
        ],
    );
    // Top is dead; the middle is weak enough that collapse damage chains
    engine.tower.get_mut(2).unwrap().health = 0.0;
    engine.tower.get_mut(1).unwrap().health = 30.0;
    let population_before = engine.ledger.population;

    engine.advance_turn(Action::Wait).expect("turn advances");

    assert_eq!(engine.tower.len(), 1, "chain claims two levels in one turn");
    assert_eq!(engine.tower.get(0).unwrap().kind, SectorKind::Power);
    // Base took decay then one hit of collapse damage
    let base_health = engine.tower.get(0).unwrap().health;
    assert!((base_health - 58.5).abs() < 1e-3, "got {}", base_health);
    assert_eq!(engine.ledger.population, population_before - 10);

    let collapses = engine
        .log
        .entries()
        .iter()
        .filter(|e| matches!(e.kind, EventKind::SectorCollapsed { .. }))
        .count();
    assert_eq!(collapses, 2, "each sector collapses exactly once");
}

#[test]
fn test_unattended_fire_burns_out_on_schedule() {
    let mut engine = rig(3, &[(SectorKind::Housing, 0)]);
    engine.tower.get_mut(0).unwrap().ignite();

    for _ in 0..6 {
        engine.advance_turn(Action::Wait).expect("turn advances");
    }

    let sector = engine.tower.get(0).unwrap();
    assert!(!sector.on_fire, "fire burned out after 6 turns");
    // 6 turns of base decay plus fire damage while burning
    assert!((sector.health - 43.0).abs() < 1e-3, "got {}", sector.health);
    assert!(engine
        .log
        .entries()
        .iter()
        .any(|e| matches!(e.kind, EventKind::FireBurnedOut { level: 0 })));
}

#[test]
fn test_guaranteed_fire_spread_reaches_neighbors() {
    let mut config = quiet_config();
    config.fire_spread_chance = 1.0;
    config.fire_ignite_chance = 1.0;

    let mut engine = Engine::new(config, 3).expect("valid config");
    engine.tower = Tower::new();
    for _ in 0..3 {
        engine.tower.build(SectorKind::Housing, 0);
    }
    engine.ledger.food = 100_000.0;
    engine.ledger.power = 100_000.0;
    engine.tower.get_mut(1).unwrap().ignite();

    // Two turns under the spread delay: contained
    for _ in 0..2 {
        engine.advance_turn(Action::Wait).expect("turn advances");
    }
    assert!(!engine.tower.get(0).unwrap().on_fire);
    assert!(!engine.tower.get(2).unwrap().on_fire);

    // Third turn crosses the delay and both neighbors catch
    engine.advance_turn(Action::Wait).expect("turn advances");
    assert!(engine.tower.get(0).unwrap().on_fire);
    assert!(engine.tower.get(2).unwrap().on_fire);
    assert_eq!(
        engine.tower.get(0).unwrap().fire_turns,
        0,
        "fresh fires have not aged yet"
    );
}

#[test]
fn test_fire_dies_with_its_sector() {
    let mut engine = rig(
        3,
        &[(SectorKind::Power, 5), (SectorKind::Housing, 5)],
    );
    let top = engine.tower.get_mut(1).unwrap();
    top.ignite();
    top.health = 5.0;

    // Decay + fire damage push the burning sector to collapse this turn
    engine.advance_turn(Action::Wait).expect("turn advances");

    assert_eq!(engine.tower.len(), 1);
    assert!(
        engine.tower.sectors.iter().all(|s| !s.on_fire),
        "fire cannot exist on a removed sector"
    );
}

#[test]
fn test_cursor_follows_a_shrinking_tower() {
    let mut engine = rig(
        3,
        &[
            (SectorKind::Power, 5),
            (SectorKind::Farm, 5),
            (SectorKind::Housing, 5),
        ],
    );
    engine.select_level(100);
    assert_eq!(engine.tower.cursor(), 2);

    engine.tower.get_mut(2).unwrap().health = 0.0;
    engine.advance_turn(Action::Wait).expect("turn advances");

    assert_eq!(engine.tower.len(), 2);
    assert!(engine.tower.cursor() <= 1, "cursor clamped into the tower");
}

#[test]
fn test_blackout_damage_feeds_the_cascade() {
    // Power shortfall damages a sector; if that pushes it under, the same
    // turn's cascade must clean it up.
    let mut engine = rig(3, &[(SectorKind::Housing, 5)]);
    engine.ledger.power = 0.0;
    engine.tower.get_mut(0).unwrap().health = 24.0;

    engine.advance_turn(Action::Wait).expect("turn advances");

    // 24 - 25 blackout - 1.5 decay is below zero: the tower is gone and the
    // turn ends in extinction rather than exposing a dead sector.
    assert!(engine.tower.is_empty());
    assert!(engine.is_over());
}
