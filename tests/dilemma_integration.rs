//! Integration tests for the dilemma state machine through full turns

use spire::actions::Action;
use spire::core::config::EngineConfig;
use spire::core::error::EngineError;
use spire::engine::Engine;
use spire::simulation::dilemma::DilemmaChoice;
use spire::tower::{SectorKind, Tower};

/// Engine guaranteed to raise a dilemma on the first turn: a failing sector
/// and a generation chance of 1.
fn rigged_engine(seed: u64) -> Engine {
    let mut config = EngineConfig::default();
    config.minor_event_chance = 0.0;
    config.pity_chance = 0.0;
    config.dilemma_chance = 1.0;

    let mut engine = Engine::new(config, seed).expect("valid config");
    engine.tower = Tower::new();
    engine.tower.build(SectorKind::Power, 10);
    engine.tower.build(SectorKind::Housing, 10);
    engine.tower.get_mut(1).unwrap().health = 45.0;
    engine.ledger.food = 100_000.0;
    engine.ledger.power = 100_000.0;
    engine
}

#[test]
fn test_dilemma_raised_when_a_sector_is_failing() {
    let mut engine = rigged_engine(11);

    engine.advance_turn(Action::Wait).expect("turn advances");

    assert!(engine.dilemma.is_pending());
    let snapshot = engine.snapshot(5);
    let view = snapshot.dilemma.expect("snapshot exposes the dilemma");
    assert!(view.title.contains("Level 1"));
    assert!(!view.option_a.is_empty() && !view.option_b.is_empty());
}

#[test]
fn test_pending_dilemma_is_an_overlay_not_a_lockout() {
    let mut engine = rigged_engine(11);
    engine.advance_turn(Action::Wait).expect("raise turn");
    let pending = engine.dilemma.pending().expect("pending").clone();

    // Ordinary actions stay legal while the dilemma waits
    engine
        .advance_turn(Action::Repair { level: 0 })
        .expect("repair runs under a pending dilemma");

    // And no second dilemma was generated meanwhile
    assert_eq!(engine.dilemma.pending(), Some(&pending));
}

#[test]
fn test_resolve_without_pending_dilemma_is_rejected() {
    let mut config = EngineConfig::default();
    config.dilemma_chance = 0.0;
    let mut engine = Engine::new(config, 11).unwrap();

    let result = engine.advance_turn(Action::ResolveDilemma {
        choice: DilemmaChoice::A,
    });
    assert!(matches!(result, Err(EngineError::InvalidAction(_))));
}

#[test]
fn test_reinforce_restores_the_target() {
    let mut engine = rigged_engine(11);
    engine.advance_turn(Action::Wait).expect("raise turn");
    let materials_before = engine.ledger.materials;
    let health_before = engine.tower.get(1).unwrap().health;

    engine
        .advance_turn(Action::ResolveDilemma {
            choice: DilemmaChoice::A,
        })
        .expect("resolution runs");

    assert!(!engine.dilemma.is_pending(), "machine returns to idle");
    let health_after = engine.tower.get(1).unwrap().health;
    assert!(
        health_after > health_before,
        "reinforcement outruns one turn of decay ({} -> {})",
        health_before,
        health_after
    );
    assert!((materials_before - engine.ledger.materials - 50.0).abs() < 1e-3);
}

#[test]
fn test_evacuate_dooms_the_target() {
    let mut engine = rigged_engine(11);
    engine.advance_turn(Action::Wait).expect("raise turn");
    let population_before = engine.ledger.population;

    engine
        .advance_turn(Action::ResolveDilemma {
            choice: DilemmaChoice::B,
        })
        .expect("resolution runs");

    // The abandoned level collapses within the same turn
    assert_eq!(engine.tower.len(), 1);
    assert_eq!(engine.tower.get(0).unwrap().kind, SectorKind::Power);
    // 30% of 10 trapped workers die in the evacuation; the rest got out
    // before the collapse
    assert_eq!(engine.ledger.population, population_before - 3);

    // The collapse battered the base below the damage threshold, so the
    // same turn's generation roll raised a fresh dilemma for it
    let next = engine.dilemma.pending().expect("follow-up dilemma");
    assert!(next.title.contains("Level 0"));
}
