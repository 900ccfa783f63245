//! Turn controller - orchestrates one discrete time step
//!
//! The canonical order: action, production, consumption, decay, cascades,
//! tension/disaster, dilemma roll, calendar, terminal check. Everything is
//! synchronous and single-threaded; the engine never blocks on input.
//!
//! Validation runs to completion before any mutation, so a rejected action
//! is a true no-op: no resources spent, no time advanced, and the caller may
//! resubmit.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::core::error::{EngineError, Result};
use crate::engine::Engine;
use crate::simulation::{cascade, consumption, dilemma, disaster};
use crate::simulation::dilemma::DilemmaState;
use crate::simulation::events::EventKind;

/// Terminal simulation states. Not failures: reaching one is the end of the
/// story, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Population reached zero or the tower is gone
    Extinct,
    /// The city survived to the victory year
    Victory,
}

/// What a successful `advance_turn` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    /// One full turn was simulated
    Advanced,
    /// The session was ended; state is untouched
    Quit,
}

/// Advance the simulation by exactly one turn
pub fn run_turn(engine: &mut Engine, action: Action) -> Result<TurnResult> {
    if matches!(action, Action::Quit) {
        return Ok(TurnResult::Quit);
    }
    if engine.outcome.is_some() {
        return Err(EngineError::AlreadyTerminal);
    }

    // 1. Validate fully, then apply. Apply cannot fail.
    //
    // A rejected action is reported through tracing, never through the
    // event log: the log is engine state, and a rejection must not mutate
    // anything.
    if let Err(e) = validate_action(engine, &action) {
        tracing::warn!(action = action.name(), error = %e, "action rejected");
        return Err(e);
    }
    engine
        .log
        .stamp(engine.calendar.year(), engine.calendar.month());
    apply_action(engine, &action);

    // 2. Production
    consumption::run_production(&engine.tower, &mut engine.ledger, &engine.config);

    // 3. Consumption, shortfall resolution, morale and migration
    consumption::run_consumption(
        &mut engine.tower,
        &mut engine.ledger,
        &engine.config,
        &mut engine.rng,
        &mut engine.log,
    );
    consumption::update_morale_and_population(
        &mut engine.ledger,
        &engine.config,
        &mut engine.rng,
        &mut engine.log,
        engine.calendar.month(),
    );

    // 4. Structural decay (fire damage rides along)
    engine.tower.decay(
        engine.config.base_decay,
        engine.config.high_level_decay_multiplier,
        engine.config.high_level_start,
        engine.config.fire_damage,
    );

    // 5. Cascade resolution
    cascade::spread_fires(
        &mut engine.tower,
        &engine.config,
        &mut engine.rng,
        &mut engine.log,
    );
    cascade::resolve_collapses(
        &mut engine.tower,
        &mut engine.ledger,
        &engine.config,
        &mut engine.log,
    );

    // 6. Tension and disasters
    run_disaster_phase(engine);

    // 7. Dilemma roll, only while idle
    if !engine.dilemma.is_pending() {
        if let Some(d) = dilemma::maybe_raise(&engine.tower, &engine.config, &mut engine.rng) {
            if let Some(level) = engine.tower.index_of(d.target) {
                engine.log.push(EventKind::DilemmaRaised { level });
            }
            engine.dilemma = DilemmaState::Pending(d);
        }
    }

    // 8. Advance the calendar
    engine.calendar.advance();
    engine
        .log
        .stamp(engine.calendar.year(), engine.calendar.month());

    // 9. Terminal check
    check_terminal(engine);

    Ok(TurnResult::Advanced)
}

/// Reject an action without touching any state
fn validate_action(engine: &Engine, action: &Action) -> Result<()> {
    let config = &engine.config;
    let ledger = &engine.ledger;

    match action {
        Action::Repair { level } => {
            let sector = engine.tower.get(*level).ok_or(EngineError::InvalidLevel {
                level: *level,
                reason: "no such level",
            })?;
            if sector.health >= 100.0 {
                return Err(EngineError::InvalidLevel {
                    level: *level,
                    reason: "already at full health",
                });
            }
            if ledger.materials < config.repair_cost as f32 {
                return Err(EngineError::InsufficientResources {
                    resource: "materials",
                    needed: config.repair_cost,
                    available: ledger.materials,
                });
            }
        }

        Action::Extinguish { level } => {
            let sector = engine.tower.get(*level).ok_or(EngineError::InvalidLevel {
                level: *level,
                reason: "no such level",
            })?;
            if !sector.on_fire {
                return Err(EngineError::InvalidLevel {
                    level: *level,
                    reason: "not on fire",
                });
            }
            if ledger.power < config.extinguish_cost as f32 {
                return Err(EngineError::InsufficientResources {
                    resource: "power",
                    needed: config.extinguish_cost,
                    available: ledger.power,
                });
            }
        }

        Action::Build { .. } => {
            if engine.tower.len() >= config.max_height {
                return Err(EngineError::InvalidAction(
                    "tower is at maximum height".to_string(),
                ));
            }
            if ledger.materials < config.build_cost as f32 {
                return Err(EngineError::InsufficientResources {
                    resource: "materials",
                    needed: config.build_cost,
                    available: ledger.materials,
                });
            }
        }

        Action::Festival => {
            if ledger.food < config.festival_food_cost as f32 {
                return Err(EngineError::InsufficientResources {
                    resource: "food",
                    needed: config.festival_food_cost,
                    available: ledger.food,
                });
            }
            if ledger.power < config.festival_power_cost as f32 {
                return Err(EngineError::InsufficientResources {
                    resource: "power",
                    needed: config.festival_power_cost,
                    available: ledger.power,
                });
            }
        }

        Action::EmergencyRations => {
            if ledger.population <= config.rations_min_population {
                return Err(EngineError::InvalidAction(format!(
                    "population too low to cull (need more than {})",
                    config.rations_min_population
                )));
            }
        }

        Action::ResolveDilemma { .. } => {
            if !engine.dilemma.is_pending() {
                return Err(EngineError::InvalidAction(
                    "no dilemma pending".to_string(),
                ));
            }
        }

        Action::Wait => {}

        // Handled before validation
        Action::Quit => {}
    }

    Ok(())
}

/// Apply a validated action. Infallible by construction.
fn apply_action(engine: &mut Engine, action: &Action) {
    let config = &engine.config;

    match action {
        Action::Repair { level } => {
            engine.ledger.materials -= config.repair_cost as f32;
            let sector = &mut engine.tower.sectors[*level];
            sector.health = (sector.health + config.repair_health).min(100.0);
            engine.log.push(EventKind::Repaired { level: *level });
        }

        Action::Extinguish { level } => {
            engine.ledger.power -= config.extinguish_cost as f32;
            engine.tower.sectors[*level].extinguish();
            engine.log.push(EventKind::Extinguished { level: *level });
        }

        Action::Build { kind } => {
            engine.ledger.materials -= config.build_cost as f32;
            let workers = engine
                .rng
                .gen_range(config.build_workers_min..=config.build_workers_max);
            let level = engine.tower.build(*kind, workers);
            engine.log.push(EventKind::Built {
                level,
                kind: *kind,
            });
        }

        Action::Festival => {
            engine.ledger.food -= config.festival_food_cost as f32;
            engine.ledger.power -= config.festival_power_cost as f32;
            engine.ledger.add_morale(config.festival_morale_gain);
            engine.log.push(EventKind::FestivalHeld);
        }

        Action::EmergencyRations => {
            let killed = engine.ledger.kill(config.rations_deaths);
            engine.ledger.food += config.rations_food_gain;
            engine.ledger.add_morale(-config.rations_morale_penalty);
            engine.log.push(EventKind::RationsCulled { killed });
        }

        Action::ResolveDilemma { choice } => {
            let state = std::mem::replace(&mut engine.dilemma, DilemmaState::Idle);
            if let DilemmaState::Pending(d) = state {
                dilemma::resolve(
                    &d,
                    *choice,
                    &mut engine.tower,
                    &mut engine.ledger,
                    &mut engine.log,
                );
            }
        }

        Action::Wait | Action::Quit => {}
    }
}

/// Accumulate tension and fire a disaster at the threshold, or a windfall
fn run_disaster_phase(engine: &mut Engine) {
    engine.ledger.tension += engine.config.tension_rate;
    engine.quiet_turns += 1;

    let crisis = if engine.ledger.tension >= engine.config.disaster_threshold {
        true
    } else if engine.quiet_turns > engine.config.pity_quiet_turns {
        engine.rng.gen::<f32>() < engine.config.pity_chance
    } else {
        false
    };

    if crisis {
        let kind = engine.forced_disaster.take().unwrap_or_else(|| {
            disaster::pick_disaster(&engine.config.disaster_weights, &mut engine.rng)
        });
        disaster::apply_disaster(
            kind,
            &mut engine.tower,
            &mut engine.ledger,
            &engine.config,
            &mut engine.rng,
            &mut engine.log,
        );
        engine.ledger.tension = 0.0;
        engine.quiet_turns = 0;
    } else {
        disaster::roll_minor_event(
            &mut engine.ledger,
            &engine.config,
            &mut engine.rng,
            &mut engine.log,
        );
    }

    engine.ledger.clamp();
}

fn check_terminal(engine: &mut Engine) {
    if engine.ledger.population == 0 || engine.tower.is_empty() {
        engine.outcome = Some(Outcome::Extinct);
        engine.log.push(EventKind::Extinction);
    } else if engine.calendar.year() >= engine.config.victory_year {
        engine.outcome = Some(Outcome::Victory);
        engine.log.push(EventKind::Victory {
            survivors: engine.ledger.population,
        });
    }
}
