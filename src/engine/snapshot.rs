//! Read-only state snapshot for collaborators
//!
//! The engine is mutated only inside `advance_turn`; collaborators (UI
//! panels, AI scripts) get an owned copy of everything they may render or
//! reason about. Taking a snapshot between turns is the whole concurrency
//! story: nothing here aliases live engine state.

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::simulation::tick::Outcome;
use crate::tower::SectorKind;

/// One sector as a collaborator sees it
///
/// `damaged` and `critical` are included pre-derived so consumers never
/// reimplement the thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorView {
    pub level: usize,
    pub kind: SectorKind,
    pub health: f32,
    pub workers: u32,
    pub on_fire: bool,
    pub damaged: bool,
    pub critical: bool,
}

/// A pending dilemma as presented to the decision-maker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilemmaView {
    pub title: String,
    pub description: String,
    pub option_a: String,
    pub option_b: String,
}

/// Owned copy of everything a collaborator can observe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub year: u32,
    pub month: u32,
    pub population: u32,
    pub food: f32,
    pub power: f32,
    pub materials: f32,
    pub morale: f32,
    pub tension: f32,
    pub cursor: usize,
    pub sectors: Vec<SectorView>,
    /// Trailing slice of the event log, rendered to text, oldest first
    pub events: Vec<String>,
    pub dilemma: Option<DilemmaView>,
    pub outcome: Option<Outcome>,
}

impl Snapshot {
    pub fn capture(engine: &Engine, recent_events: usize) -> Self {
        let sectors = engine
            .tower
            .sectors
            .iter()
            .enumerate()
            .map(|(level, s)| SectorView {
                level,
                kind: s.kind,
                health: s.health,
                workers: s.workers,
                on_fire: s.on_fire,
                damaged: s.damaged(),
                critical: s.critical(),
            })
            .collect();

        let dilemma = engine.dilemma.pending().map(|d| DilemmaView {
            title: d.title.clone(),
            description: d.description.clone(),
            option_a: d.option_a.label.clone(),
            option_b: d.option_b.label.clone(),
        });

        Self {
            year: engine.calendar.year(),
            month: engine.calendar.month(),
            population: engine.ledger.population,
            food: engine.ledger.food,
            power: engine.ledger.power,
            materials: engine.ledger.materials,
            morale: engine.ledger.morale,
            tension: engine.ledger.tension,
            cursor: engine.tower.cursor(),
            sectors,
            events: engine
                .log
                .recent(recent_events)
                .iter()
                .map(|e| e.to_string())
                .collect(),
            dilemma,
            outcome: engine.outcome,
        }
    }
}
