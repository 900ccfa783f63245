//! Disaster engine - tension-gated crises and minor windfalls
//!
//! Tension accumulates every turn; when it crosses the threshold one
//! disaster is drawn from the weighted table and applied, and tension
//! resets. Disaster-free turns instead roll for a small positive event.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::ledger::ResourceLedger;
use crate::simulation::cascade;
use crate::simulation::events::{EventKind, EventLog};
use crate::tower::Tower;

/// The major crises the Spire can suffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disaster {
    Earthquake,
    MajorFire,
    Plague,
    StructuralFailure,
    Riot,
}

/// Table order matches `EngineConfig::disaster_weights`
pub const DISASTER_TABLE: [Disaster; 5] = [
    Disaster::Earthquake,
    Disaster::MajorFire,
    Disaster::Plague,
    Disaster::StructuralFailure,
    Disaster::Riot,
];

impl Disaster {
    pub fn name(&self) -> &'static str {
        match self {
            Disaster::Earthquake => "earthquake",
            Disaster::MajorFire => "major fire",
            Disaster::Plague => "plague",
            Disaster::StructuralFailure => "structural failure",
            Disaster::Riot => "riot",
        }
    }
}

/// Draw one disaster from the weighted table
pub fn pick_disaster(weights: &[f32; 5], rng: &mut ChaCha8Rng) -> Disaster {
    let total: f32 = weights.iter().sum();
    let mut roll = rng.gen::<f32>() * total;
    for (disaster, weight) in DISASTER_TABLE.iter().zip(weights) {
        roll -= weight;
        if roll < 0.0 {
            return *disaster;
        }
    }
    // Float rounding can leave a sliver at the end of the walk
    DISASTER_TABLE[DISASTER_TABLE.len() - 1]
}

/// Apply a disaster's effects, then settle any collapses it caused
pub fn apply_disaster(
    kind: Disaster,
    tower: &mut Tower,
    ledger: &mut ResourceLedger,
    config: &EngineConfig,
    rng: &mut ChaCha8Rng,
    log: &mut EventLog,
) {
    tracing::info!(disaster = kind.name(), "disaster strikes");

    match kind {
        Disaster::Earthquake => {
            if tower.is_empty() {
                return;
            }
            let count = rng.gen_range(2..=5).min(tower.len());
            let hit = rand::seq::index::sample(rng, tower.len(), count);

            let mut casualties = 0;
            for level in hit {
                let damage = rng.gen_range(20..=45) as f32;
                tower.sectors[level].health -= damage;
                casualties += rng.gen_range(2..=6);
            }
            let casualties = ledger.kill(casualties);
            ledger.add_morale(-20.0);
            log.push(EventKind::Earthquake {
                sectors: count as u32,
                casualties,
            });
        }

        Disaster::MajorFire => {
            let levels: Vec<usize> = (0..tower.len()).collect();
            if let Some(&level) = levels.choose(rng) {
                tower.sectors[level].ignite();
                log.push(EventKind::MajorFire { level });
            }
        }

        Disaster::Plague => {
            let fraction = rng.gen_range(0.15..0.30);
            let deaths = ledger.kill((ledger.population as f32 * fraction) as u32);
            ledger.add_morale(-30.0);
            log.push(EventKind::Plague { deaths });
        }

        Disaster::StructuralFailure => {
            if tower.is_empty() {
                return;
            }
            let count = rng.gen_range(1..=3).min(tower.len());
            let hit = rand::seq::index::sample(rng, tower.len(), count);
            for level in hit {
                tower.sectors[level].health = 0.0;
            }
            log.push(EventKind::StructuralFailure {
                levels: count as u32,
            });
        }

        Disaster::Riot => {
            let levels: Vec<usize> = (0..tower.len()).collect();
            if let Some(&level) = levels.choose(rng) {
                tower.sectors[level].health -= 30.0;
                let deaths = ledger.kill(rng.gen_range(5..=15));
                ledger.add_morale(-25.0);
                log.push(EventKind::Riot { level, deaths });
            }
        }
    }

    cascade::resolve_collapses(tower, ledger, config, log);
    ledger.clamp();
}

/// Roll for a small positive event on a disaster-free turn
pub fn roll_minor_event(
    ledger: &mut ResourceLedger,
    config: &EngineConfig,
    rng: &mut ChaCha8Rng,
    log: &mut EventLog,
) {
    if rng.gen::<f32>() >= config.minor_event_chance {
        return;
    }

    match rng.gen_range(0..4) {
        0 => {
            let amount = rng.gen_range(30..=60);
            ledger.materials += amount as f32;
            log.push(EventKind::SupplyCache { amount });
        }
        1 => {
            let count = rng.gen_range(5..=12);
            ledger.population += count;
            log.push(EventKind::Refugees { count });
        }
        2 => {
            let amount = rng.gen_range(40..=80);
            ledger.power += amount as f32;
            log.push(EventKind::PowerSurge { amount });
        }
        _ => {
            let amount = rng.gen_range(50..=100);
            ledger.food += amount as f32;
            log.push(EventKind::Harvest { amount });
        }
    }
}
