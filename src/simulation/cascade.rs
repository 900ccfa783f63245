//! Cascade resolver - fire spread and chained structural collapse
//!
//! Runs once per turn after decay, and again after a disaster lands, so any
//! chain reaction is fully settled before the turn ends. All randomness is
//! drawn from the injected rng; collapse itself is fully deterministic.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::ledger::ResourceLedger;
use crate::simulation::events::{EventKind, EventLog};
use crate::tower::{SectorId, Tower};

/// Age every fire, spread to neighbors, burn out old fires
///
/// Only fires that existed at the start of the phase are aged or spread;
/// a sector ignited this phase starts burning next turn. Fire damage itself
/// is applied during the decay phase.
pub fn spread_fires(
    tower: &mut Tower,
    config: &EngineConfig,
    rng: &mut ChaCha8Rng,
    log: &mut EventLog,
) {
    let burning: Vec<usize> = tower
        .sectors
        .iter()
        .enumerate()
        .filter(|(_, s)| s.on_fire)
        .map(|(i, _)| i)
        .collect();

    for level in burning {
        tower.sectors[level].fire_turns += 1;
        let age = tower.sectors[level].fire_turns;

        if age > config.fire_spread_delay && rng.gen::<f32>() < config.fire_spread_chance {
            let neighbors = [level.checked_sub(1), Some(level + 1)];
            for adjacent in neighbors.into_iter().flatten() {
                let Some(sector) = tower.get_mut(adjacent) else {
                    continue;
                };
                if !sector.on_fire && rng.gen::<f32>() < config.fire_ignite_chance {
                    sector.ignite();
                    log.push(EventKind::FireSpread { level: adjacent });
                }
            }
        }

        if age >= config.fire_burnout_turns {
            tower.sectors[level].extinguish();
            log.push(EventKind::FireBurnedOut { level });
        }
    }
}

/// Resolve every pending collapse, chaining downward damage
///
/// An explicit work queue of sector ids, bounded by tower height: each
/// collapsed sector is removed, its workers are killed, and fixed damage is
/// applied to the sector below, which may enqueue it in turn. A sector is
/// processed at most once; removal makes revisiting impossible.
///
/// Returns the number of sectors that collapsed.
pub fn resolve_collapses(
    tower: &mut Tower,
    ledger: &mut ResourceLedger,
    config: &EngineConfig,
    log: &mut EventLog,
) -> u32 {
    let mut queue: VecDeque<SectorId> = tower
        .sectors
        .iter()
        .filter(|s| s.health <= 0.0)
        .map(|s| s.id)
        .collect();
    let mut processed: Vec<SectorId> = Vec::new();

    while let Some(id) = queue.pop_front() {
        if processed.contains(&id) {
            continue;
        }
        processed.push(id);

        let Some(level) = tower.index_of(id) else {
            continue;
        };
        let sector = tower.sectors.remove(level);
        let casualties = ledger.kill(sector.workers);
        log.push(EventKind::SectorCollapsed { level, casualties });

        // One downward propagation check per collapse
        if level > 0 {
            let below = &mut tower.sectors[level - 1];
            below.health -= config.collapse_damage;
            log.push(EventKind::CollapseDamage { level: level - 1 });
            if below.health <= 0.0 && !processed.contains(&below.id) && !queue.contains(&below.id)
            {
                queue.push_back(below.id);
            }
        }
    }

    tower.clamp_cursor();
    processed.len() as u32
}
