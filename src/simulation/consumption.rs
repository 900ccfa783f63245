//! Resource production and consumption systems
//!
//! Production sums worker output across functional sectors, scaled by each
//! sector's health. Consumption drains per-capita food and power, and any
//! shortfall is resolved in the same turn (starvation deaths, blackout
//! damage) so the ledger is clean before the snapshot is exposed.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::ledger::ResourceLedger;
use crate::simulation::events::{EventKind, EventLog};
use crate::tower::{SectorKind, Tower};

/// Add each functional sector's output to the ledger
///
/// Output = workers x rate x (health / 100). Housing produces nothing.
pub fn run_production(tower: &Tower, ledger: &mut ResourceLedger, config: &EngineConfig) {
    let mut food = 0.0;
    let mut power = 0.0;
    let mut materials = 0.0;

    for sector in tower.sectors.iter().filter(|s| s.is_functional()) {
        let efficiency = sector.health / 100.0;
        let workers = sector.workers as f32;

        match sector.kind {
            SectorKind::Farm => food += workers * config.farm_food_per_worker * efficiency,
            SectorKind::Power => power += workers * config.power_per_worker * efficiency,
            SectorKind::Industry => {
                materials += workers * config.industry_materials_per_worker * efficiency
            }
            SectorKind::Housing => {}
        }
    }

    ledger.food += food;
    ledger.power += power;
    ledger.materials += materials;
}

/// Drain per-capita upkeep and resolve any shortfall immediately
pub fn run_consumption(
    tower: &mut Tower,
    ledger: &mut ResourceLedger,
    config: &EngineConfig,
    rng: &mut ChaCha8Rng,
    log: &mut EventLog,
) {
    let population = ledger.population as f32;
    ledger.food -= population * config.food_per_capita;
    ledger.power -= population * config.power_per_capita;

    if ledger.food < 0.0 {
        let deaths = ((ledger.population as f32 * config.starvation_death_fraction).round()
            as u32)
            .min(config.starvation_death_cap);
        let deaths = ledger.kill(deaths);
        ledger.add_morale(-config.starvation_morale_penalty);
        log.push(EventKind::Starvation { deaths });
    }

    if ledger.power < 0.0 {
        ledger.add_morale(-config.blackout_morale_penalty);

        let functional: Vec<usize> = tower
            .sectors
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_functional())
            .map(|(i, _)| i)
            .collect();
        if let Some(&level) = functional.choose(rng) {
            tower.sectors[level].health -= config.blackout_sector_damage;
            log.push(EventKind::Blackout { level });
        }
    }

    ledger.clamp();
}

/// Morale drift, emigration and natural growth
///
/// Emigration is a recurring per-turn check, not a one-shot event: citizens
/// keep leaving every turn morale stays below the threshold.
pub fn update_morale_and_population(
    ledger: &mut ResourceLedger,
    config: &EngineConfig,
    rng: &mut ChaCha8Rng,
    log: &mut EventLog,
    month: u32,
) {
    if ledger.morale < config.emigration_morale_threshold && ledger.population > 0 {
        let fled = rng.gen_range(config.emigration_min..=config.emigration_max);
        let fled = ledger.kill(fled);
        log.push(EventKind::CitizensFled { count: fled });
    }

    if ledger.morale < config.morale_recovery_ceiling {
        ledger.add_morale(config.morale_recovery_rate);
    }

    if ledger.food > config.growth_food_threshold
        && ledger.morale > config.growth_morale_threshold
        && month % 3 == 0
    {
        let growth = rng.gen_range(config.growth_min..=config.growth_max);
        ledger.population += growth;
    }
}
