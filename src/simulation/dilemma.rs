//! Dilemma system - forced binary choices with asymmetric consequences
//!
//! While a sector is failing, the city may be confronted with a choice:
//! spend scarce materials to reinforce it, or abandon it and eat the losses.
//! Options are pure data descriptors applied atomically on resolution, so a
//! pending dilemma can be serialized, inspected by an AI collaborator, and
//! replayed deterministically.
//!
//! At most one dilemma is pending at a time. A pending dilemma is an overlay,
//! not a lockout: every other action stays legal while it waits; only the
//! generation roll is suppressed.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::ledger::ResourceLedger;
use crate::simulation::events::{EventKind, EventLog};
use crate::tower::sector::{DAMAGED_THRESHOLD, FUNCTIONAL_THRESHOLD};
use crate::tower::{SectorId, Tower};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DilemmaChoice {
    A,
    B,
}

/// Deltas one option applies, all at once, when chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DilemmaEffect {
    /// Health delta for the target sector
    pub sector_health: f32,
    /// Materials delta (negative = cost)
    pub materials: f32,
    /// Morale delta
    pub morale: f32,
    /// Fraction of the target's workers that die
    pub worker_loss_fraction: f32,
    /// Remove all workers from the target
    pub clear_workers: bool,
    /// Force the target's health to 0, dooming it to collapse
    pub force_collapse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilemmaOption {
    pub label: String,
    pub effect: DilemmaEffect,
}

/// A pending forced choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dilemma {
    pub title: String,
    pub description: String,
    /// Sector the options act on; may have collapsed while pending
    pub target: SectorId,
    pub option_a: DilemmaOption,
    pub option_b: DilemmaOption,
}

impl Dilemma {
    pub fn option(&self, choice: DilemmaChoice) -> &DilemmaOption {
        match choice {
            DilemmaChoice::A => &self.option_a,
            DilemmaChoice::B => &self.option_b,
        }
    }
}

/// Observable dilemma states
///
/// Resolution is atomic, so there is no observable in-between state: the
/// machine goes Pending -> Idle inside `resolve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DilemmaState {
    Idle,
    Pending(Dilemma),
}

impl DilemmaState {
    pub fn is_pending(&self) -> bool {
        matches!(self, DilemmaState::Pending(_))
    }

    pub fn pending(&self) -> Option<&Dilemma> {
        match self {
            DilemmaState::Pending(d) => Some(d),
            DilemmaState::Idle => None,
        }
    }
}

/// Roll for a new dilemma. Only called while Idle.
///
/// A dilemma needs a subject: a sector failing but not yet lost
/// (health strictly between the functional and damaged thresholds).
pub fn maybe_raise(
    tower: &Tower,
    config: &EngineConfig,
    rng: &mut ChaCha8Rng,
) -> Option<Dilemma> {
    if rng.gen::<f32>() >= config.dilemma_chance {
        return None;
    }

    let candidates: Vec<&crate::tower::Sector> = tower
        .sectors
        .iter()
        .filter(|s| s.health > FUNCTIONAL_THRESHOLD && s.health < DAMAGED_THRESHOLD)
        .collect();

    let target = candidates.choose(rng)?;
    let level = tower.index_of(target.id)?;

    Some(Dilemma {
        title: format!("Level {} Critical", level),
        description: format!(
            "{} sector failing! {} workers trapped.",
            target.kind.name(),
            target.workers
        ),
        target: target.id,
        option_a: DilemmaOption {
            label: format!("Reinforce (-{:.0} materials)", config.dilemma_reinforce_materials),
            effect: DilemmaEffect {
                sector_health: config.dilemma_reinforce_health,
                materials: -config.dilemma_reinforce_materials,
                ..DilemmaEffect::default()
            },
        },
        option_b: DilemmaOption {
            label: "Evacuate (lose workers)".to_string(),
            effect: DilemmaEffect {
                morale: -config.dilemma_evacuate_morale_penalty,
                worker_loss_fraction: config.dilemma_evacuate_loss_fraction,
                clear_workers: true,
                force_collapse: true,
                ..DilemmaEffect::default()
            },
        },
    })
}

/// Apply the chosen option's deltas atomically
///
/// If the target collapsed while the dilemma was pending, the ledger deltas
/// still apply but the sector deltas have nothing to act on.
pub fn resolve(
    dilemma: &Dilemma,
    choice: DilemmaChoice,
    tower: &mut Tower,
    ledger: &mut ResourceLedger,
    log: &mut EventLog,
) {
    let effect = dilemma.option(choice).effect;

    if let Some(level) = tower.index_of(dilemma.target) {
        let sector = &mut tower.sectors[level];

        let lost = (sector.workers as f32 * effect.worker_loss_fraction) as u32;
        ledger.kill(lost);
        if effect.clear_workers {
            sector.workers = 0;
        }

        sector.health = (sector.health + effect.sector_health).min(100.0);
        if effect.force_collapse {
            sector.health = 0.0;
        }

        match choice {
            DilemmaChoice::A => log.push(EventKind::SectorReinforced { level }),
            DilemmaChoice::B => log.push(EventKind::SectorEvacuated { level, lost }),
        }
    }

    ledger.materials += effect.materials;
    ledger.add_morale(effect.morale);
    ledger.clamp();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use crate::tower::SectorKind;

    fn damaged_tower() -> Tower {
        let mut tower = Tower::new();
        tower.build(SectorKind::Farm, 10);
        tower.build(SectorKind::Housing, 10);
        tower.get_mut(1).unwrap().health = 45.0;
        tower
    }

    #[test]
    fn test_raise_requires_a_damaged_sector() {
        let mut tower = Tower::new();
        tower.build(SectorKind::Farm, 10);

        let mut config = EngineConfig::default();
        config.dilemma_chance = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert!(
            maybe_raise(&tower, &config, &mut rng).is_none(),
            "healthy tower offers no dilemma subject"
        );
    }

    #[test]
    fn test_raise_targets_the_failing_sector() {
        let tower = damaged_tower();
        let mut config = EngineConfig::default();
        config.dilemma_chance = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let dilemma = maybe_raise(&tower, &config, &mut rng).expect("dilemma");
        assert_eq!(dilemma.target, tower.get(1).unwrap().id);
        assert!(dilemma.title.contains("Level 1"));
    }

    #[test]
    fn test_zero_chance_never_raises() {
        let tower = damaged_tower();
        let mut config = EngineConfig::default();
        config.dilemma_chance = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..100 {
            assert!(maybe_raise(&tower, &config, &mut rng).is_none());
        }
    }

    #[test]
    fn test_reinforce_restores_health_and_spends_materials() {
        let mut tower = damaged_tower();
        let config = EngineConfig::default();
        let mut ledger = ResourceLedger::new(&config);
        let mut log = EventLog::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut cfg = config.clone();
        cfg.dilemma_chance = 1.0;
        let dilemma = maybe_raise(&tower, &cfg, &mut rng).expect("dilemma");

        let before = tower.get(1).unwrap().health;
        let materials_before = ledger.materials;
        resolve(&dilemma, DilemmaChoice::A, &mut tower, &mut ledger, &mut log);

        assert_eq!(tower.get(1).unwrap().health, before + 40.0);
        assert_eq!(ledger.materials, (materials_before - 50.0).max(0.0));
    }

    #[test]
    fn test_evacuate_dooms_the_sector() {
        let mut tower = damaged_tower();
        let config = EngineConfig::default();
        let mut ledger = ResourceLedger::new(&config);
        let mut log = EventLog::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut cfg = config.clone();
        cfg.dilemma_chance = 1.0;
        let dilemma = maybe_raise(&tower, &cfg, &mut rng).expect("dilemma");

        let population_before = ledger.population;
        resolve(&dilemma, DilemmaChoice::B, &mut tower, &mut ledger, &mut log);

        let sector = tower.get(1).unwrap();
        assert_eq!(sector.health, 0.0);
        assert_eq!(sector.workers, 0);
        // 30% of 10 workers, truncated
        assert_eq!(ledger.population, population_before - 3);
    }

    #[test]
    fn test_resolving_against_a_collapsed_target_still_applies_ledger_deltas() {
        let mut tower = damaged_tower();
        let config = EngineConfig::default();
        let mut ledger = ResourceLedger::new(&config);
        let mut log = EventLog::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut cfg = config.clone();
        cfg.dilemma_chance = 1.0;
        let dilemma = maybe_raise(&tower, &cfg, &mut rng).expect("dilemma");

        // Target collapses before the player decides
        tower.remove(dilemma.target);

        let materials_before = ledger.materials;
        resolve(&dilemma, DilemmaChoice::A, &mut tower, &mut ledger, &mut log);

        assert_eq!(ledger.materials, (materials_before - 50.0).max(0.0));
        assert!(log.is_empty(), "no sector event for a missing target");
    }
}
