//! Engine configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. The config is owned by the engine
//! instance; there is no global accessor, so two engines can run different
//! tunings side by side.
//!
//! Any field can be overridden from a TOML file: missing keys keep their
//! default value.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{EngineError, Result};

/// Tuning constants for the simulation engine
///
/// These values have been tuned so an unattended tower survives a few years
/// and a well-managed one can reach the victory year. Changing them shifts
/// pacing and difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === STARTING STATE ===
    /// Citizens alive at the start of the simulation
    pub start_population: u32,
    /// Starting food stock (one citizen eats 1.0/turn)
    pub start_food: f32,
    /// Starting power reserve
    pub start_power: f32,
    /// Starting materials for early repairs and construction
    pub start_materials: f32,
    /// Starting morale, percent
    pub start_morale: f32,

    // === PRODUCTION ===
    /// Food produced per farm worker per turn
    pub farm_food_per_worker: f32,
    /// Power produced per power-plant worker per turn
    pub power_per_worker: f32,
    /// Materials produced per industry worker per turn
    pub industry_materials_per_worker: f32,

    // === CONSUMPTION ===
    /// Food eaten per citizen per turn
    pub food_per_capita: f32,
    /// Power drawn per citizen per turn
    pub power_per_capita: f32,

    // === SHORTFALL PENALTIES ===
    /// Fraction of the population that starves when food runs out
    ///
    /// Deaths per turn are capped by `starvation_death_cap` so one bad
    /// harvest cannot wipe a large city outright.
    pub starvation_death_fraction: f32,
    /// Upper bound on starvation deaths in a single turn
    pub starvation_death_cap: u32,
    /// Morale lost in a starvation turn
    pub starvation_morale_penalty: f32,
    /// Morale lost in a blackout turn
    pub blackout_morale_penalty: f32,
    /// Structural damage a blackout inflicts on one random functional sector
    pub blackout_sector_damage: f32,

    // === DECAY & FIRE ===
    /// Passive health lost by every sector each turn
    pub base_decay: f32,
    /// Decay multiplier for high-altitude levels (exposed to the weather)
    pub high_level_decay_multiplier: f32,
    /// First level index that counts as high altitude
    pub high_level_start: usize,
    /// Extra health an on-fire sector loses each turn, on top of base decay
    pub fire_damage: f32,
    /// Turns a fire must burn before it becomes eligible to spread
    pub fire_spread_delay: u32,
    /// Chance per turn that an eligible fire attempts to spread at all
    pub fire_spread_chance: f32,
    /// Chance that each adjacent sector ignites once spreading is attempted
    pub fire_ignite_chance: f32,
    /// Turns after which an unextinguished fire burns itself out
    pub fire_burnout_turns: u32,

    // === COLLAPSE ===
    /// Structural damage a collapsing sector deals to the sector below it
    pub collapse_damage: f32,

    // === TENSION & DISASTERS ===
    /// Tension accumulated each turn, percent
    pub tension_rate: f32,
    /// Tension level at which a disaster fires and tension resets
    pub disaster_threshold: f32,
    /// Quiet turns before the pity timer starts rolling for a disaster
    ///
    /// Keeps long lucky streaks from flattening the pacing: after this many
    /// turns without a crisis, each further turn rolls `pity_chance`.
    pub pity_quiet_turns: u32,
    /// Per-turn disaster chance once the pity timer is armed
    pub pity_chance: f32,
    /// Relative weights for {Earthquake, MajorFire, Plague,
    /// StructuralFailure, Riot}; uniform by default
    pub disaster_weights: [f32; 5],
    /// Per-turn chance of a minor windfall event on disaster-free turns
    pub minor_event_chance: f32,

    // === DILEMMAS ===
    /// Per-turn chance a dilemma is raised while none is pending
    pub dilemma_chance: f32,
    /// Health restored by the "reinforce" dilemma option
    pub dilemma_reinforce_health: f32,
    /// Materials consumed by the "reinforce" dilemma option
    pub dilemma_reinforce_materials: f32,
    /// Fraction of trapped workers lost by the "evacuate" dilemma option
    pub dilemma_evacuate_loss_fraction: f32,
    /// Morale lost when a level is abandoned
    pub dilemma_evacuate_morale_penalty: f32,

    // === MORALE & POPULATION ===
    /// Morale below which citizens start fleeing each turn
    pub emigration_morale_threshold: f32,
    /// Fewest citizens that flee in an emigration turn
    pub emigration_min: u32,
    /// Most citizens that flee in an emigration turn
    pub emigration_max: u32,
    /// Morale recovers toward this baseline when nothing is wrong
    pub morale_recovery_ceiling: f32,
    /// Morale regained per turn while below the recovery ceiling
    pub morale_recovery_rate: f32,
    /// Food stock required for natural population growth
    pub growth_food_threshold: f32,
    /// Morale required for natural population growth
    pub growth_morale_threshold: f32,
    /// Fewest newcomers in a growth month
    pub growth_min: u32,
    /// Most newcomers in a growth month
    pub growth_max: u32,

    // === ACTION COSTS ===
    /// Materials to repair the selected level
    pub repair_cost: u32,
    /// Health restored by a repair
    pub repair_health: f32,
    /// Power to extinguish a burning level
    pub extinguish_cost: u32,
    /// Materials to build a new top level
    pub build_cost: u32,
    /// Food consumed by a festival
    pub festival_food_cost: u32,
    /// Power consumed by a festival
    pub festival_power_cost: u32,
    /// Morale gained from a festival
    pub festival_morale_gain: f32,
    /// Citizens culled for emergency rations
    pub rations_deaths: u32,
    /// Food gained from emergency rations
    pub rations_food_gain: f32,
    /// Morale lost when rations are culled
    pub rations_morale_penalty: f32,
    /// Population floor below which emergency rations are refused
    pub rations_min_population: u32,

    // === TOWER ===
    /// Maximum number of levels the tower can hold
    pub max_height: usize,
    /// Fewest workers assigned to a freshly built sector
    pub build_workers_min: u32,
    /// Most workers assigned to a freshly built sector
    pub build_workers_max: u32,
    /// Fewest workers in a starting sector
    pub initial_workers_min: u32,
    /// Most workers in a starting sector
    pub initial_workers_max: u32,
    /// Most workers a single sector can hold
    pub worker_capacity: u32,

    // === TERMINAL ===
    /// The simulation ends in victory once this year is reached
    pub victory_year: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Starting state
            start_population: 85,
            start_food: 150.0,
            start_power: 100.0,
            start_materials: 80.0,
            start_morale: 65.0,

            // Production (per worker, scaled by sector health)
            farm_food_per_worker: 2.5,
            power_per_worker: 3.0,
            industry_materials_per_worker: 2.0,

            // Consumption
            food_per_capita: 1.0,
            power_per_capita: 0.6,

            // Shortfalls
            starvation_death_fraction: 0.12,
            starvation_death_cap: 15,
            starvation_morale_penalty: 25.0,
            blackout_morale_penalty: 15.0,
            blackout_sector_damage: 25.0,

            // Decay & fire
            base_decay: 1.5,
            high_level_decay_multiplier: 2.0,
            high_level_start: 8,
            fire_damage: 8.0,
            fire_spread_delay: 2,
            fire_spread_chance: 0.4,
            fire_ignite_chance: 0.5,
            fire_burnout_turns: 6,

            // Collapse
            collapse_damage: 40.0,

            // Tension & disasters
            tension_rate: 2.5,
            disaster_threshold: 100.0,
            pity_quiet_turns: 8,
            pity_chance: 0.4,
            disaster_weights: [1.0; 5],
            minor_event_chance: 0.15,

            // Dilemmas
            dilemma_chance: 0.12,
            dilemma_reinforce_health: 40.0,
            dilemma_reinforce_materials: 50.0,
            dilemma_evacuate_loss_fraction: 0.3,
            dilemma_evacuate_morale_penalty: 15.0,

            // Morale & population
            emigration_morale_threshold: 30.0,
            emigration_min: 3,
            emigration_max: 8,
            morale_recovery_ceiling: 60.0,
            morale_recovery_rate: 1.5,
            growth_food_threshold: 50.0,
            growth_morale_threshold: 50.0,
            growth_min: 2,
            growth_max: 5,

            // Action costs
            repair_cost: 40,
            repair_health: 50.0,
            extinguish_cost: 30,
            build_cost: 80,
            festival_food_cost: 40,
            festival_power_cost: 20,
            festival_morale_gain: 30.0,
            rations_deaths: 10,
            rations_food_gain: 60.0,
            rations_morale_penalty: 20.0,
            rations_min_population: 30,

            // Tower
            max_height: 12,
            build_workers_min: 5,
            build_workers_max: 10,
            initial_workers_min: 8,
            initial_workers_max: 15,
            worker_capacity: 20,

            // Terminal
            victory_year: 50,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML override on top of the defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config
            .validate()
            .map_err(EngineError::Config)?;
        Ok(config)
    }

    /// Load overrides from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.disaster_threshold <= 0.0 {
            return Err("disaster_threshold must be positive".into());
        }

        if self.disaster_weights.iter().any(|w| *w < 0.0)
            || self.disaster_weights.iter().sum::<f32>() <= 0.0
        {
            return Err("disaster_weights must be non-negative with a positive sum".into());
        }

        for (name, chance) in [
            ("fire_spread_chance", self.fire_spread_chance),
            ("fire_ignite_chance", self.fire_ignite_chance),
            ("pity_chance", self.pity_chance),
            ("minor_event_chance", self.minor_event_chance),
            ("dilemma_chance", self.dilemma_chance),
            ("starvation_death_fraction", self.starvation_death_fraction),
            (
                "dilemma_evacuate_loss_fraction",
                self.dilemma_evacuate_loss_fraction,
            ),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(format!("{} must be within [0, 1], got {}", name, chance));
            }
        }

        // Ranges must be ordered
        if self.emigration_min > self.emigration_max {
            return Err("emigration_min must be <= emigration_max".into());
        }
        if self.growth_min > self.growth_max {
            return Err("growth_min must be <= growth_max".into());
        }
        if self.build_workers_min > self.build_workers_max {
            return Err("build_workers_min must be <= build_workers_max".into());
        }
        if self.initial_workers_min > self.initial_workers_max {
            return Err("initial_workers_min must be <= initial_workers_max".into());
        }

        if self.build_workers_max > self.worker_capacity
            || self.initial_workers_max > self.worker_capacity
        {
            return Err("worker allocations must fit within worker_capacity".into());
        }

        if self.max_height == 0 {
            return Err("max_height must be at least 1".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_override() {
        let config = EngineConfig::from_toml_str("repair_cost = 60\nbase_decay = 2.0").unwrap();
        assert_eq!(config.repair_cost, 60);
        assert_eq!(config.base_decay, 2.0);
        // Untouched keys keep their defaults
        assert_eq!(config.build_cost, EngineConfig::default().build_cost);
    }

    #[test]
    fn test_invalid_chance_rejected() {
        let result = EngineConfig::from_toml_str("dilemma_chance = 1.5");
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_weight_table_rejected() {
        let mut config = EngineConfig::default();
        config.disaster_weights = [0.0; 5];
        assert!(config.validate().is_err());
    }
}
