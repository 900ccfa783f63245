//! Resource ledger - city-level resource accounting
//!
//! Tracks the scalar economy: population, food, power, materials, morale and
//! tension. Food, power and materials may dip negative transiently while a
//! turn resolves; `clamp` restores the floors and ceilings before any
//! snapshot is exposed, so consumers never observe a negative stock.

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;

/// Resource price of an action, checked and spent atomically
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceCost {
    pub food: u32,
    pub power: u32,
    pub materials: u32,
}

impl ResourceCost {
    pub fn materials(amount: u32) -> Self {
        Self {
            materials: amount,
            ..Self::default()
        }
    }

    pub fn power(amount: u32) -> Self {
        Self {
            power: amount,
            ..Self::default()
        }
    }
}

/// The city's scalar resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub population: u32,
    pub food: f32,
    pub power: f32,
    pub materials: f32,
    /// Percent, kept within [0, 100]
    pub morale: f32,
    /// Percent, kept within [0, 100]; disasters fire at the threshold
    pub tension: f32,
}

impl ResourceLedger {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            population: config.start_population,
            food: config.start_food,
            power: config.start_power,
            materials: config.start_materials,
            morale: config.start_morale,
            tension: 0.0,
        }
    }

    /// Check whether every component of a cost is covered
    pub fn can_afford(&self, cost: &ResourceCost) -> bool {
        self.food >= cost.food as f32
            && self.power >= cost.power as f32
            && self.materials >= cost.materials as f32
    }

    /// Deduct a cost. Callers check `can_afford` first; spending is only
    /// reached after validation, so stocks stay non-negative.
    pub fn spend(&mut self, cost: &ResourceCost) {
        self.food -= cost.food as f32;
        self.power -= cost.power as f32;
        self.materials -= cost.materials as f32;
    }

    /// Remove citizens, returning how many actually died
    pub fn kill(&mut self, count: u32) -> u32 {
        let killed = count.min(self.population);
        self.population -= killed;
        killed
    }

    pub fn add_morale(&mut self, delta: f32) {
        self.morale = (self.morale + delta).clamp(0.0, 100.0);
    }

    /// Enforce floors and ceilings after a turn's deltas have been applied
    pub fn clamp(&mut self) {
        self.food = self.food.max(0.0);
        self.power = self.power.max(0.0);
        self.materials = self.materials.max(0.0);
        self.morale = self.morale.clamp(0.0, 100.0);
        self.tension = self.tension.clamp(0.0, 100.0);
    }
}
