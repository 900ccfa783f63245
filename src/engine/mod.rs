//! The engine instance - explicit owner of all mutable game state
//!
//! One `Engine` is one simulation: ledger, tower, dilemma machine, event
//! log, calendar and the seeded rng all live here. There is no static
//! state; two engines never interfere. All mutation flows through
//! `advance_turn`, the Turn Controller's single entry point.

pub mod snapshot;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actions::Action;
use crate::core::calendar::Calendar;
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::ledger::ResourceLedger;
use crate::simulation::dilemma::DilemmaState;
use crate::simulation::disaster::Disaster;
use crate::simulation::events::{EventKind, EventLog};
use crate::simulation::tick::{self, Outcome, TurnResult};
use crate::tower::{SectorKind, Tower};

pub use snapshot::Snapshot;

/// Sector layout of a freshly founded Spire, bottom to top
const INITIAL_LAYOUT: [SectorKind; 8] = [
    SectorKind::Power,
    SectorKind::Industry,
    SectorKind::Housing,
    SectorKind::Farm,
    SectorKind::Housing,
    SectorKind::Farm,
    SectorKind::Power,
    SectorKind::Housing,
];

/// A complete simulation instance
pub struct Engine {
    pub config: EngineConfig,
    pub calendar: Calendar,
    pub ledger: ResourceLedger,
    pub tower: Tower,
    pub dilemma: DilemmaState,
    pub log: EventLog,
    pub rng: ChaCha8Rng,
    pub outcome: Option<Outcome>,
    /// Turns since the last crisis, feeding the pity timer
    pub quiet_turns: u32,
    /// Scripted override for the next disaster draw
    pub forced_disaster: Option<Disaster>,
}

impl Engine {
    /// Create an engine with a validated config and a fixed seed
    ///
    /// The same (config, seed) pair always produces the same simulation for
    /// the same action sequence.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self> {
        config.validate().map_err(EngineError::Config)?;
        Ok(Self::build(config, seed))
    }

    /// Create an engine with the default tuning
    pub fn from_seed(seed: u64) -> Self {
        // The default config is covered by a unit test, so skipping
        // validation here cannot hide a bad constant.
        Self::build(EngineConfig::default(), seed)
    }

    fn build(config: EngineConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut tower = Tower::new();
        for kind in INITIAL_LAYOUT {
            let workers =
                rng.gen_range(config.initial_workers_min..=config.initial_workers_max);
            tower.build(kind, workers);
        }
        // Start the selection mid-tower
        tower.select(INITIAL_LAYOUT.len() as i32 / 2);

        let ledger = ResourceLedger::new(&config);
        let mut log = EventLog::new();
        log.push(EventKind::SimulationStarted);

        Self {
            config,
            calendar: Calendar::new(),
            ledger,
            tower,
            dilemma: DilemmaState::Idle,
            log,
            rng,
            outcome: None,
            quiet_turns: 0,
            forced_disaster: None,
        }
    }

    /// Submit the one action for this turn and run the full step
    pub fn advance_turn(&mut self, action: Action) -> Result<TurnResult> {
        tick::run_turn(self, action)
    }

    /// Move the selection cursor. Free: never consumes a turn.
    pub fn select_level(&mut self, delta: i32) {
        self.tower.select(delta);
    }

    /// Script the next disaster draw (scenario and test support)
    pub fn force_disaster(&mut self, kind: Disaster) {
        self.forced_disaster = Some(kind);
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Owned copy of the observable state with the trailing `recent_events`
    /// log entries
    pub fn snapshot(&self, recent_events: usize) -> Snapshot {
        Snapshot::capture(self, recent_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_layout() {
        let engine = Engine::from_seed(1);
        assert_eq!(engine.tower.len(), 8);
        assert_eq!(engine.ledger.population, 85);
        assert_eq!(engine.tower.cursor(), 4);
        assert!(engine.outcome.is_none());
        assert!(!engine.dilemma.is_pending());
    }

    #[test]
    fn test_same_seed_same_start() {
        let a = Engine::from_seed(77);
        let b = Engine::from_seed(77);
        assert_eq!(a.snapshot(50), b.snapshot(50));
    }

    #[test]
    fn test_different_seed_different_workers() {
        let a = Engine::from_seed(1);
        let b = Engine::from_seed(2);
        let workers_a: Vec<u32> = a.tower.sectors.iter().map(|s| s.workers).collect();
        let workers_b: Vec<u32> = b.tower.sectors.iter().map(|s| s.workers).collect();
        assert_ne!(workers_a, workers_b);
    }

    #[test]
    fn test_select_level_is_free() {
        let mut engine = Engine::from_seed(1);
        let before = engine.calendar;

        engine.select_level(2);
        engine.select_level(-100);

        assert_eq!(engine.tower.cursor(), 0);
        assert_eq!(engine.calendar, before, "cursor movement costs no time");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.max_height = 0;
        assert!(Engine::new(config, 1).is_err());
    }

    #[test]
    fn test_snapshot_serializes() {
        let engine = Engine::from_seed(3);
        let json = serde_json::to_string(&engine.snapshot(10)).unwrap();
        assert!(json.contains("\"population\":85"));
    }
}
