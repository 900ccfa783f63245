//! Events and turn history logging
//!
//! The log is the append-only record of everything notable the engine did,
//! stamped with the calendar date of the turn that produced it. The engine
//! never truncates it; `recent` is a display window for collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tower::SectorKind;

/// How urgently a collaborator should surface an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Alert,
}

/// Everything the engine can report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    SimulationStarted,

    // Player actions
    Repaired { level: usize },
    Extinguished { level: usize },
    Built { level: usize, kind: SectorKind },
    FestivalHeld,
    RationsCulled { killed: u32 },

    // Economy
    Starvation { deaths: u32 },
    Blackout { level: usize },
    CitizensFled { count: u32 },

    // Cascades
    FireSpread { level: usize },
    FireBurnedOut { level: usize },
    SectorCollapsed { level: usize, casualties: u32 },
    CollapseDamage { level: usize },

    // Disasters
    Earthquake { sectors: u32, casualties: u32 },
    MajorFire { level: usize },
    Plague { deaths: u32 },
    StructuralFailure { levels: u32 },
    Riot { level: usize, deaths: u32 },

    // Minor windfalls
    SupplyCache { amount: u32 },
    Refugees { count: u32 },
    PowerSurge { amount: u32 },
    Harvest { amount: u32 },

    // Dilemmas
    DilemmaRaised { level: usize },
    SectorReinforced { level: usize },
    SectorEvacuated { level: usize, lost: u32 },

    // Terminal
    Extinction,
    Victory { survivors: u32 },
}

impl EventKind {
    pub fn severity(&self) -> Severity {
        match self {
            EventKind::SimulationStarted
            | EventKind::Repaired { .. }
            | EventKind::Extinguished { .. }
            | EventKind::Built { .. }
            | EventKind::FestivalHeld
            | EventKind::SupplyCache { .. }
            | EventKind::Refugees { .. }
            | EventKind::PowerSurge { .. }
            | EventKind::Harvest { .. }
            | EventKind::SectorReinforced { .. }
            | EventKind::Victory { .. } => Severity::Info,

            EventKind::CitizensFled { .. }
            | EventKind::FireBurnedOut { .. }
            | EventKind::CollapseDamage { .. }
            | EventKind::DilemmaRaised { .. }
            | EventKind::SectorEvacuated { .. } => Severity::Warning,

            EventKind::RationsCulled { .. }
            | EventKind::Starvation { .. }
            | EventKind::Blackout { .. }
            | EventKind::FireSpread { .. }
            | EventKind::SectorCollapsed { .. }
            | EventKind::Earthquake { .. }
            | EventKind::MajorFire { .. }
            | EventKind::Plague { .. }
            | EventKind::StructuralFailure { .. }
            | EventKind::Riot { .. }
            | EventKind::Extinction => Severity::Alert,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::SimulationStarted => {
                write!(f, "The Spire awakens. Your people huddle in its shadow")
            }
            EventKind::Repaired { level } => write!(f, "Level {} repaired", level),
            EventKind::Extinguished { level } => {
                write!(f, "Fire on Level {} extinguished", level)
            }
            EventKind::Built { level, kind } => {
                write!(f, "{} built on Level {}", kind.name(), level)
            }
            EventKind::FestivalHeld => write!(f, "Festival held, morale surges"),
            EventKind::RationsCulled { killed } => {
                write!(f, "Culled {} citizens for emergency rations", killed)
            }
            EventKind::Starvation { deaths } => {
                write!(f, "Starvation: {} die from hunger", deaths)
            }
            EventKind::Blackout { level } => write!(f, "Blackout damages Level {}", level),
            EventKind::CitizensFled { count } => {
                write!(f, "{} citizens flee the Spire", count)
            }
            EventKind::FireSpread { level } => write!(f, "Fire spreads to Level {}", level),
            EventKind::FireBurnedOut { level } => {
                write!(f, "Fire on Level {} burns out", level)
            }
            EventKind::SectorCollapsed { level, casualties } => {
                write!(f, "Level {} collapses: {} lost", level, casualties)
            }
            EventKind::CollapseDamage { level } => {
                write!(f, "Collapse damages Level {}", level)
            }
            EventKind::Earthquake { sectors, casualties } => {
                write!(f, "Earthquake! {} levels damaged, {} dead", sectors, casualties)
            }
            EventKind::MajorFire { level } => {
                write!(f, "Major fire on Level {}, spreading fast", level)
            }
            EventKind::Plague { deaths } => {
                write!(f, "Plague outbreak: {} dead in days", deaths)
            }
            EventKind::StructuralFailure { levels } => {
                write!(f, "Structural failure: {} levels give way", levels)
            }
            EventKind::Riot { level, deaths } => {
                write!(f, "Riots on Level {}: {} casualties", level, deaths)
            }
            EventKind::SupplyCache { amount } => {
                write!(f, "Supply cache discovered (+{} materials)", amount)
            }
            EventKind::Refugees { count } => {
                write!(f, "Refugee group arrives ({} people)", count)
            }
            EventKind::PowerSurge { amount } => write!(f, "Power surge (+{} power)", amount),
            EventKind::Harvest { amount } => {
                write!(f, "Abundant harvest (+{} food)", amount)
            }
            EventKind::DilemmaRaised { level } => {
                write!(f, "Urgent decision needed on Level {}", level)
            }
            EventKind::SectorReinforced { level } => {
                write!(f, "Level {} reinforced", level)
            }
            EventKind::SectorEvacuated { level, lost } => {
                write!(f, "Level {} evacuated, {} lost in the descent", level, lost)
            }
            EventKind::Extinction => write!(f, "Extinction: the Spire stands empty"),
            EventKind::Victory { survivors } => {
                write!(f, "The Spire endures: {} survivors", survivors)
            }
        }
    }
}

/// One dated log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub year: u32,
    pub month: u32,
    pub kind: EventKind,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Y{}M{}: {}", self.year, self.month, self.kind)
    }
}

/// Append-only event history
///
/// Carries the current calendar stamp so systems can push events without
/// threading the date everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<LogEntry>,
    year: u32,
    month: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            year: 1,
            month: 1,
        }
    }

    /// Update the date applied to subsequently pushed events
    pub fn stamp(&mut self, year: u32, month: u32) {
        self.year = year;
        self.month = month;
    }

    pub fn push(&mut self, kind: EventKind) {
        let entry = LogEntry {
            year: self.year,
            month: self.month,
            kind,
        };
        match entry.kind.severity() {
            Severity::Alert => tracing::info!("{}", entry),
            _ => tracing::debug!("{}", entry),
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The trailing `n` entries, newest last
    pub fn recent(&self, n: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
