//! Action definitions - the once-per-turn interface
//!
//! Collaborators (UI, AI scripts) submit exactly one action per turn through
//! `Engine::advance_turn`. Cursor movement is deliberately NOT an action:
//! it is free and instant, exposed as `Engine::select_level`.

use serde::{Deserialize, Serialize};

use crate::simulation::dilemma::DilemmaChoice;
use crate::tower::SectorKind;

/// One discrete player or AI action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Restore health to the sector at `level`
    Repair { level: usize },
    /// Put out the fire on the sector at `level`
    Extinguish { level: usize },
    /// Append a new sector at the top of the tower
    Build { kind: SectorKind },
    /// Spend food and power to raise morale
    Festival,
    /// Cull citizens for food
    EmergencyRations,
    /// Do nothing; time still advances
    Wait,
    /// Answer the pending dilemma
    ResolveDilemma { choice: DilemmaChoice },
    /// End the session without touching state
    Quit,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Repair { .. } => "repair",
            Action::Extinguish { .. } => "extinguish",
            Action::Build { .. } => "build",
            Action::Festival => "festival",
            Action::EmergencyRations => "emergency rations",
            Action::Wait => "wait",
            Action::ResolveDilemma { .. } => "resolve dilemma",
            Action::Quit => "quit",
        }
    }

    /// Actions that target a specific tower level
    pub fn target_level(&self) -> Option<usize> {
        match self {
            Action::Repair { level } | Action::Extinguish { level } => Some(*level),
            _ => None,
        }
    }
}
