//! Autoplay - heuristic self-playing driver
//!
//! Plays the simulation with a priority-ordered policy (fires first, then
//! critical repairs, then economy) to soak-test pacing and survivability.
//! Like the interactive driver it only ever reads snapshots and submits one
//! action per turn.

use std::path::PathBuf;

use clap::Parser;

use spire::actions::Action;
use spire::core::config::EngineConfig;
use spire::core::error::Result;
use spire::engine::{Engine, Snapshot};
use spire::simulation::dilemma::DilemmaChoice;
use spire::tower::SectorKind;

#[derive(Parser, Debug)]
#[command(name = "autoplay", about = "Heuristic self-playing Spire driver")]
struct Args {
    /// Seed for the simulation rng
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of turns to play
    #[arg(long, default_value_t = 600)]
    turns: u32,

    /// TOML file with engine tuning overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dump the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("spire=info")
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };
    let mut engine = Engine::new(config, args.seed)?;

    let mut played = 0;
    for _ in 0..args.turns {
        if engine.is_over() {
            break;
        }

        let snapshot = engine.snapshot(0);
        let action = choose_action(&snapshot);
        tracing::debug!(turn = played, action = action.name(), "submitting");

        if let Err(e) = engine.advance_turn(action) {
            // The policy validated against the same snapshot the engine
            // sees, so a rejection means the policy has a gap. Fall back.
            tracing::warn!(error = %e, "action rejected, waiting instead");
            engine.advance_turn(Action::Wait)?;
        }
        played += 1;
    }

    let final_snapshot = engine.snapshot(20);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&final_snapshot)?);
    } else {
        println!(
            "{} turns played: year {}, population {}, {} levels standing, outcome {:?}",
            played,
            final_snapshot.year,
            final_snapshot.population,
            final_snapshot.sectors.len(),
            final_snapshot.outcome,
        );
        for line in &final_snapshot.events {
            println!("  {}", line);
        }
    }

    Ok(())
}

/// Priority-ordered policy: emergencies, then maintenance, then expansion
fn choose_action(snapshot: &Snapshot) -> Action {
    // A pending dilemma blocks nothing, but answering it promptly is
    // almost always better than letting the subject sector rot.
    if snapshot.dilemma.is_some() {
        return if snapshot.materials >= 50.0 {
            Action::ResolveDilemma {
                choice: DilemmaChoice::A,
            }
        } else {
            Action::ResolveDilemma {
                choice: DilemmaChoice::B,
            }
        };
    }

    // Fires spread; kill them first
    if snapshot.power >= 30.0 {
        if let Some(burning) = snapshot.sectors.iter().find(|s| s.on_fire) {
            return Action::Extinguish {
                level: burning.level,
            };
        }
    }

    // Critical sectors collapse soon
    if snapshot.materials >= 40.0 {
        if let Some(critical) = snapshot
            .sectors
            .iter()
            .find(|s| s.critical && s.workers > 0)
        {
            return Action::Repair {
                level: critical.level,
            };
        }
    }

    if snapshot.food < 20.0 && snapshot.population > 30 {
        return Action::EmergencyRations;
    }

    if snapshot.morale < 25.0 && snapshot.food >= 40.0 && snapshot.power >= 20.0 {
        return Action::Festival;
    }

    // Expansion once there is a materials cushion
    if snapshot.materials >= 120.0 && snapshot.sectors.len() < 12 {
        let kind = if snapshot.food < 100.0 {
            SectorKind::Farm
        } else if snapshot.power < 100.0 {
            SectorKind::Power
        } else if snapshot.materials < 150.0 {
            SectorKind::Industry
        } else {
            SectorKind::Housing
        };
        return Action::Build { kind };
    }

    // Preventive maintenance
    if snapshot.materials >= 60.0 {
        if let Some(worn) = snapshot
            .sectors
            .iter()
            .find(|s| s.damaged && !s.critical && s.workers > 0)
        {
            return Action::Repair { level: worn.level };
        }
    }

    if snapshot.morale < 50.0 && snapshot.food >= 60.0 && snapshot.power >= 30.0 {
        return Action::Festival;
    }

    Action::Wait
}
