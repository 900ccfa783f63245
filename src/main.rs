//! The Spire - Entry Point
//!
//! Interactive text driver for the simulation engine. The driver is a pure
//! collaborator: it renders a snapshot between turns and submits exactly one
//! action per turn through the engine's action interface.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use spire::actions::Action;
use spire::core::config::EngineConfig;
use spire::core::error::Result;
use spire::engine::{Engine, Snapshot};
use spire::simulation::dilemma::DilemmaChoice;
use spire::tower::SectorKind;

#[derive(Parser, Debug)]
#[command(name = "spire", about = "Vertical city crisis management")]
struct Args {
    /// Seed for the simulation rng; random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with engine tuning overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Event log lines to show each turn
    #[arg(long, default_value_t = 8)]
    events: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("spire=warn")
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "starting simulation");

    let mut engine = Engine::new(config, seed)?;

    println!("\n=== THE SPIRE ===");
    println!("Vertical city crisis management. Keep them alive for 50 years.");
    println!();
    println!("Commands:");
    println!("  w / s          - Move cursor up / down");
    println!("  repair         - Repair selected level (40 materials)");
    println!("  extinguish     - Extinguish selected level (30 power)");
    println!("  build <f|p|i|h> - Build farm/power/industry/housing (80 materials)");
    println!("  festival       - Hold a festival (40 food + 20 power)");
    println!("  rations        - Emergency rations (cull 10 for 60 food)");
    println!("  wait / <enter> - Pass one month");
    println!("  a / b          - Answer a pending dilemma");
    println!("  q              - Quit");
    println!();

    loop {
        let snapshot = engine.snapshot(args.events);
        display(&snapshot);

        if let Some(outcome) = snapshot.outcome {
            println!("\nThe story ends: {:?}", outcome);
            break;
        }

        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        // Cursor movement is free and does not consume the turn
        match input.as_str() {
            "w" | "up" => {
                engine.select_level(1);
                continue;
            }
            "s" | "down" => {
                engine.select_level(-1);
                continue;
            }
            "q" | "quit" => {
                engine.advance_turn(Action::Quit)?;
                break;
            }
            _ => {}
        }

        let Some(action) = parse_action(&input, engine.tower.cursor()) else {
            println!("Unknown command: {}", input);
            continue;
        };

        if let Err(e) = engine.advance_turn(action) {
            println!("Rejected: {}", e);
        }
    }

    Ok(())
}

fn parse_action(input: &str, cursor: usize) -> Option<Action> {
    match input {
        "" | "wait" => Some(Action::Wait),
        "repair" | "1" => Some(Action::Repair { level: cursor }),
        "extinguish" | "2" => Some(Action::Extinguish { level: cursor }),
        "festival" | "4" => Some(Action::Festival),
        "rations" | "5" => Some(Action::EmergencyRations),
        "a" => Some(Action::ResolveDilemma {
            choice: DilemmaChoice::A,
        }),
        "b" => Some(Action::ResolveDilemma {
            choice: DilemmaChoice::B,
        }),
        _ => {
            let kind = match input.strip_prefix("build")?.trim() {
                "f" | "farm" => SectorKind::Farm,
                "p" | "power" => SectorKind::Power,
                "i" | "industry" => SectorKind::Industry,
                "h" | "housing" => SectorKind::Housing,
                _ => return None,
            };
            Some(Action::Build { kind })
        }
    }
}

fn display(snapshot: &Snapshot) {
    println!();
    println!(
        "Year {}, Month {}  |  pop {}  food {:.0}  power {:.0}  materials {:.0}  morale {:.0}%  tension {:.0}%",
        snapshot.year,
        snapshot.month,
        snapshot.population,
        snapshot.food,
        snapshot.power,
        snapshot.materials,
        snapshot.morale,
        snapshot.tension,
    );

    // Tower, top level first
    for sector in snapshot.sectors.iter().rev() {
        let marker = if sector.level == snapshot.cursor {
            "->"
        } else {
            "  "
        };
        let condition = if sector.on_fire {
            "ON FIRE"
        } else if sector.critical {
            "critical"
        } else if sector.damaged {
            "damaged"
        } else {
            ""
        };
        println!(
            "{} L{:2}  {:8}  hp {:5.1}  workers {:2}  {}",
            marker,
            sector.level,
            sector.kind.name(),
            sector.health,
            sector.workers,
            condition,
        );
    }

    if !snapshot.events.is_empty() {
        println!("--- recent events ---");
        for line in &snapshot.events {
            println!("  {}", line);
        }
    }

    if let Some(dilemma) = &snapshot.dilemma {
        println!("!!! URGENT DECISION: {}", dilemma.title);
        println!("    {}", dilemma.description);
        println!("    A: {}", dilemma.option_a);
        println!("    B: {}", dilemma.option_b);
    }
}
