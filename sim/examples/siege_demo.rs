//! Plays a seeded siege with a scripted garrison.
//!
//! Run with: RUST_LOG=jhansi_sim=debug cargo run --example siege_demo
//! Pass a TOML config path as the first argument to override defaults.

use jhansi_sim::{FortSim, GameSnapshot, GameStatus, Position, SimConfig, UnitType};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Where the garrison goes, in order of purchase.
const GARRISON: [(UnitType, f32, f32); 6] = [
    (UnitType::Rani, 470.0, 270.0),
    (UnitType::Cannon, 450.0, 150.0),
    (UnitType::Cannon, 450.0, 390.0),
    (UnitType::Musketeer, 420.0, 270.0),
    (UnitType::Swordsman, 540.0, 150.0),
    (UnitType::Swordsman, 540.0, 390.0),
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jhansi_sim=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::from_toml_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(%path, error = %e, "could not load config");
                return;
            }
        },
        None => SimConfig::seeded(1857),
    };

    let mut sim = FortSim::with_config(config);
    sim.start();
    for (unit, x, y) in GARRISON {
        sim.select_unit(Some(unit));
        if !sim.place_defender(Position::new(x, y)) {
            tracing::warn!(?unit, "could not afford placement");
        }
    }

    // 20 simulated minutes at 60 frames per second.
    let frame = 1.0 / 60.0;
    for frame_index in 0..72_000u32 {
        match sim.status() {
            GameStatus::GameOver => break,
            GameStatus::DecisionPending => {
                let Some(decision) = sim.campaign().active_decision.clone() else {
                    break;
                };
                let Some(choice) = decision.options.first() else {
                    tracing::error!(decision = %decision.id, "decision has no options");
                    break;
                };
                tracing::info!(decision = %decision.title, choice = %choice.text, "{}", choice.consequence);
                sim.resolve_decision(&choice.id);
            }
            _ => {
                sim.step(frame);
            }
        }

        if frame_index % 600 == 0 {
            report(&sim.snapshot());
        }
    }

    let snapshot = sim.snapshot();
    report(&snapshot);
    match snapshot.to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "snapshot serialization failed"),
    }
}

fn report(snapshot: &GameSnapshot) {
    tracing::info!(
        day = snapshot.day,
        wave = snapshot.wave,
        morale = snapshot.morale,
        ammunition = snapshot.resources.ammunition,
        food = snapshot.resources.food,
        defenders = snapshot.defenders.len(),
        enemies = snapshot.enemies.len(),
        status = ?snapshot.status,
        "siege report"
    );
}
