//! Siege of Jhansi - Simulation Core
//!
//! A deterministic ECS simulation of a lane-based fort defense: enemy waves
//! march on the fort, placed defenders fight them off, and the garrison's
//! supplies and morale carry over across days. Uses `bevy_ecs` for the
//! entity-component-system architecture.
//!
//! `FortSim` is the entry point. `SimHandle` runs one on its own thread.

pub mod api;
pub mod catalog;
pub mod command;
pub mod components;
pub mod config;
pub mod decisions;
pub mod frame_buffer;
pub mod handle;
pub mod serialization;
pub mod state;
pub mod systems;
pub mod waves;
pub mod world;

pub use api::FortSim;
pub use catalog::{Cost, EnemyType, UnitCard, UnitType};
pub use command::Command;
pub use components::*;
pub use config::{ConfigError, SimConfig};
pub use decisions::{Decision, DecisionCatalog, DecisionOption, Effect};
pub use handle::{SimHandle, SimHandleError};
pub use state::*;
pub use systems::*;
pub use world::{DefenderSnapshot, EnemySnapshot, GameSnapshot};
