//! Player intents.
//!
//! A `Command` is the only way a consumer changes game state. Commands are
//! plain data so they can cross a thread boundary or arrive as JSON, for
//! example `{"type":"place_defender","x":320.0,"y":150.0}`.

use crate::catalog::UnitType;
use crate::state::GameSpeed;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Start,
    PlaceDefender { x: f32, y: f32 },
    SelectUnit { unit: Option<UnitType> },
    TogglePause,
    SetSpeed { speed: GameSpeed },
    ResolveDecision { option_id: String },
    Reset,
}
