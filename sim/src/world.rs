//! Snapshot types.
//!
//! `GameSnapshot` is the read-only view of the simulation handed to renderers
//! and UI once per tick. Entities are listed in ascending id order so the same
//! world always produces the same snapshot.

use crate::catalog::{EnemyType, UnitType};
use crate::components::*;
use crate::decisions::Decision;
use crate::state::*;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single defender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenderSnapshot {
    pub id: u32,
    pub unit: UnitType,
    pub x: f32,
    pub y: f32,
    pub health: f32,
    pub health_max: f32,
    pub range: f32,
    /// Simulation time of the last attack, if any.
    pub last_attack_ms: Option<f64>,
}

/// Snapshot of a single enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub id: u32,
    pub kind: EnemyType,
    pub lane: u8,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub health: f32,
    pub health_max: f32,
    pub speed: f32,
    pub damage: f32,
}

/// Complete game state for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed scaled simulation time in milliseconds.
    pub time_ms: f64,
    pub day: u32,
    pub wave: u32,
    pub total_waves: u32,
    pub time_of_day: TimeOfDay,
    pub resources: Supplies,
    pub morale: i32,
    pub defenders: Vec<DefenderSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    pub is_playing: bool,
    pub is_paused: bool,
    pub speed: GameSpeed,
    pub selected_unit: Option<UnitType>,
    pub active_decision: Option<Decision>,
    pub wave_countdown: f32,
    pub rani_available: bool,
    pub game_over: bool,
    pub victory: bool,
    pub status: GameStatus,
    /// Events recorded since the previous snapshot.
    pub events: Vec<SimEvent>,
}

impl GameSnapshot {
    /// Create a snapshot from the ECS world. `events` is left empty.
    pub fn from_world(world: &mut World) -> Self {
        let mut defenders: Vec<DefenderSnapshot> = world
            .query::<(&UnitId, &UnitType, &Position, &Health, &Weapon, &AttackClock)>()
            .iter(world)
            .map(|(id, unit, pos, health, weapon, clock)| DefenderSnapshot {
                id: id.0,
                unit: *unit,
                x: pos.x,
                y: pos.y,
                health: health.current,
                health_max: health.max,
                range: weapon.range,
                last_attack_ms: clock.last_attack_ms,
            })
            .collect();
        defenders.sort_unstable_by_key(|d| d.id);

        let mut enemies: Vec<EnemySnapshot> = world
            .query::<(&UnitId, &EnemyType, &Lane, &Position, &March, &Health, &ContactDamage)>()
            .iter(world)
            .map(|(id, kind, lane, pos, march, health, contact)| EnemySnapshot {
                id: id.0,
                kind: *kind,
                lane: lane.0,
                x: pos.x,
                y: pos.y,
                target_x: march.target.x,
                target_y: march.target.y,
                health: health.current,
                health_max: health.max,
                speed: march.speed,
                damage: contact.0,
            })
            .collect();
        enemies.sort_unstable_by_key(|e| e.id);

        let clock = *world.resource::<SimClock>();
        let controls = *world.resource::<Controls>();
        let campaign = world.resource::<Campaign>();
        let game_over = campaign.phase.is_game_over();
        // Stays set once the game has ended; `game_over` tells the two apart.
        let is_playing = campaign.phase != Phase::PreStart;

        Self {
            tick: clock.tick,
            time_ms: clock.elapsed_ms,
            day: campaign.day,
            wave: campaign.wave,
            total_waves: campaign.total_waves,
            time_of_day: campaign.time_of_day,
            resources: *world.resource::<Supplies>(),
            morale: world.resource::<Morale>().value(),
            defenders,
            enemies,
            is_playing,
            is_paused: controls.paused,
            speed: controls.speed,
            selected_unit: controls.selected_unit,
            active_decision: campaign.active_decision.clone(),
            wave_countdown: campaign.wave_countdown,
            rani_available: campaign.rani_available,
            game_over,
            victory: campaign.phase == Phase::Victory,
            status: GameStatus::from_phase(campaign.phase, controls.paused),
            events: Vec::new(),
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
