//! Global simulation state stored as ECS resources.

use crate::catalog::UnitType;
use crate::config::SimConfig;
use crate::decisions::{Decision, Effect};
use bevy_ecs::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ECONOMY
// ============================================================================

/// Shared stockpile. Values are allowed to go negative; nothing floors them.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplies {
    pub ammunition: i32,
    pub food: i32,
    pub medical: i32,
}

impl Supplies {
    pub fn from_config(config: &SimConfig) -> Self {
        let start = config.starting_supplies;
        Self {
            ammunition: start.ammunition,
            food: start.food,
            medical: start.medical,
        }
    }

    /// A zero cost component is never checked.
    pub fn can_afford(&self, cost: crate::catalog::Cost) -> bool {
        (cost.ammunition == 0 || self.ammunition >= cost.ammunition)
            && (cost.food == 0 || self.food >= cost.food)
    }

    pub fn spend(&mut self, cost: crate::catalog::Cost) {
        self.ammunition -= cost.ammunition;
        self.food -= cost.food;
    }

    pub fn apply(&mut self, effect: &Effect) {
        self.ammunition += effect.ammunition;
        self.food += effect.food;
        self.medical += effect.medical;
    }
}

pub const MORALE_MAX: i32 = 100;

/// Garrison morale, always within `0..=MORALE_MAX`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morale {
    value: i32,
}

impl Morale {
    pub fn new(value: i32) -> Self {
        Self {
            value: value.clamp(0, MORALE_MAX),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn adjust(&mut self, delta: i32) {
        self.value = self.value.saturating_add(delta).clamp(0, MORALE_MAX);
    }

    pub fn is_broken(&self) -> bool {
        self.value <= 0
    }
}

// ============================================================================
// CAMPAIGN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    /// Days cycle through dawn, day, dusk. Night is never reached by progression.
    pub fn for_day(day: u32) -> Self {
        match day.saturating_sub(1) % 3 {
            0 => TimeOfDay::Dawn,
            1 => TimeOfDay::Day,
            _ => TimeOfDay::Dusk,
        }
    }
}

/// Progression state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the player to start.
    PreStart,
    /// Field is clear; the countdown runs down to the next wave.
    AwaitingWave,
    WaveActive,
    /// Day complete; ticking halts until a decision option is chosen.
    DecisionPending,
    Victory,
    Defeat,
}

impl Phase {
    pub fn is_game_over(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }
}

/// Coarse status exposed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    PreStart,
    Running,
    Paused,
    DecisionPending,
    GameOver,
}

impl GameStatus {
    pub fn from_phase(phase: Phase, paused: bool) -> Self {
        match phase {
            Phase::PreStart => GameStatus::PreStart,
            Phase::Victory | Phase::Defeat => GameStatus::GameOver,
            Phase::DecisionPending => GameStatus::DecisionPending,
            Phase::AwaitingWave | Phase::WaveActive if paused => GameStatus::Paused,
            Phase::AwaitingWave | Phase::WaveActive => GameStatus::Running,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unsupported game speed {0}, expected 1 or 2")]
pub struct InvalidSpeed(pub u8);

/// Player-selected time multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GameSpeed {
    #[default]
    Normal,
    Double,
}

impl GameSpeed {
    pub fn multiplier(self) -> f32 {
        match self {
            GameSpeed::Normal => 1.0,
            GameSpeed::Double => 2.0,
        }
    }
}

impl TryFrom<u8> for GameSpeed {
    type Error = InvalidSpeed;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GameSpeed::Normal),
            2 => Ok(GameSpeed::Double),
            other => Err(InvalidSpeed(other)),
        }
    }
}

impl From<GameSpeed> for u8 {
    fn from(speed: GameSpeed) -> Self {
        match speed {
            GameSpeed::Normal => 1,
            GameSpeed::Double => 2,
        }
    }
}

/// Day, wave and decision bookkeeping.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub phase: Phase,
    pub day: u32,
    pub wave: u32,
    pub total_waves: u32,
    pub time_of_day: TimeOfDay,
    /// Seconds of simulated time until the next wave spawns.
    pub wave_countdown: f32,
    pub active_decision: Option<Decision>,
    pub rani_available: bool,
}

impl Campaign {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            phase: Phase::PreStart,
            day: 1,
            wave: 0,
            total_waves: config.total_waves,
            time_of_day: TimeOfDay::Dawn,
            wave_countdown: config.initial_countdown,
            active_decision: None,
            rani_available: true,
        }
    }
}

/// Player-facing toggles that do not affect progression directly.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub paused: bool,
    pub speed: GameSpeed,
    pub selected_unit: Option<UnitType>,
}

// ============================================================================
// CLOCK / RNG / BOOKKEEPING
// ============================================================================

/// Simulation clock in scaled milliseconds. Cooldowns are measured against it.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    pub tick: u64,
    pub elapsed_ms: f64,
}

impl SimClock {
    pub fn advance(&mut self, dt_seconds: f32) {
        self.tick = self.tick.wrapping_add(1);
        self.elapsed_ms += f64::from(dt_seconds) * 1000.0;
    }
}

/// Injectable random source for wave rolls and decision draws.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub ChaCha8Rng);

impl SimRng {
    pub fn from_config(config: &SimConfig) -> Self {
        match config.seed {
            Some(seed) => Self(ChaCha8Rng::seed_from_u64(seed)),
            None => Self(ChaCha8Rng::from_entropy()),
        }
    }
}

/// Source of fresh `UnitId`s.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct NextUnitId(pub u32);

impl NextUnitId {
    pub fn allocate(&mut self) -> u32 {
        let id = self.0;
        self.0 = self.0.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatCause {
    MoraleBroken,
    HeroFallen,
}

/// Notable things that happened during a tick, for UI and renderer consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    WaveSpawned { day: u32, wave: u32, enemies: usize },
    WaveCleared { day: u32, wave: u32 },
    DayAdvanced { day: u32, decision: Option<String> },
    EnemyBreached { id: u32 },
    EnemySlain { id: u32, by: u32 },
    DefenderFell { id: u32, unit: UnitType },
    Victory,
    Defeat { cause: DefeatCause },
}

/// Per-tick scratch data plus events accumulated until the next snapshot.
#[derive(Resource, Debug, Clone, Default)]
pub struct TickLog {
    /// Enemies on the field when the current tick began.
    pub enemies_at_start: usize,
    /// Set when the hero dies during the current tick.
    pub hero_fallen: bool,
    pub events: Vec<SimEvent>,
}

impl TickLog {
    pub fn begin_tick(&mut self, enemies: usize) {
        self.enemies_at_start = enemies;
        self.hero_fallen = false;
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
