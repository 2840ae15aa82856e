//! Simulation configuration.
//!
//! All gameplay constants live on `SimConfig`, inserted into the ECS world as
//! a resource. Overrides can be loaded from TOML; keys that are not present
//! keep their defaults.

use crate::components::Position;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Starting stockpile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingSupplies {
    pub ammunition: i32,
    pub food: i32,
    pub medical: i32,
}

impl Default for StartingSupplies {
    fn default() -> Self {
        Self {
            ammunition: 300,
            food: 100,
            medical: 50,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frames closer together than this (real milliseconds) are folded into the next tick.
    pub min_tick_interval_ms: f32,
    /// Battlefield width in world units. The fort occupies the right edge.
    pub field_width: f32,
    pub field_height: f32,
    /// Enemies at or past this x coordinate have breached the fort.
    pub fort_threshold_x: f32,
    /// x coordinate enemies march toward.
    pub fort_front_x: f32,
    /// y coordinate of lane 0.
    pub first_lane_y: f32,
    pub lane_spacing: f32,
    /// x coordinate of the first enemy in each lane.
    pub spawn_x: f32,
    /// Distance between successive enemies in the same lane.
    pub spawn_spacing: f32,
    /// Morale lost per enemy reaching the fort.
    pub breach_penalty: i32,
    pub total_waves: u32,
    /// Clearing the last wave of this day wins the game.
    pub final_day: u32,
    pub initial_countdown: f32,
    pub next_wave_countdown: f32,
    pub next_day_countdown: f32,
    pub starting_supplies: StartingSupplies,
    pub starting_morale: i32,
    /// Width of the strip along the right edge reserved for the fort.
    pub fort_strip_width: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            min_tick_interval_ms: 16.0,
            field_width: 700.0,
            field_height: 500.0,
            fort_threshold_x: 580.0,
            fort_front_x: 600.0,
            first_lane_y: 150.0,
            lane_spacing: 120.0,
            spawn_x: -50.0,
            spawn_spacing: 60.0,
            breach_penalty: 5,
            total_waves: 3,
            final_day: 3,
            initial_countdown: 30.0,
            next_wave_countdown: 15.0,
            next_day_countdown: 30.0,
            starting_supplies: StartingSupplies::default(),
            starting_morale: 100,
            fort_strip_width: 100.0,
            top_margin: 100.0,
            bottom_margin: 20.0,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_tick_interval_ms.is_finite() || self.min_tick_interval_ms <= 0.0 {
            return Err(ConfigError::Invalid(
                "min_tick_interval_ms must be positive".into(),
            ));
        }
        if self.total_waves == 0 {
            return Err(ConfigError::Invalid("total_waves must be at least 1".into()));
        }
        if self.final_day == 0 {
            return Err(ConfigError::Invalid("final_day must be at least 1".into()));
        }
        if self.fort_threshold_x <= self.spawn_x || self.fort_threshold_x > self.field_width {
            return Err(ConfigError::Invalid(format!(
                "fort_threshold_x {} must lie between spawn_x {} and field_width {}",
                self.fort_threshold_x, self.spawn_x, self.field_width
            )));
        }
        Ok(())
    }

    /// y coordinate of a lane.
    pub fn lane_y(&self, lane: u8) -> f32 {
        self.first_lane_y + f32::from(lane) * self.lane_spacing
    }

    /// Whether a defender may stand at `position`: outside the fort strip and
    /// clear of the top and bottom edges.
    pub fn is_placeable(&self, position: &Position) -> bool {
        position.x >= 0.0
            && position.x < self.field_width - self.fort_strip_width
            && position.y > self.top_margin
            && position.y < self.field_height - self.bottom_margin
    }
}
