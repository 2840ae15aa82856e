//! ECS components for the siege simulation.
//!
//! Components are pure data containers attached to entities.
//! All game logic lives in systems that query these components.

use crate::catalog::{EnemyType, UnitType};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 2D position on the battlefield (x grows toward the fort, y across lanes).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Where an enemy is marching and how fast (world units per 1/60 s).
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct March {
    pub target: Position,
    pub speed: f32,
}

/// Approach lane, 0..3 from top to bottom.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lane(pub u8);

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Stable identifier shared by defenders and enemies.
///
/// Ids are handed out in creation order, so sorting by id reproduces the
/// order in which units entered the field.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

// ============================================================================
// COMBAT COMPONENTS
// ============================================================================

#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }
}

/// A defender's attack profile.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weapon {
    pub range: f32,
    pub damage: f32,
    pub cooldown_ms: f64,
}

/// Simulation time of a defender's last attack.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AttackClock {
    /// `None` until the first attack, so a new defender may fire at once.
    pub last_attack_ms: Option<f64>,
}

impl AttackClock {
    pub fn is_ready(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        match self.last_attack_ms {
            None => true,
            Some(last) => now_ms - last >= cooldown_ms,
        }
    }

    pub fn fire(&mut self, now_ms: f64) {
        self.last_attack_ms = Some(now_ms);
    }
}

/// An enemy's damage stat. Defenders that kill it take half as backlash.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContactDamage(pub f32);

// ============================================================================
// BUNDLE HELPERS
// ============================================================================

/// Bundle for spawning a defender.
#[derive(Bundle)]
pub struct DefenderBundle {
    pub id: UnitId,
    pub unit: UnitType,
    pub position: Position,
    pub health: Health,
    pub weapon: Weapon,
    pub clock: AttackClock,
}

impl DefenderBundle {
    pub fn new(id: u32, unit: UnitType, position: Position) -> Self {
        let stats = unit.stats();
        Self {
            id: UnitId(id),
            unit,
            position,
            health: Health::new(stats.max_health),
            weapon: Weapon {
                range: stats.range,
                damage: stats.damage,
                cooldown_ms: stats.cooldown_ms,
            },
            clock: AttackClock::default(),
        }
    }
}

/// A fully scaled enemy, ready to be placed on the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyType,
    pub lane: u8,
    pub position: Position,
    pub target: Position,
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
}

/// Bundle for spawning an enemy.
#[derive(Bundle)]
pub struct EnemyBundle {
    pub id: UnitId,
    pub kind: EnemyType,
    pub lane: Lane,
    pub position: Position,
    pub march: March,
    pub health: Health,
    pub contact: ContactDamage,
}

impl EnemyBundle {
    pub fn new(id: u32, spawn: &EnemySpawn) -> Self {
        Self {
            id: UnitId(id),
            kind: spawn.kind,
            lane: Lane(spawn.lane),
            position: spawn.position,
            march: March {
                target: spawn.target,
                speed: spawn.speed,
            },
            health: Health::new(spawn.health),
            contact: ContactDamage(spawn.damage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_clock_ready_before_first_shot() {
        let clock = AttackClock::default();
        assert!(clock.is_ready(0.0, 1500.0));
    }

    #[test]
    fn test_attack_clock_respects_cooldown() {
        let mut clock = AttackClock::default();
        clock.fire(1000.0);
        assert!(!clock.is_ready(2499.0, 1500.0));
        assert!(clock.is_ready(2500.0, 1500.0));
    }

    #[test]
    fn test_health_floors_at_zero() {
        let mut health = Health::new(30.0);
        health.damage(45.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_defender_bundle_uses_catalog_stats() {
        let bundle = DefenderBundle::new(3, UnitType::Cannon, Position::new(10.0, 200.0));
        assert_eq!(bundle.health.max, 200.0);
        assert_eq!(bundle.weapon.range, 200.0);
        assert_eq!(bundle.weapon.cooldown_ms, 3000.0);
    }
}
