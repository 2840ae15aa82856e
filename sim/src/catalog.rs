//! Static unit and enemy data.
//!
//! Every defender and enemy type is a closed enum; stats are resolved through
//! exhaustive lookup tables so adding a type is a compile error until its
//! numbers exist.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// DEFENDERS
// ============================================================================

/// Defender type placed by the player.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Musketeer,
    Swordsman,
    Cannon,
    /// Hero unit. One per game.
    Rani,
}

/// Base stats for a freshly placed defender.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitStats {
    pub max_health: f32,
    pub range: f32,
    pub damage: f32,
    /// Minimum simulation time between attacks, in milliseconds.
    pub cooldown_ms: f64,
}

/// Placement cost. Zero means the resource is not checked at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub ammunition: i32,
    pub food: i32,
}

/// Presentation data for the unit picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitCard {
    pub unit: UnitType,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: Cost,
}

impl UnitType {
    pub const ALL: [UnitType; 4] = [
        UnitType::Musketeer,
        UnitType::Swordsman,
        UnitType::Cannon,
        UnitType::Rani,
    ];

    pub fn stats(self) -> UnitStats {
        match self {
            UnitType::Musketeer => UnitStats {
                max_health: 100.0,
                range: 150.0,
                damage: 25.0,
                cooldown_ms: 1500.0,
            },
            UnitType::Swordsman => UnitStats {
                max_health: 150.0,
                range: 50.0,
                damage: 35.0,
                cooldown_ms: 1000.0,
            },
            UnitType::Cannon => UnitStats {
                max_health: 200.0,
                range: 200.0,
                damage: 60.0,
                cooldown_ms: 3000.0,
            },
            UnitType::Rani => UnitStats {
                max_health: 300.0,
                range: 120.0,
                damage: 50.0,
                cooldown_ms: 800.0,
            },
        }
    }

    pub fn cost(self) -> Cost {
        match self {
            UnitType::Musketeer => Cost { ammunition: 15, food: 0 },
            UnitType::Swordsman => Cost { ammunition: 0, food: 5 },
            UnitType::Cannon => Cost { ammunition: 50, food: 0 },
            UnitType::Rani => Cost::default(),
        }
    }

    /// Ammunition drawn from the shared pool by a non-lethal attack.
    pub fn ammo_per_shot(self) -> i32 {
        match self {
            UnitType::Musketeer => 1,
            UnitType::Cannon => 3,
            UnitType::Swordsman | UnitType::Rani => 0,
        }
    }

    pub fn is_hero(self) -> bool {
        matches!(self, UnitType::Rani)
    }

    pub fn card(self) -> UnitCard {
        let (name, description) = match self {
            UnitType::Musketeer => ("Musketeer", "Ranged defender"),
            UnitType::Swordsman => ("Swordsman", "Melee defender"),
            UnitType::Cannon => ("Cannon", "Heavy long-range gun"),
            UnitType::Rani => ("Rani Lakshmibai", "Hero unit"),
        };
        UnitCard {
            unit: self,
            name,
            description,
            cost: self.cost(),
        }
    }
}

// ============================================================================
// ENEMIES
// ============================================================================

/// Besieging enemy type.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    Infantry,
    Cavalry,
    Artillery,
}

/// Unscaled enemy stats. Wave and day multipliers are applied by the wave generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
}

impl EnemyType {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyType::Infantry => EnemyStats {
                health: 80.0,
                speed: 0.5,
                damage: 15.0,
            },
            EnemyType::Cavalry => EnemyStats {
                health: 120.0,
                speed: 1.2,
                damage: 25.0,
            },
            EnemyType::Artillery => EnemyStats {
                health: 60.0,
                speed: 0.3,
                damage: 40.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_gunners_spend_ammunition() {
        assert_eq!(UnitType::Musketeer.ammo_per_shot(), 1);
        assert_eq!(UnitType::Cannon.ammo_per_shot(), 3);
        assert_eq!(UnitType::Swordsman.ammo_per_shot(), 0);
        assert_eq!(UnitType::Rani.ammo_per_shot(), 0);
    }

    #[test]
    fn test_hero_is_free() {
        assert_eq!(UnitType::Rani.cost(), Cost::default());
        assert!(UnitType::Rani.is_hero());
        assert_eq!(UnitType::ALL.iter().filter(|u| u.is_hero()).count(), 1);
    }

    #[test]
    fn test_serde_names_are_snake_case() {
        let json = serde_json::to_string(&UnitType::Musketeer).unwrap();
        assert_eq!(json, "\"musketeer\"");
        let enemy: EnemyType = serde_json::from_str("\"cavalry\"").unwrap();
        assert_eq!(enemy, EnemyType::Cavalry);
    }
}
