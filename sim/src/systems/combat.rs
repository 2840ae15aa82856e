//! Combat system - defenders attack enemies in range.
//!
//! ## Targeting
//!
//! Each ready defender takes the first enemy, in spawn order, whose distance
//! is within its range. Distance only filters; it never ranks. Enemies hit
//! to zero earlier in the same pass stay in the list until cleanup, so a
//! later defender can still pick them (no kill, no backlash, ammunition is
//! spent as usual).
//!
//! ## Phases
//!
//! 1. **Gather** - snapshot enemies into an ordered target list.
//! 2. **Resolve** - walk defenders in id order, applying hits to the list,
//!    backlash to the attacker and ammunition drain to the stockpile.
//! 3. **Apply** - write target health back to the enemy entities.
//!
//! `casualty_system` runs afterwards and removes everything at zero health.

use crate::catalog::{EnemyType, UnitType};
use crate::components::*;
use crate::state::{SimClock, SimEvent, Supplies, TickLog};
use bevy_ecs::prelude::*;

/// Fraction of a slain enemy's damage stat taken by the defender that killed it.
const BACKLASH_FRACTION: f32 = 0.5;

/// An enemy as seen by the resolve phase.
#[derive(Debug, Clone, Copy)]
struct Target {
    entity: Entity,
    id: UnitId,
    position: Position,
    health: f32,
    damage: f32,
}

/// Index of the first target within `range` of `from`, in list order.
fn first_in_range(targets: &[Target], from: &Position, range: f32) -> Option<usize> {
    targets
        .iter()
        .position(|t| t.position.distance_to(from) <= range)
}

/// System that resolves defender attacks for the current tick.
pub fn combat_system(
    clock: Res<SimClock>,
    mut supplies: ResMut<Supplies>,
    mut log: ResMut<TickLog>,
    mut defenders: Query<
        (Entity, &UnitId, &UnitType, &Position, &Weapon, &mut AttackClock, &mut Health),
        Without<EnemyType>,
    >,
    mut enemies: Query<(Entity, &UnitId, &Position, &ContactDamage, &mut Health), Without<UnitType>>,
) {
    let now = clock.elapsed_ms;

    // GATHER: enemies in spawn order
    let mut targets: Vec<Target> = enemies
        .iter()
        .map(|(entity, id, pos, contact, health)| Target {
            entity,
            id: *id,
            position: *pos,
            health: health.current,
            damage: contact.0,
        })
        .collect();
    if targets.is_empty() {
        return;
    }
    targets.sort_unstable_by_key(|t| t.id);

    let mut order: Vec<(UnitId, Entity)> = defenders
        .iter()
        .map(|(entity, id, ..)| (*id, entity))
        .collect();
    order.sort_unstable_by_key(|(id, _)| *id);

    // RESOLVE
    let mut attacks = 0usize;
    for (defender_id, entity) in order {
        let Ok((_, _, unit, position, weapon, mut attack_clock, mut health)) =
            defenders.get_mut(entity)
        else {
            continue;
        };
        if !attack_clock.is_ready(now, weapon.cooldown_ms) {
            continue;
        }
        let Some(index) = first_in_range(&targets, position, weapon.range) else {
            continue;
        };

        let target = &mut targets[index];
        let previous = target.health;
        target.health -= weapon.damage;
        attack_clock.fire(now);
        attacks += 1;

        if previous > 0.0 && target.health <= 0.0 {
            let backlash = target.damage * BACKLASH_FRACTION;
            health.damage(backlash);
            log.push(SimEvent::EnemySlain {
                id: target.id.0,
                by: defender_id.0,
            });
        } else {
            supplies.ammunition -= unit.ammo_per_shot();
        }
    }

    // APPLY
    for target in &targets {
        if let Ok((_, _, _, _, mut health)) = enemies.get_mut(target.entity) {
            health.current = target.health.max(0.0);
        }
    }

    if attacks > 0 {
        tracing::trace!(attacks, ammunition = supplies.ammunition, "combat resolved");
    }
}

/// System that removes dead defenders and enemies.
///
/// A fallen hero is flagged on the tick log so progression can end the game.
pub fn casualty_system(
    mut commands: Commands,
    mut log: ResMut<TickLog>,
    defenders: Query<(Entity, &UnitId, &UnitType, &Health)>,
    enemies: Query<(Entity, &Health), With<EnemyType>>,
) {
    let mut fallen: Vec<(UnitId, UnitType, Entity)> = defenders
        .iter()
        .filter(|(_, _, _, health)| !health.is_alive())
        .map(|(entity, id, unit, _)| (*id, *unit, entity))
        .collect();
    fallen.sort_unstable_by_key(|(id, ..)| *id);

    for (id, unit, entity) in fallen {
        if unit.is_hero() {
            log.hero_fallen = true;
        }
        tracing::debug!(id = id.0, ?unit, "defender fell");
        log.push(SimEvent::DefenderFell { id: id.0, unit });
        commands.entity(entity).despawn();
    }

    for (entity, health) in enemies.iter() {
        if !health.is_alive() {
            commands.entity(entity).despawn();
        }
    }
}
