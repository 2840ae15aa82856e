//! Morale system - enemies that reach the fort cost the garrison morale.

use crate::catalog::EnemyType;
use crate::components::*;
use crate::config::SimConfig;
use crate::state::{Morale, SimEvent, TickLog};
use bevy_ecs::prelude::*;

/// System that removes enemies at or past the fort threshold and applies the
/// breach penalty once per enemy, then clamps morale.
pub fn fort_breach_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut morale: ResMut<Morale>,
    mut log: ResMut<TickLog>,
    query: Query<(Entity, &UnitId, &Position), With<EnemyType>>,
) {
    let mut breached: Vec<(UnitId, Entity)> = query
        .iter()
        .filter(|(_, _, pos)| pos.x >= config.fort_threshold_x)
        .map(|(entity, id, _)| (*id, entity))
        .collect();

    if breached.is_empty() {
        return;
    }
    breached.sort_unstable_by_key(|(id, _)| *id);

    let count = i32::try_from(breached.len()).unwrap_or(i32::MAX);
    morale.adjust(-config.breach_penalty.saturating_mul(count));
    tracing::debug!(
        breached = breached.len(),
        morale = morale.value(),
        "enemies reached the fort"
    );

    for (id, entity) in breached {
        log.push(SimEvent::EnemyBreached { id: id.0 });
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(morale: i32) -> World {
        let mut world = World::new();
        world.insert_resource(SimConfig::default());
        world.insert_resource(Morale::new(morale));
        world.insert_resource(TickLog::default());
        world
    }

    fn spawn_enemy(world: &mut World, id: u32, x: f32) -> Entity {
        world
            .spawn((UnitId(id), EnemyType::Infantry, Position::new(x, 150.0)))
            .id()
    }

    fn run_once(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(fort_breach_system);
        schedule.run(world);
    }

    #[test]
    fn test_breach_costs_morale_and_removes_enemy() {
        let mut world = setup(100);
        let inside = spawn_enemy(&mut world, 1, 585.0);
        let outside = spawn_enemy(&mut world, 2, 400.0);

        run_once(&mut world);

        assert_eq!(world.resource::<Morale>().value(), 95);
        assert!(world.get::<Position>(inside).is_none());
        assert!(world.get::<Position>(outside).is_some());
        assert_eq!(
            world.resource::<TickLog>().events,
            vec![SimEvent::EnemyBreached { id: 1 }]
        );
    }

    #[test]
    fn test_mass_breach_clamps_to_zero() {
        let mut world = setup(90);
        for id in 0..20 {
            spawn_enemy(&mut world, id, 580.0);
        }

        run_once(&mut world);

        assert_eq!(world.resource::<Morale>().value(), 0);
        let mut query = world.query::<&EnemyType>();
        assert_eq!(query.iter(&world).count(), 0);
    }

    #[test]
    fn test_defenders_never_breach() {
        let mut world = setup(100);
        world.spawn((UnitId(7), Position::new(650.0, 150.0)));

        run_once(&mut world);

        assert_eq!(world.resource::<Morale>().value(), 100);
    }
}
