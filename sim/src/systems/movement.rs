//! Movement system - marches enemies toward the fort.

use crate::components::*;
use bevy_ecs::prelude::*;

/// Resource containing the scaled delta time (seconds) for the current tick.
#[derive(Resource, Default)]
pub struct DeltaTime(pub f32);

/// Enemy speeds are expressed per 1/60 s frame.
const FRAMES_PER_SECOND: f32 = 60.0;

/// System that moves each enemy linearly toward its target without overshooting.
pub fn movement_system(dt: Res<DeltaTime>, mut query: Query<(&mut Position, &March)>) {
    let delta = dt.0;
    for (mut pos, march) in query.iter_mut() {
        let dx = march.target.x - pos.x;
        let dy = march.target.y - pos.y;
        let remaining = (dx * dx + dy * dy).sqrt();
        if remaining <= f32::EPSILON {
            continue;
        }

        let step = remaining.min(march.speed * delta * FRAMES_PER_SECOND);
        pos.x += dx / remaining * step;
        pos.y += dy / remaining * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_once(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(movement_system);
        schedule.run(world);
    }

    #[test]
    fn test_movement_scales_with_speed_and_dt() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(0.5));

        let entity = world
            .spawn((
                Position::new(0.0, 150.0),
                March {
                    target: Position::new(600.0, 150.0),
                    speed: 1.0,
                },
            ))
            .id();

        run_once(&mut world);

        let pos = world.get::<Position>(entity).unwrap();
        assert!((pos.x - 30.0).abs() < 0.001);
        assert_eq!(pos.y, 150.0);
    }

    #[test]
    fn test_movement_never_overshoots() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(10.0));

        let entity = world
            .spawn((
                Position::new(590.0, 270.0),
                March {
                    target: Position::new(600.0, 270.0),
                    speed: 2.5,
                },
            ))
            .id();

        run_once(&mut world);

        let pos = world.get::<Position>(entity).unwrap();
        assert_eq!(pos.x, 600.0);
    }

    #[test]
    fn test_movement_ignores_entities_without_march() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(1.0));

        let entity = world.spawn(Position::new(100.0, 200.0)).id();
        run_once(&mut world);

        let pos = world.get::<Position>(entity).unwrap();
        assert_eq!(pos.x, 100.0);
    }
}
