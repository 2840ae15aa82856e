//! Tick bookkeeping that must run before any other system.

use crate::catalog::EnemyType;
use crate::state::{SimClock, TickLog};
use crate::systems::movement::DeltaTime;
use bevy_ecs::prelude::*;

/// Advance the simulation clock and record how many enemies the tick starts with.
pub fn tick_start_system(
    dt: Res<DeltaTime>,
    mut clock: ResMut<SimClock>,
    mut log: ResMut<TickLog>,
    enemies: Query<(), With<EnemyType>>,
) {
    clock.advance(dt.0);
    log.begin_tick(enemies.iter().count());
    tracing::trace!(tick = clock.tick, elapsed_ms = clock.elapsed_ms, "tick");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_in_scaled_milliseconds() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(0.032));
        world.insert_resource(SimClock::default());
        world.insert_resource(TickLog {
            hero_fallen: true,
            ..Default::default()
        });
        world.spawn(EnemyType::Cavalry);
        world.spawn(EnemyType::Infantry);

        let mut schedule = Schedule::default();
        schedule.add_systems(tick_start_system);
        schedule.run(&mut world);

        let clock = world.resource::<SimClock>();
        assert_eq!(clock.tick, 1);
        assert!((clock.elapsed_ms - 32.0).abs() < 1e-3);
        let log = world.resource::<TickLog>();
        assert_eq!(log.enemies_at_start, 2);
        assert!(!log.hero_fallen);
    }
}
