//! Flat frame buffer for renderers.
//!
//! Packs the entities of a `GameSnapshot` into one contiguous `Vec<f32>` with
//! a fixed stride per entity, so a renderer can walk it without parsing JSON.
//!
//! # Buffer Layout (Version 1)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ HEADER (HEADER_SIZE elements)                                   │
//! │   [0] defender_count                                            │
//! │   [1] enemy_count                                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ ENTITIES ((defender_count + enemy_count) × ENTITY_STRIDE)       │
//! │ Defenders first, then enemies, each in ascending id order.      │
//! │   [+0] id                                                       │
//! │   [+1] kind        - see KIND_* constants                       │
//! │   [+2] x                                                        │
//! │   [+3] y                                                        │
//! │   [+4] health                                                   │
//! │   [+5] health_max                                               │
//! │   [+6] extra       - range (defender) or lane (enemy)           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same snapshot always produces the same buffer.

use crate::catalog::{EnemyType, UnitType};
use crate::world::GameSnapshot;

/// Number of f32 values per entity. Part of the renderer contract.
pub const ENTITY_STRIDE: usize = 7;

/// Number of f32 values in the header (defender count, enemy count).
pub const HEADER_SIZE: usize = 2;

pub const FIELD_ID: usize = 0;
pub const FIELD_KIND: usize = 1;
pub const FIELD_X: usize = 2;
pub const FIELD_Y: usize = 3;
pub const FIELD_HEALTH: usize = 4;
pub const FIELD_HEALTH_MAX: usize = 5;
pub const FIELD_EXTRA: usize = 6;

// Kind ids. Defenders occupy 0..4, enemies 10..13.
pub const KIND_MUSKETEER: f32 = 0.0;
pub const KIND_SWORDSMAN: f32 = 1.0;
pub const KIND_CANNON: f32 = 2.0;
pub const KIND_RANI: f32 = 3.0;
pub const KIND_INFANTRY: f32 = 10.0;
pub const KIND_CAVALRY: f32 = 11.0;
pub const KIND_ARTILLERY: f32 = 12.0;

#[inline]
pub fn unit_kind_id(unit: UnitType) -> f32 {
    match unit {
        UnitType::Musketeer => KIND_MUSKETEER,
        UnitType::Swordsman => KIND_SWORDSMAN,
        UnitType::Cannon => KIND_CANNON,
        UnitType::Rani => KIND_RANI,
    }
}

#[inline]
pub fn enemy_kind_id(kind: EnemyType) -> f32 {
    match kind {
        EnemyType::Infantry => KIND_INFANTRY,
        EnemyType::Cavalry => KIND_CAVALRY,
        EnemyType::Artillery => KIND_ARTILLERY,
    }
}

/// Convert a snapshot to a flat buffer.
pub fn snapshot_to_flatbuffer(snapshot: &GameSnapshot) -> Vec<f32> {
    let buffer_size = calculate_buffer_size(snapshot.defenders.len(), snapshot.enemies.len());
    let mut buffer = Vec::with_capacity(buffer_size);

    buffer.push(snapshot.defenders.len() as f32);
    buffer.push(snapshot.enemies.len() as f32);

    for d in &snapshot.defenders {
        buffer.extend_from_slice(&[
            d.id as f32,
            unit_kind_id(d.unit),
            d.x,
            d.y,
            d.health,
            d.health_max,
            d.range,
        ]);
    }
    for e in &snapshot.enemies {
        buffer.extend_from_slice(&[
            e.id as f32,
            enemy_kind_id(e.kind),
            e.x,
            e.y,
            e.health,
            e.health_max,
            f32::from(e.lane),
        ]);
    }

    debug_assert_eq!(buffer.len(), buffer_size, "Buffer size mismatch");
    buffer
}

#[inline]
pub fn calculate_buffer_size(defenders: usize, enemies: usize) -> usize {
    HEADER_SIZE + (defenders + enemies) * ENTITY_STRIDE
}

/// Read `(defender_count, enemy_count)` from a buffer header.
///
/// Returns `None` if the header is truncated.
pub fn parse_counts(buffer: &[f32]) -> Option<(usize, usize)> {
    match buffer {
        [defenders, enemies, ..] => Some((*defenders as usize, *enemies as usize)),
        _ => None,
    }
}

/// Offset of the `index`-th entity (defenders first).
#[inline]
pub const fn entity_offset(index: usize) -> usize {
    HEADER_SIZE + index * ENTITY_STRIDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FortSim;
    use crate::components::Position;

    #[test]
    fn test_pre_start_buffer_is_header_only() {
        let mut sim = FortSim::with_seed(1);
        let buffer = snapshot_to_flatbuffer(&sim.snapshot());
        assert_eq!(buffer, vec![0.0, 0.0]);
    }

    #[test]
    fn test_defenders_precede_enemies() {
        let mut sim = FortSim::with_seed(1);
        sim.start();
        sim.select_unit(Some(UnitType::Cannon));
        sim.place_defender(Position::new(450.0, 270.0));

        let snapshot = sim.snapshot();
        let buffer = snapshot_to_flatbuffer(&snapshot);

        assert_eq!(parse_counts(&buffer), Some((1, 4)));
        assert_eq!(buffer.len(), calculate_buffer_size(1, 4));

        let cannon = entity_offset(0);
        assert_eq!(buffer[cannon + FIELD_KIND], KIND_CANNON);
        assert_eq!(buffer[cannon + FIELD_X], 450.0);
        assert_eq!(buffer[cannon + FIELD_HEALTH_MAX], 200.0);
        assert_eq!(buffer[cannon + FIELD_EXTRA], 200.0);

        let first_enemy = entity_offset(1);
        assert_eq!(buffer[first_enemy + FIELD_ID], snapshot.enemies[0].id as f32);
        assert!(buffer[first_enemy + FIELD_KIND] >= KIND_INFANTRY);
        // First roster entry is at the head of the top lane
        assert_eq!(buffer[first_enemy + FIELD_X], -50.0);
        assert_eq!(buffer[first_enemy + FIELD_EXTRA], 0.0);
    }

    #[test]
    fn test_same_snapshot_same_buffer() {
        let mut a = FortSim::with_seed(3);
        let mut b = FortSim::with_seed(3);
        a.start();
        b.start();
        for _ in 0..20 {
            a.advance(0.05);
            b.advance(0.05);
        }
        assert_eq!(
            snapshot_to_flatbuffer(&a.snapshot()),
            snapshot_to_flatbuffer(&b.snapshot())
        );
    }

    #[test]
    fn test_parse_counts_truncated() {
        assert_eq!(parse_counts(&[]), None);
        assert_eq!(parse_counts(&[3.0]), None);
    }

    #[test]
    fn test_field_offsets_fit_stride() {
        assert_eq!(ENTITY_STRIDE, FIELD_EXTRA + 1);
        assert_eq!(entity_offset(2), HEADER_SIZE + 2 * ENTITY_STRIDE);
    }
}
