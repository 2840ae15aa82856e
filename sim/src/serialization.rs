//! JSON helpers for snapshots and commands.

use crate::command::Command;
use crate::world::GameSnapshot;

/// Serialize a snapshot to JSON bytes.
pub fn snapshot_to_json(snapshot: &GameSnapshot) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(snapshot)
}

/// Serialize a snapshot to a JSON string.
pub fn snapshot_to_json_string(snapshot: &GameSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

/// Deserialize a snapshot from JSON bytes.
pub fn snapshot_from_json(data: &[u8]) -> Result<GameSnapshot, serde_json::Error> {
    serde_json::from_slice(data)
}

/// Deserialize a snapshot from a JSON string.
pub fn snapshot_from_json_string(data: &str) -> Result<GameSnapshot, serde_json::Error> {
    serde_json::from_str(data)
}

/// Parse one command, e.g. a line received from a UI process.
pub fn command_from_json(data: &str) -> Result<Command, serde_json::Error> {
    serde_json::from_str(data)
}

pub fn command_to_json(command: &Command) -> Result<String, serde_json::Error> {
    serde_json::to_string(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FortSim;
    use crate::catalog::UnitType;
    use crate::components::Position;
    use crate::state::{GameStatus, SimEvent};

    #[test]
    fn test_snapshot_survives_json() {
        let mut sim = FortSim::with_seed(11);
        sim.start();
        sim.select_unit(Some(UnitType::Musketeer));
        sim.place_defender(Position::new(400.0, 150.0));
        sim.advance(0.1);

        let snapshot = sim.snapshot();
        let bytes = snapshot_to_json(&snapshot).unwrap();
        let restored = snapshot_from_json(&bytes).unwrap();

        assert_eq!(restored.defenders.len(), 1);
        assert_eq!(restored.defenders[0].unit, UnitType::Musketeer);
        assert_eq!(restored.enemies.len(), snapshot.enemies.len());
        assert_eq!(restored.status, GameStatus::Running);
        assert!(matches!(restored.events[0], SimEvent::WaveSpawned { wave: 1, .. }));
    }

    #[test]
    fn test_snapshot_uses_readable_names() {
        let mut sim = FortSim::with_seed(11);
        let json = snapshot_to_json_string(&sim.snapshot()).unwrap();
        assert!(json.contains(r#""status":"pre_start""#));
        assert!(json.contains(r#""time_of_day":"dawn""#));
        assert!(json.contains(r#""speed":1"#));
        assert!(snapshot_from_json_string(&json).is_ok());
    }

    #[test]
    fn test_command_text_round_trip() {
        let command = Command::ResolveDecision {
            option_id: "reinforce".into(),
        };
        let text = command_to_json(&command).unwrap();
        assert_eq!(text, r#"{"type":"resolve_decision","option_id":"reinforce"}"#);
        assert_eq!(command_from_json(&text).unwrap(), command);
        assert!(command_from_json(r#"{"type":"surrender"}"#).is_err());
    }
}
