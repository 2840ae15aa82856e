//! Narrative branch points offered between days.

use bevy_ecs::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Resource and morale deltas applied when an option is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effect {
    pub ammunition: i32,
    pub food: i32,
    pub medical: i32,
    pub morale: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: String,
    pub text: String,
    pub consequence: String,
    pub effect: Effect,
}

/// A two-way choice presented at a day boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub title: String,
    pub description: String,
    pub quote: String,
    pub options: Vec<DecisionOption>,
}

impl Decision {
    pub fn option(&self, option_id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Pool of decisions drawn from at each day boundary.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct DecisionCatalog {
    pub decisions: Vec<Decision>,
}

impl DecisionCatalog {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self { decisions }
    }

    /// Draw one decision uniformly at random. `None` only for an empty pool.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Decision> {
        if self.decisions.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.decisions.len());
        self.decisions.get(index)
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

impl Default for DecisionCatalog {
    fn default() -> Self {
        Self::new(vec![
            Decision {
                id: "reinforce_or_evacuate".into(),
                title: "A Difficult Choice".into(),
                description: "The eastern wall shows signs of damage. Civilians gather at the gates, seeking safety.".into(),
                quote: "\"We will not abandon our people, nor shall we abandon our walls.\"".into(),
                options: vec![
                    DecisionOption {
                        id: "reinforce".into(),
                        text: "Reinforce the Walls".into(),
                        consequence: "Spend resources to strengthen defenses".into(),
                        effect: Effect { ammunition: -30, morale: 10, ..Default::default() },
                    },
                    DecisionOption {
                        id: "evacuate".into(),
                        text: "Evacuate Civilians".into(),
                        consequence: "Use food to help civilians escape".into(),
                        effect: Effect { food: -20, morale: 15, ..Default::default() },
                    },
                ],
            },
            Decision {
                id: "messenger".into(),
                title: "Call for Aid".into(),
                description: "A brave messenger volunteers to ride to Tantia Tope for reinforcements.".into(),
                quote: "\"Every soul that fights for Jhansi is worth a hundred of theirs.\"".into(),
                options: vec![
                    DecisionOption {
                        id: "send".into(),
                        text: "Send the Messenger".into(),
                        consequence: "Risk losing supplies for potential reinforcements".into(),
                        effect: Effect { food: -15, ammunition: -10, ..Default::default() },
                    },
                    DecisionOption {
                        id: "conserve".into(),
                        text: "Conserve Resources".into(),
                        consequence: "Keep supplies but remain isolated".into(),
                        effect: Effect { morale: -10, ..Default::default() },
                    },
                ],
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_every_decision_has_two_options() {
        let catalog = DecisionCatalog::default();
        assert_eq!(catalog.len(), 2);
        for decision in &catalog.decisions {
            assert_eq!(decision.options.len(), 2, "{}", decision.id);
        }
    }

    #[test]
    fn test_pick_reaches_every_decision() {
        let catalog = DecisionCatalog::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            seen.insert(catalog.pick(&mut rng).unwrap().id.clone());
        }
        assert_eq!(seen.len(), catalog.len());
    }

    #[test]
    fn test_pick_from_empty_pool() {
        let catalog = DecisionCatalog::new(Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(catalog.pick(&mut rng).is_none());
    }

    #[test]
    fn test_option_lookup() {
        let catalog = DecisionCatalog::default();
        let decision = &catalog.decisions[1];
        assert_eq!(decision.option("conserve").unwrap().effect.morale, -10);
        assert!(decision.option("surrender").is_none());
    }
}
