//! Progression system - wave, day and game-over transitions.
//!
//! ```text
//! AwaitingWave --countdown--> WaveActive --cleared--> AwaitingWave (next wave)
//!                                        \--cleared, last wave--> DecisionPending (next day)
//!                                        \--cleared, last wave, last day--> Victory
//! any --morale broken | hero fallen--> Defeat
//! ```
//!
//! Runs once per tick after combat cleanup. Defeat is checked first and
//! short-circuits everything else.

use crate::catalog::EnemyType;
use crate::components::EnemyBundle;
use crate::config::SimConfig;
use crate::decisions::DecisionCatalog;
use crate::state::*;
use crate::systems::movement::DeltaTime;
use crate::waves::generate_wave;
use bevy_ecs::prelude::*;

/// What a cleared wave leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    NextWave,
    NextDay,
    Victory,
}

/// Decide where a cleared wave leads.
pub fn clear_outcome(campaign: &Campaign, config: &SimConfig) -> ClearOutcome {
    if campaign.wave < campaign.total_waves {
        ClearOutcome::NextWave
    } else if campaign.day >= config.final_day {
        ClearOutcome::Victory
    } else {
        ClearOutcome::NextDay
    }
}

fn defeat(campaign: &mut Campaign, log: &mut TickLog, cause: DefeatCause) {
    campaign.phase = Phase::Defeat;
    log.push(SimEvent::Defeat { cause });
    tracing::info!(?cause, day = campaign.day, wave = campaign.wave, "fort has fallen");
}

#[allow(clippy::too_many_arguments)]
pub fn progression_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    config: Res<SimConfig>,
    catalog: Res<DecisionCatalog>,
    morale: Res<Morale>,
    mut campaign: ResMut<Campaign>,
    mut rng: ResMut<SimRng>,
    mut next_id: ResMut<NextUnitId>,
    mut log: ResMut<TickLog>,
    enemies: Query<(), With<EnemyType>>,
) {
    if !matches!(campaign.phase, Phase::AwaitingWave | Phase::WaveActive) {
        return;
    }

    if morale.is_broken() {
        defeat(&mut campaign, &mut log, DefeatCause::MoraleBroken);
        return;
    }
    if log.hero_fallen {
        defeat(&mut campaign, &mut log, DefeatCause::HeroFallen);
        return;
    }

    let remaining = enemies.iter().count();

    if remaining == 0 && log.enemies_at_start > 0 {
        log.push(SimEvent::WaveCleared {
            day: campaign.day,
            wave: campaign.wave,
        });

        match clear_outcome(&campaign, &config) {
            ClearOutcome::NextWave => {
                campaign.wave += 1;
                campaign.wave_countdown = config.next_wave_countdown;
                campaign.phase = Phase::AwaitingWave;
                tracing::info!(
                    day = campaign.day,
                    next_wave = campaign.wave,
                    countdown = campaign.wave_countdown,
                    "wave cleared"
                );
            }
            ClearOutcome::Victory => {
                campaign.phase = Phase::Victory;
                log.push(SimEvent::Victory);
                tracing::info!(day = campaign.day, "siege broken, victory");
                return;
            }
            ClearOutcome::NextDay => {
                let decision = catalog.pick(&mut rng.0).cloned();
                campaign.day += 1;
                campaign.wave = 0;
                campaign.wave_countdown = config.next_day_countdown;
                campaign.time_of_day = TimeOfDay::for_day(campaign.day);
                log.push(SimEvent::DayAdvanced {
                    day: campaign.day,
                    decision: decision.as_ref().map(|d| d.id.clone()),
                });
                tracing::info!(
                    day = campaign.day,
                    decision = decision.as_ref().map(|d| d.id.as_str()),
                    "day complete"
                );

                if decision.is_some() {
                    campaign.active_decision = decision;
                    campaign.phase = Phase::DecisionPending;
                    return;
                }
                campaign.phase = Phase::AwaitingWave;
            }
        }
    }

    if remaining == 0 && campaign.phase == Phase::AwaitingWave {
        campaign.wave_countdown -= dt.0;
        if campaign.wave_countdown <= 0.0 {
            // Wave 0 opens a new day and fights with wave 1 strength.
            let roster = generate_wave(campaign.wave.max(1), campaign.day, &config, &mut rng.0);
            for spawn in &roster {
                commands.spawn(EnemyBundle::new(next_id.allocate(), spawn));
            }
            campaign.phase = Phase::WaveActive;
            log.push(SimEvent::WaveSpawned {
                day: campaign.day,
                wave: campaign.wave,
                enemies: roster.len(),
            });
            tracing::info!(
                day = campaign.day,
                wave = campaign.wave,
                enemies = roster.len(),
                "wave spawned"
            );
        }
    }
}
