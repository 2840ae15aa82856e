//! Public API for the simulation.
//!
//! `FortSim` owns the ECS world and tick schedule. It is the single writer of
//! game state: renderers and UI read `GameSnapshot`s and change state only
//! through the command methods below (or `Command` values via `apply`).
//!
//! ## Frame gating
//!
//! `step(frame_dt)` is meant to be called once per display frame. Real time
//! accumulates until at least `min_tick_interval_ms` has passed, then one tick
//! runs with the accumulated time scaled by the game speed. While the game is
//! not running (pre-start, paused, decision pending, game over) accumulated
//! time is discarded, so resuming never produces a catch-up jump.
//!
//! ## Commands
//!
//! Every command is total: invalid input leaves the state untouched.

use crate::catalog::{EnemyType, UnitType};
use crate::command::Command;
use crate::components::*;
use crate::config::SimConfig;
use crate::decisions::DecisionCatalog;
use crate::state::*;
use crate::systems::*;
use crate::waves::generate_wave;
use crate::world::GameSnapshot;
use bevy_ecs::prelude::*;

/// The simulation container.
pub struct FortSim {
    world: World,
    schedule: Schedule,
    /// Real seconds accumulated since the last tick.
    time_accumulator: f32,
}

impl FortSim {
    /// Create a simulation with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a simulation with a fixed RNG seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(SimConfig::seeded(seed))
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self::with_catalog(config, DecisionCatalog::default())
    }

    /// Create a simulation with a custom decision pool.
    pub fn with_catalog(config: SimConfig, catalog: DecisionCatalog) -> Self {
        let mut world = World::new();

        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(SimClock::default());
        world.insert_resource(SimRng::from_config(&config));
        world.insert_resource(Supplies::from_config(&config));
        world.insert_resource(Morale::new(config.starting_morale));
        world.insert_resource(Campaign::from_config(&config));
        world.insert_resource(Controls::default());
        world.insert_resource(NextUnitId::default());
        world.insert_resource(TickLog::default());
        world.insert_resource(catalog);
        world.insert_resource(config);

        // Strictly sequential: each stage sees the previous stage's despawns.
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                tick_start_system,
                movement_system,
                fort_breach_system,
                combat_system,
                casualty_system,
                progression_system,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            time_accumulator: 0.0,
        }
    }

    // ------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------

    /// Feed `frame_dt` real seconds. Returns whether a tick ran.
    pub fn step(&mut self, frame_dt: f32) -> bool {
        if self.status() != GameStatus::Running {
            self.time_accumulator = 0.0;
            return false;
        }

        self.time_accumulator += frame_dt.max(0.0);
        if self.time_accumulator * 1000.0 < self.config().min_tick_interval_ms {
            return false;
        }

        let real_dt = std::mem::take(&mut self.time_accumulator);
        let scaled = real_dt * self.world.resource::<Controls>().speed.multiplier();
        self.advance(scaled)
    }

    /// Run one tick of `dt` scaled seconds, bypassing frame gating.
    ///
    /// Does nothing unless the game is running.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.status() != GameStatus::Running {
            return false;
        }
        self.world.resource_mut::<DeltaTime>().0 = dt;
        self.schedule.run(&mut self.world);
        true
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply a queued command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::PlaceDefender { x, y } => {
                self.place_defender(Position::new(x, y));
            }
            Command::SelectUnit { unit } => self.select_unit(unit),
            Command::TogglePause => self.toggle_pause(),
            Command::SetSpeed { speed } => self.set_speed(speed),
            Command::ResolveDecision { option_id } => {
                self.resolve_decision(&option_id);
            }
            Command::Reset => self.reset(),
        }
    }

    /// Begin the first wave. Only valid before the game has started.
    pub fn start(&mut self) {
        if self.campaign().phase != Phase::PreStart {
            tracing::debug!("start ignored, game already started");
            return;
        }

        let day = self.campaign().day;
        let roster = {
            let config = self.world.resource::<SimConfig>().clone();
            let mut rng = self.world.resource_mut::<SimRng>();
            generate_wave(1, day, &config, &mut rng.0)
        };
        for spawn in &roster {
            self.spawn_enemy(spawn);
        }

        {
            let mut campaign = self.world.resource_mut::<Campaign>();
            campaign.wave = 1;
            campaign.phase = Phase::WaveActive;
        }
        self.world.resource_mut::<TickLog>().push(SimEvent::WaveSpawned {
            day,
            wave: 1,
            enemies: roster.len(),
        });
        tracing::info!(day, enemies = roster.len(), "siege begins");
    }

    /// Place the selected unit at `position`. Returns whether a defender was added.
    pub fn place_defender(&mut self, position: Position) -> bool {
        match self.check_placement(&position) {
            Ok(unit) => {
                let id = self.world.resource_mut::<NextUnitId>().allocate();
                self.world.spawn(DefenderBundle::new(id, unit, position));
                self.world.resource_mut::<Supplies>().spend(unit.cost());
                if unit.is_hero() {
                    self.world.resource_mut::<Campaign>().rani_available = false;
                }
                self.world.resource_mut::<Controls>().selected_unit = None;
                tracing::debug!(id, ?unit, x = position.x, y = position.y, "defender placed");
                true
            }
            Err(reason) => {
                tracing::debug!(reason, x = position.x, y = position.y, "placement rejected");
                false
            }
        }
    }

    fn check_placement(&mut self, position: &Position) -> Result<UnitType, &'static str> {
        let campaign = self.world.resource::<Campaign>();
        let controls = self.world.resource::<Controls>();
        let unit = controls.selected_unit.ok_or("no unit selected")?;

        if campaign.phase.is_game_over() {
            return Err("game over");
        }
        if campaign.phase == Phase::DecisionPending {
            return Err("decision pending");
        }
        if controls.paused {
            return Err("paused");
        }
        if !self.world.resource::<SimConfig>().is_placeable(position) {
            return Err("out of bounds");
        }
        if unit.is_hero() && !campaign.rani_available {
            return Err("hero already deployed");
        }
        if !self.world.resource::<Supplies>().can_afford(unit.cost()) {
            return Err("insufficient supplies");
        }
        if unit.is_hero() && self.defender_count(UnitType::Rani) > 0 {
            return Err("hero already on the field");
        }
        Ok(unit)
    }

    /// Store the picker selection. Toggling is the caller's concern.
    pub fn select_unit(&mut self, unit: Option<UnitType>) {
        self.world.resource_mut::<Controls>().selected_unit = unit;
    }

    pub fn toggle_pause(&mut self) {
        let mut controls = self.world.resource_mut::<Controls>();
        controls.paused = !controls.paused;
        tracing::debug!(paused = controls.paused, "pause toggled");
    }

    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.world.resource_mut::<Controls>().speed = speed;
    }

    /// Choose an option of the pending decision. Returns whether it applied.
    pub fn resolve_decision(&mut self, option_id: &str) -> bool {
        let effect = {
            let campaign = self.world.resource::<Campaign>();
            if campaign.phase != Phase::DecisionPending {
                return false;
            }
            let Some(option) = campaign
                .active_decision
                .as_ref()
                .and_then(|d| d.option(option_id))
            else {
                tracing::debug!(option_id, "unknown decision option");
                return false;
            };
            option.effect
        };

        self.world.resource_mut::<Supplies>().apply(&effect);
        self.world.resource_mut::<Morale>().adjust(effect.morale);
        let mut campaign = self.world.resource_mut::<Campaign>();
        campaign.active_decision = None;
        campaign.phase = Phase::AwaitingWave;
        tracing::debug!(option_id, ?effect, "decision resolved");
        true
    }

    /// Return to the initial state, keeping configuration and decision pool.
    pub fn reset(&mut self) {
        let config = self.config().clone();
        let catalog = self.world.resource::<DecisionCatalog>().clone();
        *self = Self::with_catalog(config, catalog);
        tracing::info!("simulation reset");
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn status(&self) -> GameStatus {
        GameStatus::from_phase(
            self.world.resource::<Campaign>().phase,
            self.world.resource::<Controls>().paused,
        )
    }

    /// Build a snapshot. Events recorded since the previous snapshot move into it.
    pub fn snapshot(&mut self) -> GameSnapshot {
        let events = self.world.resource_mut::<TickLog>().drain();
        let mut snapshot = GameSnapshot::from_world(&mut self.world);
        snapshot.events = events;
        snapshot
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    pub fn campaign(&self) -> &Campaign {
        self.world.resource::<Campaign>()
    }

    pub fn supplies(&self) -> Supplies {
        *self.world.resource::<Supplies>()
    }

    pub fn morale(&self) -> i32 {
        self.world.resource::<Morale>().value()
    }

    pub fn controls(&self) -> Controls {
        *self.world.resource::<Controls>()
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<SimClock>().tick
    }

    pub fn defender_count(&mut self, unit: UnitType) -> usize {
        let mut query = self.world.query::<&UnitType>();
        query.iter(&self.world).filter(|u| **u == unit).count()
    }

    pub fn enemy_count(&mut self) -> usize {
        let mut query = self.world.query::<&EnemyType>();
        query.iter(&self.world).count()
    }

    /// Put an enemy on the field directly. Returns its id.
    ///
    /// Used by the wave start and by scripted scenarios.
    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn) -> u32 {
        let id = self.world.resource_mut::<NextUnitId>().allocate();
        self.world.spawn(EnemyBundle::new(id, spawn));
        id
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for FortSim {
    fn default() -> Self {
        Self::new()
    }
}
