//! Threaded simulation handle.
//!
//! `SimHandle::spawn` moves a `FortSim` onto its own thread. The thread is the
//! single writer: it drains the command queue, ticks on a fixed real-time
//! interval and publishes each new `GameSnapshot` behind an `Arc`, so readers
//! never block the loop for longer than a pointer swap.
//!
//! Events on a published snapshot cover everything since the previous
//! publication. Readers that skip snapshots also skip their events.

use crate::api::FortSim;
use crate::command::Command;
use crate::config::{ConfigError, SimConfig};
use crate::world::GameSnapshot;
use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimHandleError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("simulation thread has stopped")]
    Disconnected,
}

type SharedSnapshot = Arc<RwLock<Arc<GameSnapshot>>>;

pub struct SimHandle {
    commands: Sender<Command>,
    shutdown: Sender<()>,
    latest: SharedSnapshot,
    thread: Option<JoinHandle<()>>,
}

impl SimHandle {
    /// Start a simulation thread with `config`.
    pub fn spawn(config: SimConfig) -> Result<Self, SimHandleError> {
        config.validate()?;
        let interval = Duration::try_from_secs_f32(config.min_tick_interval_ms / 1000.0)
            .map_err(|e| ConfigError::Invalid(format!("min_tick_interval_ms: {e}")))?;

        let mut sim = FortSim::with_config(config);
        let latest: SharedSnapshot = Arc::new(RwLock::new(Arc::new(sim.snapshot())));
        let (commands, command_rx) = unbounded();
        let (shutdown, shutdown_rx) = unbounded();

        let published = Arc::clone(&latest);
        let thread = thread::Builder::new()
            .name("fort-sim".into())
            .spawn(move || run_loop(sim, interval, command_rx, shutdown_rx, published))?;

        tracing::info!(interval_ms = interval.as_secs_f64() * 1000.0, "simulation thread started");
        Ok(Self {
            commands,
            shutdown,
            latest,
            thread: Some(thread),
        })
    }

    /// Queue a command for the next loop iteration.
    pub fn send(&self, command: Command) -> Result<(), SimHandleError> {
        self.commands
            .send(command)
            .map_err(|_| SimHandleError::Disconnected)
    }

    /// Most recently published snapshot.
    pub fn latest(&self) -> Arc<GameSnapshot> {
        let guard = self
            .latest
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("simulation thread panicked");
            }
        }
    }
}

impl Drop for SimHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn publish(sim: &mut FortSim, latest: &SharedSnapshot) {
    let snapshot = Arc::new(sim.snapshot());
    let mut guard = latest.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = snapshot;
}

fn run_loop(
    mut sim: FortSim,
    interval: Duration,
    commands: Receiver<Command>,
    shutdown: Receiver<()>,
    latest: SharedSnapshot,
) {
    let ticker = tick(interval);
    let mut last_frame = Instant::now();

    loop {
        select! {
            recv(commands) -> msg => match msg {
                Ok(command) => {
                    tracing::trace!(?command, "command received");
                    sim.apply(command);
                    publish(&mut sim, &latest);
                }
                Err(_) => break,
            },
            recv(shutdown) -> _ => break,
            recv(ticker) -> at => {
                let now = at.unwrap_or_else(|_| Instant::now());
                let frame_dt = now.saturating_duration_since(last_frame).as_secs_f32();
                last_frame = now;
                if sim.step(frame_dt) {
                    publish(&mut sim, &latest);
                }
            }
        }
    }
    tracing::info!(tick = sim.current_tick(), "simulation thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameStatus;

    fn wait_for(handle: &SimHandle, pred: impl Fn(&GameSnapshot) -> bool) -> Arc<GameSnapshot> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let snapshot = handle.latest();
            if pred(&snapshot) || Instant::now() > deadline {
                return snapshot;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_initial_snapshot_is_pre_start() {
        let handle = SimHandle::spawn(SimConfig::seeded(1)).unwrap();
        let snapshot = handle.latest();
        assert_eq!(snapshot.status, GameStatus::PreStart);
        assert_eq!(snapshot.tick, 0);
        handle.shutdown();
    }

    #[test]
    fn test_commands_and_ticks_reach_snapshots() {
        let handle = SimHandle::spawn(SimConfig::seeded(2)).unwrap();
        handle.send(Command::Start).unwrap();

        let snapshot = wait_for(&handle, |s| s.tick >= 3);
        assert_eq!(snapshot.status, GameStatus::Running);
        assert_eq!(snapshot.wave, 1);
        assert!(snapshot.tick >= 3);
        handle.shutdown();
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimConfig {
            min_tick_interval_ms: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            SimHandle::spawn(config),
            Err(SimHandleError::Config(_))
        ));
    }
}
