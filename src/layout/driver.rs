//! Frame-driven runner for the simulation
//!
//! Owns a `Simulation` on a tokio task, ticks it once per frame, and
//! publishes the positions through a `watch` channel. Commands (new graph
//! model, drag pin/release, restart) are queued and applied at the start of
//! the next frame. Dropping or shutting down the driver stops the task.

use super::simulation::{LayoutParams, NodePosition, Simulation, TickStatus};
use super::stop::StopSignal;
use super::vector::Vec2;
use crate::model::GraphModel;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Default frame interval (~60 fps)
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// A change requested from outside the loop
#[derive(Debug, Clone)]
pub enum LayoutCommand {
    /// Graph model rebuilt
    Sync(GraphModel),
    /// Drag in progress
    Pin { id: String, position: Vec2 },
    /// Drag ended
    Release { id: String },
    /// Re-seed alpha to full temperature
    Restart,
    /// Configuration changed
    SetParams(LayoutParams),
}

/// Snapshot published after each frame that changed something
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutFrame {
    /// Simulation ticks performed so far
    pub tick: u64,
    pub alpha: f64,
    pub settled: bool,
    pub positions: Vec<NodePosition>,
}

impl LayoutFrame {
    fn capture(sim: &Simulation) -> Self {
        Self {
            tick: sim.ticks(),
            alpha: sim.alpha(),
            settled: sim.is_settled(),
            positions: sim.positions(),
        }
    }

    pub fn position(&self, id: &str) -> Option<&NodePosition> {
        self.positions.iter().find(|p| p.id == id)
    }
}

/// Handle to a running layout loop.
#[derive(Debug)]
pub struct LayoutDriver {
    commands: mpsc::UnboundedSender<LayoutCommand>,
    frames: watch::Receiver<LayoutFrame>,
    stop: StopSignal,
    task: Option<JoinHandle<Simulation>>,
}

impl LayoutDriver {
    /// Start the loop. Must be called from within a tokio runtime.
    pub fn spawn(simulation: Simulation, frame_interval: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (frame_tx, frame_rx) = watch::channel(LayoutFrame::capture(&simulation));
        let stop = StopSignal::new();

        let task = tokio::spawn(run_loop(
            simulation,
            command_rx,
            frame_tx,
            stop.clone(),
            frame_interval,
        ));

        Self {
            commands: command_tx,
            frames: frame_rx,
            stop,
            task: Some(task),
        }
    }

    /// Queue a command. Returns false once the loop has stopped.
    pub fn send(&self, command: LayoutCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn sync(&self, model: GraphModel) -> bool {
        self.send(LayoutCommand::Sync(model))
    }

    pub fn pin(&self, id: impl Into<String>, position: Vec2) -> bool {
        self.send(LayoutCommand::Pin {
            id: id.into(),
            position,
        })
    }

    pub fn release(&self, id: impl Into<String>) -> bool {
        self.send(LayoutCommand::Release { id: id.into() })
    }

    pub fn restart(&self) -> bool {
        self.send(LayoutCommand::Restart)
    }

    /// Subscribe to frames
    pub fn frames(&self) -> watch::Receiver<LayoutFrame> {
        self.frames.clone()
    }

    /// Most recently published frame
    pub fn latest(&self) -> LayoutFrame {
        self.frames.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and hand back the simulation with its settled state.
    pub async fn shutdown(mut self) -> Option<Simulation> {
        self.stop.trigger();
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl Drop for LayoutDriver {
    fn drop(&mut self) {
        self.stop.trigger();
    }
}

async fn run_loop(
    mut sim: Simulation,
    mut commands: mpsc::UnboundedReceiver<LayoutCommand>,
    frames: watch::Sender<LayoutFrame>,
    stop: StopSignal,
    frame_interval: Duration,
) -> Simulation {
    let mut interval = tokio::time::interval(frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(interval_ms = frame_interval.as_millis() as u64, "layout loop started");

    'frames: loop {
        tokio::select! {
            _ = stop.stopped() => break,
            _ = interval.tick() => {}
        }
        if stop.is_stopped() {
            break;
        }

        let mut changed = false;
        loop {
            match commands.try_recv() {
                Ok(command) => {
                    apply_command(&mut sim, command);
                    changed = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'frames,
            }
        }

        if let TickStatus::Running { .. } = sim.tick() {
            changed = true;
        }
        if changed {
            frames.send_replace(LayoutFrame::capture(&sim));
        }
    }

    info!(ticks = sim.ticks(), "layout loop stopped");
    sim
}

fn apply_command(sim: &mut Simulation, command: LayoutCommand) {
    match command {
        LayoutCommand::Sync(model) => {
            sim.sync(&model);
        }
        LayoutCommand::Pin { id, position } => {
            if !sim.pin(&id, position) {
                debug!(node = %id, "pin ignored for unknown node");
            }
        }
        LayoutCommand::Release { id } => {
            sim.release(&id);
        }
        LayoutCommand::Restart => sim.restart(),
        LayoutCommand::SetParams(params) => sim.set_params(params),
    }
}
