//! Force-directed layout with position continuity across rebuilds

mod driver;
mod simulation;
mod stop;
mod vector;

pub use driver::{LayoutCommand, LayoutDriver, LayoutFrame, DEFAULT_FRAME_INTERVAL};
pub use simulation::{Body, LayoutParams, NodePosition, Simulation, SyncOutcome, TickStatus};
pub use stop::StopSignal;
pub use vector::Vec2;
