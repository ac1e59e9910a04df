//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (time advances by the `dt` handed to `tick`)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod hit;
pub mod schedule;
pub mod state;
pub mod tick;

pub use hit::point_hits_target;
pub use schedule::{Scheduler, Timer};
pub use state::{GamePhase, GameState, Snapshot, Spawn, TapOutcome, TargetKind};
pub use tick::{GameEvent, Session, TickInput, tick};
