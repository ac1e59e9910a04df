//! Presentation surfaces
//!
//! The simulation never draws; a surface reads a `Snapshot` after each frame.

use std::io;

use crate::Viewport;
use crate::sim::Snapshot;

pub mod shapes;
pub mod terminal;

pub use shapes::CellGrid;
pub use terminal::{FrameInput, TerminalSurface};

/// Something the game can be drawn on
pub trait Surface {
    /// Current drawable area in points
    fn viewport(&self) -> Viewport;

    /// Draw the latest state
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()>;
}
