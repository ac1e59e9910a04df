//! Fruit Tap - a single-screen reaction game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, scoring, timers)
//! - `renderer`: Presentation surfaces (terminal)
//! - `settings`: JSON configuration

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Periodic spawn interval
    pub const TICK_INTERVAL: Duration = Duration::from_millis(2500);
    /// Delay before an untapped target disappears
    pub const AUTO_HIDE_DELAY: Duration = Duration::from_millis(1000);

    /// Horizontal spawn margin (keeps targets off the side edges)
    pub const SPAWN_MARGIN_X: f32 = 50.0;
    /// Top spawn margin (keeps targets clear of the score display)
    pub const SPAWN_MARGIN_TOP: f32 = 150.0;
    /// Bottom spawn margin
    pub const SPAWN_MARGIN_BOTTOM: f32 = 150.0;

    /// One in this many spawns is a bomb
    pub const BOMB_ODDS: u32 = 3;

    /// Target hit radius (targets are drawn 100 points across)
    pub const TARGET_RADIUS: f32 = 50.0;

    /// Default viewport, also used for the initial target position
    pub const DEFAULT_WIDTH: f32 = 400.0;
    pub const DEFAULT_HEIGHT: f32 = 800.0;
}

/// Drawable area in points, as reported by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(consts::DEFAULT_WIDTH, consts::DEFAULT_HEIGHT)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive x range targets may spawn in
    pub fn spawn_x(&self) -> (f32, f32) {
        spawn_axis(0.0, self.width, consts::SPAWN_MARGIN_X, consts::SPAWN_MARGIN_X)
    }

    /// Inclusive y range targets may spawn in
    pub fn spawn_y(&self) -> (f32, f32) {
        spawn_axis(
            0.0,
            self.height,
            consts::SPAWN_MARGIN_TOP,
            consts::SPAWN_MARGIN_BOTTOM,
        )
    }

    /// True if `pos` lies inside the spawn rectangle
    pub fn in_spawn_area(&self, pos: Vec2) -> bool {
        let (x0, x1) = self.spawn_x();
        let (y0, y1) = self.spawn_y();
        (x0..=x1).contains(&pos.x) && (y0..=y1).contains(&pos.y)
    }
}

/// Shrink `[start, end]` by the margins; collapses to the midpoint when the
/// axis is too short to honour both.
#[inline]
fn spawn_axis(start: f32, end: f32, lead: f32, trail: f32) -> (f32, f32) {
    let lo = start + lead;
    let hi = end - trail;
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = (start + end) / 2.0;
        (mid, mid)
    }
}
