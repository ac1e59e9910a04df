//! Event loop step
//!
//! Serializes taps, restarts and timer callbacks against one `GameState`.

use std::time::Duration;

use glam::Vec2;

use super::hit::point_hits_target;
use super::schedule::{Scheduler, Timer};
use super::state::{GameState, Spawn, TapOutcome};
use crate::{Settings, Viewport};

/// Input collected by the presentation layer for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap points in viewport coordinates, oldest first
    pub taps: Vec<Vec2>,
    /// Restart button pressed (only honoured after game over)
    pub restart: bool,
    /// New viewport size, if the surface was resized
    pub resize: Option<Viewport>,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Spawned(Spawn),
    AutoHidden { spawn_id: u32 },
    Scored { score: u64 },
    /// Tap landed on nothing
    Missed,
    GameOver { final_score: u64 },
    Restarted(Spawn),
}

/// A running game: state, timers and the viewport they spawn into
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    scheduler: Scheduler,
    viewport: Viewport,
    auto_hide_delay: Duration,
    target_radius: f32,
}

impl Session {
    pub fn new(seed: u64, settings: &Settings, viewport: Viewport) -> Self {
        log::info!("New session with seed {}", seed);
        Self {
            state: GameState::new(seed),
            scheduler: Scheduler::new(settings.tick_interval()),
            viewport,
            auto_hide_delay: settings.auto_hide_delay(),
            target_radius: settings.target_radius,
        }
    }

    /// Read-only: mutations go through the session so timers stay in step
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Session clock
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
            self.viewport = viewport;
            self.state.fit_to(viewport);
        }
    }

    /// Route a tap to the target if it lands inside the hit area
    pub fn tap_at(&mut self, point: Vec2) -> GameEvent {
        let on_target = self.state.target_visible()
            && point_hits_target(point, self.state.target_pos(), self.target_radius);
        if !on_target {
            return GameEvent::Missed;
        }

        match self.state.on_tap() {
            TapOutcome::Scored(score) => GameEvent::Scored { score },
            TapOutcome::Detonated => GameEvent::GameOver {
                final_score: self.state.score(),
            },
            TapOutcome::Ignored => GameEvent::Missed,
        }
    }

    /// Start over after game over. Returns `None` while still playing.
    pub fn restart(&mut self) -> Option<GameEvent> {
        if !self.state.is_game_over() {
            return None;
        }
        let spawn = self.state.restart(self.viewport);
        self.schedule_auto_hide(&spawn);
        Some(GameEvent::Restarted(spawn))
    }

    fn schedule_auto_hide(&mut self, spawn: &Spawn) {
        self.scheduler
            .schedule_after(self.auto_hide_delay, Timer::AutoHide { spawn_id: spawn.id });
    }

    fn run_timer(&mut self, timer: Timer) -> Option<GameEvent> {
        match timer {
            Timer::Tick => {
                let spawn = self.state.on_tick(self.viewport)?;
                self.schedule_auto_hide(&spawn);
                Some(GameEvent::Spawned(spawn))
            }
            Timer::AutoHide { spawn_id } => self
                .state
                .auto_hide(spawn_id)
                .then_some(GameEvent::AutoHidden { spawn_id }),
        }
    }
}

/// Advance the session by one frame.
///
/// Input is applied first (it targets what was on screen last frame), then
/// every timer due within `dt` runs in deadline order.
pub fn tick(session: &mut Session, input: &TickInput, dt: Duration) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if let Some(viewport) = input.resize {
        session.resize(viewport);
    }

    if input.restart {
        events.extend(session.restart());
    }

    for &point in &input.taps {
        events.push(session.tap_at(point));
    }

    session.scheduler.advance(dt);
    while let Some(timer) = session.scheduler.next_due() {
        if let Some(event) = session.run_timer(timer) {
            log::trace!("{:?} at {:?}", event, session.scheduler.now());
            events.push(event);
        }
    }

    events
}
