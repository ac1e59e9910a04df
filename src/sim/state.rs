//! Game state and core simulation types
//!
//! Everything the presentation layer reads each frame lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Viewport;
use crate::consts::*;

/// What the current target is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    Fruit,
    Bomb,
}

/// Derived state-machine position of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the next tick
    Hidden,
    VisibleFruit,
    VisibleBomb,
    /// Terminal until restart
    GameOver,
}

/// A freshly spawned target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    /// Identifies this spawn for its auto-hide timer
    pub id: u32,
    pub kind: TargetKind,
    pub pos: Vec2,
}

/// Result of a tap that reached the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Nothing to hit (hidden target or game over)
    Ignored,
    /// Fruit collected, carries the new score
    Scored(u64),
    /// Bomb hit, game is over
    Detonated,
}

/// Read-only view of what should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub game_over: bool,
    pub target_visible: bool,
    pub target_kind: TargetKind,
    pub target_pos: Vec2,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    seed: u64,
    rng: Pcg32,
    score: u64,
    game_over: bool,
    target_visible: bool,
    target_kind: TargetKind,
    target_pos: Vec2,
    /// Id of the most recent spawn (0 = nothing spawned yet)
    spawn_id: u32,
}

impl GameState {
    /// Create a new game with the given seed. The target starts hidden.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            game_over: false,
            target_visible: false,
            target_kind: TargetKind::Fruit,
            target_pos: Viewport::default().center(),
            spawn_id: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn target_visible(&self) -> bool {
        self.target_visible
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target_kind
    }

    pub fn target_pos(&self) -> Vec2 {
        self.target_pos
    }

    pub fn spawn_id(&self) -> u32 {
        self.spawn_id
    }

    pub fn phase(&self) -> GamePhase {
        match (self.game_over, self.target_visible, self.target_kind) {
            (true, _, _) => GamePhase::GameOver,
            (false, false, _) => GamePhase::Hidden,
            (false, true, TargetKind::Fruit) => GamePhase::VisibleFruit,
            (false, true, TargetKind::Bomb) => GamePhase::VisibleBomb,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            game_over: self.game_over,
            target_visible: self.target_visible,
            target_kind: self.target_kind,
            target_pos: self.target_pos,
        }
    }

    /// Periodic tick: pick a new target kind and position and show it.
    ///
    /// Returns `None` once the game is over. The caller is expected to
    /// schedule `auto_hide` for the returned spawn.
    pub fn on_tick(&mut self, viewport: Viewport) -> Option<Spawn> {
        if self.game_over {
            return None;
        }
        Some(self.spawn(viewport))
    }

    fn spawn(&mut self, viewport: Viewport) -> Spawn {
        self.target_kind = if self.rng.random_range(0..BOMB_ODDS) == 0 {
            TargetKind::Bomb
        } else {
            TargetKind::Fruit
        };

        let (x0, x1) = viewport.spawn_x();
        let (y0, y1) = viewport.spawn_y();
        let x = sample_between(&mut self.rng, x0, x1);
        let y = sample_between(&mut self.rng, y0, y1);
        self.target_pos = Vec2::new(x, y);

        self.target_visible = true;
        self.spawn_id = self.spawn_id.wrapping_add(1);

        let spawn = Spawn {
            id: self.spawn_id,
            kind: self.target_kind,
            pos: self.target_pos,
        };
        log::debug!(
            "Spawned {:?} #{} at ({:.0}, {:.0})",
            spawn.kind,
            spawn.id,
            spawn.pos.x,
            spawn.pos.y
        );
        spawn
    }

    /// Pull a visible target back inside the spawn area of a resized
    /// viewport. Returns true if it moved.
    pub fn fit_to(&mut self, viewport: Viewport) -> bool {
        if !self.target_visible {
            return false;
        }
        let (x0, x1) = viewport.spawn_x();
        let (y0, y1) = viewport.spawn_y();
        let fitted = Vec2::new(self.target_pos.x.clamp(x0, x1), self.target_pos.y.clamp(y0, y1));
        if fitted == self.target_pos {
            return false;
        }
        log::debug!(
            "Moved #{} to ({:.0}, {:.0}) after resize",
            self.spawn_id,
            fitted.x,
            fitted.y
        );
        self.target_pos = fitted;
        true
    }

    /// Deferred hide for `spawn_id`. Returns true if it hid the target.
    ///
    /// No effect if the target was already tapped, or if a newer spawn has
    /// replaced it.
    pub fn auto_hide(&mut self, spawn_id: u32) -> bool {
        if !self.target_visible || spawn_id != self.spawn_id {
            return false;
        }
        self.target_visible = false;
        log::trace!("Auto-hid {:?} #{}", self.target_kind, spawn_id);
        true
    }

    /// The player hit the target
    pub fn on_tap(&mut self) -> TapOutcome {
        if !self.target_visible || self.game_over {
            return TapOutcome::Ignored;
        }

        match self.target_kind {
            TargetKind::Bomb => {
                self.end_game();
                TapOutcome::Detonated
            }
            TargetKind::Fruit => {
                self.score += 1;
                self.target_visible = false;
                log::debug!("Fruit collected, score {}", self.score);
                TapOutcome::Scored(self.score)
            }
        }
    }

    /// Idempotent. Also hides the target so nothing stays tappable.
    pub fn end_game(&mut self) {
        if !self.game_over {
            log::info!("Game over, final score {}", self.score);
        }
        self.game_over = true;
        self.target_visible = false;
    }

    /// Reset score and game-over, then spawn a fresh target immediately
    pub fn restart(&mut self, viewport: Viewport) -> Spawn {
        self.score = 0;
        self.game_over = false;
        log::info!("Game restarted");
        self.spawn(viewport)
    }
}

/// Uniform sample from `[lo, hi]`, tolerating a collapsed range
fn sample_between(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.random_range(lo..=hi).clamp(lo, hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Tick until the target kind matches, returning the spawn
    fn spawn_kind(state: &mut GameState, viewport: Viewport, kind: TargetKind) -> Spawn {
        for _ in 0..1000 {
            if let Some(spawn) = state.on_tick(viewport) {
                if spawn.kind == kind {
                    return spawn;
                }
            }
        }
        panic!("no {:?} spawned in 1000 ticks", kind);
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new(1);
        assert_eq!(state.score(), 0);
        assert!(!state.is_game_over());
        assert!(!state.target_visible());
        assert_eq!(state.phase(), GamePhase::Hidden);
        assert_eq!(state.target_pos(), Vec2::new(200.0, 400.0));
    }

    #[test]
    fn test_tick_shows_target() {
        let mut state = GameState::new(7);
        let spawn = state.on_tick(Viewport::default()).unwrap();
        assert!(state.target_visible());
        assert_eq!(spawn.id, 1);
        assert_eq!(spawn.kind, state.target_kind());
        assert_eq!(spawn.pos, state.target_pos());
        assert_ne!(state.phase(), GamePhase::Hidden);
    }

    #[test]
    fn test_bomb_frequency() {
        let mut state = GameState::new(424242);
        let vp = Viewport::default();
        let n = 30_000;
        let bombs = (0..n)
            .filter_map(|_| state.on_tick(vp))
            .filter(|s| s.kind == TargetKind::Bomb)
            .count();
        let freq = bombs as f64 / n as f64;
        assert!((freq - 1.0 / 3.0).abs() < 0.02, "bomb frequency {}", freq);
    }

    #[test]
    fn test_tap_hidden_is_noop() {
        let mut state = GameState::new(3);
        assert_eq!(state.on_tap(), TapOutcome::Ignored);
        assert_eq!(state.score(), 0);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_tap_fruit_scores() {
        let mut state = GameState::new(11);
        spawn_kind(&mut state, Viewport::default(), TargetKind::Fruit);
        assert_eq!(state.on_tap(), TapOutcome::Scored(1));
        assert_eq!(state.score(), 1);
        assert!(!state.target_visible());
        assert!(!state.is_game_over());

        // Second tap hits nothing
        assert_eq!(state.on_tap(), TapOutcome::Ignored);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_tap_bomb_ends_game() {
        let mut state = GameState::new(11);
        let vp = Viewport::default();
        spawn_kind(&mut state, vp, TargetKind::Fruit);
        state.on_tap();
        spawn_kind(&mut state, vp, TargetKind::Bomb);

        assert_eq!(state.on_tap(), TapOutcome::Detonated);
        assert!(state.is_game_over());
        assert_eq!(state.score(), 1);
        assert!(!state.target_visible());
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_game_over_ignores_ticks_and_taps() {
        let mut state = GameState::new(5);
        state.end_game();
        state.end_game();
        assert!(state.is_game_over());
        assert!(state.on_tick(Viewport::default()).is_none());
        assert!(!state.target_visible());
        assert_eq!(state.on_tap(), TapOutcome::Ignored);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = GameState::new(9);
        let vp = Viewport::default();
        spawn_kind(&mut state, vp, TargetKind::Fruit);
        state.on_tap();
        state.end_game();

        let spawn = state.restart(vp);
        assert_eq!(state.score(), 0);
        assert!(!state.is_game_over());
        assert!(state.target_visible());
        assert!(vp.in_spawn_area(spawn.pos));
    }

    #[test]
    fn test_auto_hide_only_hides_its_own_spawn() {
        let mut state = GameState::new(21);
        let vp = Viewport::default();
        let first = state.on_tick(vp).unwrap();
        let second = state.on_tick(vp).unwrap();

        // Stale timer from the first spawn leaves the second alone
        assert!(!state.auto_hide(first.id));
        assert!(state.target_visible());

        assert!(state.auto_hide(second.id));
        assert!(!state.target_visible());
        // Already hidden
        assert!(!state.auto_hide(second.id));
    }

    #[test]
    fn test_auto_hide_after_fruit_tap_is_noop() {
        let mut state = GameState::new(13);
        let spawn = spawn_kind(&mut state, Viewport::default(), TargetKind::Fruit);
        state.on_tap();
        assert!(!state.auto_hide(spawn.id));
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_fit_to_clamps_visible_target() {
        let mut state = GameState::new(31);
        state.on_tick(Viewport::new(4000.0, 4000.0)).unwrap();
        let small = Viewport::new(400.0, 800.0);
        if !small.in_spawn_area(state.target_pos()) {
            assert!(state.fit_to(small));
        }
        assert!(small.in_spawn_area(state.target_pos()));
        // Already inside: nothing to do
        assert!(!state.fit_to(small));
    }

    #[test]
    fn test_fit_to_ignores_hidden_target() {
        let mut state = GameState::new(31);
        let before = state.target_pos();
        assert!(!state.fit_to(Viewport::new(120.0, 320.0)));
        assert_eq!(state.target_pos(), before);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let vp = Viewport::new(640.0, 960.0);
        for _ in 0..50 {
            assert_eq!(a.on_tick(vp), b.on_tick(vp));
        }
    }

    #[test]
    fn test_scenario_fruit_bomb_autohide_bomb() {
        let vp = Viewport::new(400.0, 800.0);
        let mut state = GameState::new(2024);

        let fruit = spawn_kind(&mut state, vp, TargetKind::Fruit);
        assert!((50.0..=350.0).contains(&fruit.pos.x));
        assert!((150.0..=650.0).contains(&fruit.pos.y));
        state.on_tap();
        assert_eq!(state.score(), 1);
        assert!(!state.target_visible());

        let bomb = spawn_kind(&mut state, vp, TargetKind::Bomb);
        assert!(state.auto_hide(bomb.id));
        assert_eq!(state.target_kind(), TargetKind::Bomb);
        assert!(!state.target_visible());
        assert_eq!(state.score(), 1);
        assert!(!state.is_game_over());

        // Tap on empty space
        assert_eq!(state.on_tap(), TapOutcome::Ignored);

        spawn_kind(&mut state, vp, TargetKind::Bomb);
        assert_eq!(state.on_tap(), TapOutcome::Detonated);
        assert!(state.is_game_over());
        assert_eq!(state.score(), 1);
    }

    proptest! {
        #[test]
        fn prop_spawn_within_margins(
            seed in any::<u64>(),
            width in 100.5f32..4000.0,
            height in 300.5f32..4000.0,
        ) {
            let mut state = GameState::new(seed);
            let spawn = state.on_tick(Viewport::new(width, height)).unwrap();
            prop_assert!(spawn.pos.x >= 50.0 && spawn.pos.x <= width - 50.0);
            prop_assert!(spawn.pos.y >= 150.0 && spawn.pos.y <= height - 150.0);
        }
    }
}
