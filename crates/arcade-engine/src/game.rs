//! The contract between the engine and a mini-game.
//!
//! A game is a boxed [`Game`] trait object created by a [`GameFactory`]. The
//! engine owns it exclusively and calls into it once per tick. Every call
//! that may change score or spawn effects receives a [`GameContext`]: the
//! engine services (score, game-over, particles, RNG, input, dimensions)
//! borrowed for the duration of that one call. Games never hold a
//! reference back to the engine.
//!
//! Not every game needs every hook. [`Game::capabilities`] declares which
//! ones are meaningful and the engine skips the rest.

use std::ops::BitOr;

use rand::Rng;

use crate::collision::{self, Rect};
use crate::engine::EngineCore;
use crate::input::{InputState, Key};
use crate::particles::ParticleSpec;
use crate::score::ScoreSink;
use crate::surface::{Color, Surface};

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Set of optional [`Game`] hooks a game implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    pub const UPDATE: Capabilities = Capabilities(1);
    pub const RENDER: Capabilities = Capabilities(1 << 1);
    pub const INPUT: Capabilities = Capabilities(1 << 2);
    pub const CLICK: Capabilities = Capabilities(1 << 3);
    pub const ALL: Capabilities = Capabilities(0b1111);

    /// Whether every hook in `other` is also in `self`.
    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Capabilities) -> Capabilities {
        Capabilities(self.0 | other.0)
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        self.union(rhs)
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A mini-game driven by the engine loop.
///
/// All hooks have empty defaults; the engine only calls the ones named by
/// [`capabilities`](Game::capabilities).
pub trait Game {
    /// Which hooks this game implements.
    fn capabilities(&self) -> Capabilities;

    /// Advance game state by `delta_ms` milliseconds of wall time.
    fn update(&mut self, _ctx: &mut GameContext<'_>, _delta_ms: f64) {}

    /// Draw the current state. Called after the surface has been cleared.
    fn render(&self, _surface: &mut dyn Surface) {}

    /// A logical key changed state.
    fn handle_input(&mut self, _ctx: &mut GameContext<'_>, _key: &Key, _pressed: bool) {}

    /// A click or tap at surface-local `(x, y)`.
    fn handle_click(&mut self, _ctx: &mut GameContext<'_>, _x: f64, _y: f64) {}

    /// Serializable view of the game's state, folded into engine state
    /// hashes. Games that return `None` are hashed by engine state only.
    fn snapshot(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Builds a fresh game. Called by [`Engine::start_game`](crate::engine::Engine::start_game)
/// after score and particles have been reset.
pub type GameFactory = fn(&mut GameContext<'_>) -> Box<dyn Game>;

// ---------------------------------------------------------------------------
// GameContext
// ---------------------------------------------------------------------------

/// Engine services lent to a game for the duration of one hook call.
pub struct GameContext<'a> {
    core: &'a mut EngineCore,
    sink: &'a mut dyn ScoreSink,
}

impl<'a> GameContext<'a> {
    pub(crate) fn new(core: &'a mut EngineCore, sink: &'a mut dyn ScoreSink) -> Self {
        Self { core, sink }
    }

    // -- score ----------------------------------------------------------------

    /// Add `points` to the score and publish it.
    pub fn add_score(&mut self, points: u64) {
        self.core.add_score(&mut *self.sink, points);
    }

    /// Overwrite the score and publish it.
    pub fn set_score(&mut self, value: u64) {
        self.core.set_score(&mut *self.sink, value);
    }

    pub fn score(&self) -> u64 {
        self.core.score
    }

    /// End the running game. Only the first call per game reports.
    pub fn game_over(&mut self) {
        self.core.game_over(&mut *self.sink);
    }

    /// Whether the loop is still running this game. Turns false as soon as
    /// [`game_over`](Self::game_over) is called.
    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    // -- effects --------------------------------------------------------------

    /// Spawn a particle at `(x, y)`. Velocity jitter comes from the engine
    /// RNG.
    pub fn emit_particle(&mut self, x: f64, y: f64, spec: ParticleSpec) {
        let core = &mut *self.core;
        core.particles.emit(&mut core.rng, x, y, spec);
    }

    pub fn check_collision(&self, a: &Rect, b: &Rect) -> bool {
        collision::overlaps(a, b)
    }

    // -- randomness -----------------------------------------------------------

    /// Uniform in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.core.rng.gen::<f64>()
    }

    /// Uniform in `[min, max)`. Returns `min` when the range is empty.
    pub fn random_range(&mut self, min: f64, max: f64) -> f64 {
        if max > min {
            self.core.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    pub fn random_index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.core.rng.gen_range(0..len)
        }
    }

    /// True with probability `probability`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.random() < probability
    }

    /// One of [`PALETTE`], picked uniformly.
    pub fn random_color(&mut self) -> Color {
        random_color(&mut self.core.rng)
    }

    // -- environment ----------------------------------------------------------

    pub fn width(&self) -> f64 {
        self.core.width
    }

    pub fn height(&self) -> f64 {
        self.core.height
    }

    /// Milliseconds since the game started.
    pub fn elapsed(&self) -> f64 {
        self.core.elapsed
    }

    pub fn input(&self) -> &InputState {
        &self.core.input
    }
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

/// Colors handed out by [`random_color`].
pub const PALETTE: [Color; 7] = [
    Color::rgb(0xFF, 0x6B, 0x6B),
    Color::rgb(0x4E, 0xCD, 0xC4),
    Color::rgb(0x45, 0xB7, 0xB8),
    Color::rgb(0x96, 0xCE, 0xB4),
    Color::rgb(0xFF, 0xEA, 0xA7),
    Color::rgb(0xDD, 0xA0, 0xDD),
    Color::rgb(0x98, 0xD8, 0xC8),
];

/// `value` limited to `[min, max]`. If `min > max`, `max` wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Euclidean distance between two points.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

pub fn random_color<R: Rng>(rng: &mut R) -> Color {
    PALETTE[rng.gen_range(0..PALETTE.len())]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineConfig, GameHarness, LoopState};

    #[test]
    fn capabilities_combine() {
        let caps = Capabilities::UPDATE | Capabilities::RENDER;
        assert!(caps.contains(Capabilities::UPDATE));
        assert!(caps.contains(Capabilities::RENDER));
        assert!(!caps.contains(Capabilities::INPUT));
        assert!(Capabilities::ALL.contains(caps));
        assert!(caps.contains(Capabilities::NONE));
    }

    #[test]
    fn clamp_prefers_max_when_bounds_cross() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(5.0, 8.0, 2.0), 2.0);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
    }

    #[test]
    fn context_score_reaches_the_sink() {
        let mut harness = GameHarness::new(EngineConfig::default());
        let mut ctx = harness.context();
        ctx.add_score(50);
        ctx.add_score(100);
        assert_eq!(ctx.score(), 150);
        ctx.set_score(7);
        assert_eq!(harness.board().score(), 7);
    }

    #[test]
    fn context_game_over_reports_once() {
        let mut harness = GameHarness::new(EngineConfig::default());
        {
            let mut ctx = harness.context();
            ctx.add_score(30);
            ctx.game_over();
            assert!(!ctx.is_running());
            ctx.game_over();
        }
        assert_eq!(harness.state(), LoopState::GameOver);
        assert_eq!(harness.board().game_over_count(), 1);
        assert_eq!(harness.board_mut().take_game_over(), Some(30));
    }

    #[test]
    fn random_helpers_stay_in_range() {
        let mut harness = GameHarness::new(EngineConfig::default());
        let mut ctx = harness.context();
        for _ in 0..100 {
            let r = ctx.random();
            assert!((0.0..1.0).contains(&r));
            assert!(ctx.random_index(7) < 7);
            let v = ctx.random_range(10.0, 20.0);
            assert!((10.0..20.0).contains(&v));
            assert!(PALETTE.contains(&ctx.random_color()));
        }
        assert_eq!(ctx.random_index(0), 0);
        assert_eq!(ctx.random_range(3.0, 3.0), 3.0);
        assert!(!ctx.chance(0.0));
        assert!(ctx.chance(1.0));
    }

    #[test]
    fn emitted_particles_land_in_the_engine() {
        let mut harness = GameHarness::new(EngineConfig::default());
        let mut ctx = harness.context();
        ctx.emit_particle(1.0, 2.0, ParticleSpec::default());
        ctx.emit_particle(1.0, 2.0, ParticleSpec::default());
        assert_eq!(harness.particles().len(), 2);
    }
}
