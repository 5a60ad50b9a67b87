//! The game loop driver.
//!
//! [`Engine`] owns at most one running [`Game`] and drives it one tick at a
//! time. The host supplies a timestamp and a [`Surface`] for every frame;
//! each tick that does work runs, in order:
//!
//! 1. the game's `update` with the time since the previous tick,
//! 2. the particle advance,
//! 3. a clear to the sky background,
//! 4. the game's `render`,
//! 5. the particle render.
//!
//! The loop moves through three states:
//!
//! ```text
//! Idle --start_game--> Running --game_over--> GameOver
//!   ^                     |                      |
//!   +--------stop---------+----------stop--------+
//! ```
//!
//! Ticks outside `Running` do nothing. Stopping and ending a game are both
//! cooperative: they take effect at the top of the next tick.
//!
//! # Example
//!
//! ```
//! use arcade_engine::prelude::*;
//!
//! struct Idle;
//! impl Game for Idle {
//!     fn capabilities(&self) -> Capabilities {
//!         Capabilities::NONE
//!     }
//! }
//!
//! let mut engine = Engine::new(EngineConfig::default(), ScoreBoard::new());
//! engine.start_game(|_ctx| -> Box<dyn Game> { Box::new(Idle) }, "Idle");
//! assert_eq!(engine.run_frames(10, 16.0), 10);
//! assert_eq!(engine.elapsed(), 144.0);
//! ```

use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::game::{Capabilities, Game, GameContext, GameFactory};
use crate::input::{DeviceEvent, GameInput, InputNormalizer, InputState, SurfaceGeometry};
use crate::particles::ParticleSystem;
use crate::score::{ScoreBoard, ScoreSink};
use crate::surface::{Color, NullSurface, Surface};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Construction-time settings for an [`Engine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logical surface width in pixels. Must be positive and finite.
    pub width: f64,
    /// Logical surface height in pixels. Must be positive and finite.
    pub height: f64,
    /// Seed for the engine RNG.
    pub seed: u64,
    /// No window; frames are pumped by the caller as fast as it likes.
    pub headless: bool,
}

impl Default for EngineConfig {
    /// An 800x600 surface, seed 0, windowed.
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            seed: 0,
            headless: false,
        }
    }
}

impl EngineConfig {
    fn validate(&self) {
        assert!(
            self.width > 0.0 && self.width.is_finite(),
            "width must be positive and finite, got {}",
            self.width
        );
        assert!(
            self.height > 0.0 && self.height.is_finite(),
            "height must be positive and finite, got {}",
            self.height
        );
    }
}

// ---------------------------------------------------------------------------
// LoopState
// ---------------------------------------------------------------------------

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopState {
    /// No game, or the game was stopped.
    #[default]
    Idle,
    Running,
    /// The game ended itself. It stays loaded until stopped or replaced.
    GameOver,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoopState::Idle => "idle",
            LoopState::Running => "running",
            LoopState::GameOver => "game over",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// EngineCore
// ---------------------------------------------------------------------------

/// The part of the engine games may touch through a [`GameContext`].
#[derive(Debug, Clone)]
pub(crate) struct EngineCore {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) state: LoopState,
    pub(crate) score: u64,
    pub(crate) elapsed: f64,
    pub(crate) input: InputState,
    pub(crate) particles: ParticleSystem,
    pub(crate) rng: Pcg64,
}

impl EngineCore {
    fn new(config: &EngineConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            state: LoopState::Idle,
            score: 0,
            elapsed: 0.0,
            input: InputState::new(),
            particles: ParticleSystem::new(),
            rng: Pcg64::seed_from_u64(config.seed),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub(crate) fn add_score(&mut self, sink: &mut dyn ScoreSink, points: u64) {
        self.score = self.score.saturating_add(points);
        sink.update_score(self.score);
    }

    pub(crate) fn set_score(&mut self, sink: &mut dyn ScoreSink, value: u64) {
        self.score = value;
        sink.update_score(self.score);
    }

    pub(crate) fn game_over(&mut self, sink: &mut dyn ScoreSink) {
        if self.state != LoopState::Running {
            return;
        }
        self.state = LoopState::GameOver;
        info!(score = self.score, elapsed_ms = self.elapsed, "game over");
        sink.report_game_over(self.score);
    }

    /// Reset per-game state for a fresh start.
    fn reset(&mut self) {
        self.score = 0;
        self.elapsed = 0.0;
        self.particles.clear();
    }
}

// ---------------------------------------------------------------------------
// FrameHost
// ---------------------------------------------------------------------------

/// Something a windowed host can pump: raw events in, frames out.
///
/// Implemented by [`Engine`] and by higher-level session types that wrap
/// one.
pub trait FrameHost {
    /// Deliver a raw device event.
    fn device_event(&mut self, event: &DeviceEvent);

    /// Run one frame at `timestamp_ms`. Returns whether the frame did work.
    fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> bool;

    /// Text for the window title bar.
    fn window_title(&self) -> String;

    /// Logical surface size `(width, height)`.
    fn surface_size(&self) -> (f64, f64);

    /// Tell the host-facing input layer where the surface now sits.
    fn set_geometry(&mut self, geometry: SurfaceGeometry);
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The loop driver. Owns the active game, the particle system, input
/// state, the RNG, and a score sink.
pub struct Engine<S: ScoreSink> {
    config: EngineConfig,
    core: EngineCore,
    game: Option<Box<dyn Game>>,
    capabilities: Capabilities,
    title: String,
    sink: S,
    normalizer: InputNormalizer,
    /// Timestamp of the first tick of the current game.
    start_timestamp: Option<f64>,
    last_timestamp: Option<f64>,
    frame_requested: bool,
    /// Ticks that did work since the current game started.
    ticks: u64,
}

impl<S: ScoreSink> Engine<S> {
    /// Create an idle engine.
    ///
    /// # Panics
    ///
    /// Panics if the configured surface dimensions are not positive and
    /// finite.
    pub fn new(config: EngineConfig, sink: S) -> Self {
        config.validate();
        Self {
            core: EngineCore::new(&config),
            config,
            game: None,
            capabilities: Capabilities::NONE,
            title: String::new(),
            sink,
            normalizer: InputNormalizer::default(),
            start_timestamp: None,
            last_timestamp: None,
            frame_requested: false,
            ticks: 0,
        }
    }

    // -- lifecycle ------------------------------------------------------------

    /// Stop whatever is running and start a fresh game from `factory`.
    ///
    /// Score, elapsed time, and particles are reset before the factory runs;
    /// the sink is told the new title and a score of zero.
    pub fn start_game(&mut self, factory: GameFactory, title: &str) {
        self.stop();

        self.core.reset();
        self.start_timestamp = None;
        self.last_timestamp = None;
        self.ticks = 0;
        title.clone_into(&mut self.title);
        self.sink.show_title(title);
        self.sink.update_score(0);

        self.core.state = LoopState::Running;
        let game = {
            let mut ctx = GameContext::new(&mut self.core, &mut self.sink);
            factory(&mut ctx)
        };
        self.capabilities = game.capabilities();
        self.game = Some(game);
        self.frame_requested = true;

        info!(title, seed = self.config.seed, "game started");
    }

    /// Drop the game and go idle. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let had_game = self.game.take().is_some();
        self.core.state = LoopState::Idle;
        self.capabilities = Capabilities::NONE;
        self.frame_requested = false;
        if had_game {
            info!(title = %self.title, score = self.core.score, "game stopped");
        }
    }

    /// Run one tick at `timestamp_ms`. Returns `false` (and does nothing
    /// else) unless a game is running.
    ///
    /// The first tick after [`start_game`](Self::start_game) has a delta of
    /// zero; later ticks use the time since the previous tick, floored at
    /// zero if the host's clock steps backwards.
    pub fn tick(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> bool {
        if self.core.state != LoopState::Running {
            self.frame_requested = false;
            return false;
        }

        let delta = match self.last_timestamp {
            Some(previous) => (timestamp_ms - previous).max(0.0),
            None => 0.0,
        };
        let start = *self.start_timestamp.get_or_insert(timestamp_ms);
        self.last_timestamp = Some(timestamp_ms);
        self.core.elapsed = (timestamp_ms - start).max(self.core.elapsed);

        if let Some(game) = self.game.as_mut() {
            if self.capabilities.contains(Capabilities::UPDATE) {
                let mut ctx = GameContext::new(&mut self.core, &mut self.sink);
                game.update(&mut ctx, delta);
            }
        }

        self.core.particles.advance(delta);

        surface.clear(Color::SKY);
        if let Some(game) = self.game.as_ref() {
            if self.capabilities.contains(Capabilities::RENDER) {
                game.render(surface);
            }
        }
        self.core.particles.render(surface);

        self.ticks += 1;
        self.frame_requested = self.core.is_running();
        trace!(
            tick = self.ticks,
            delta_ms = delta,
            particles = self.core.particles.len(),
            "tick"
        );
        true
    }

    /// Pump `count` frames `frame_ms` apart against a [`NullSurface`].
    ///
    /// Timestamps are `index * frame_ms`, where the index continues from the
    /// number of ticks already run in this game. Returns how many ticks did
    /// work.
    pub fn run_frames(&mut self, count: u64, frame_ms: f64) -> u64 {
        let mut surface = NullSurface::new();
        let base = self.ticks;
        let mut worked = 0;
        for index in 0..count {
            let timestamp = (base + index) as f64 * frame_ms;
            if self.tick(timestamp, &mut surface) {
                worked += 1;
            }
        }
        worked
    }

    // -- input ----------------------------------------------------------------

    /// Fold a device event into input state and forward it to the game when
    /// it is running and has the matching hook. Returns whether the game was
    /// called.
    pub fn handle_event(&mut self, event: &DeviceEvent) -> bool {
        let Some(input) = self.normalizer.normalize(&mut self.core.input, event) else {
            return false;
        };
        if !self.core.is_running() {
            return false;
        }
        let Some(game) = self.game.as_mut() else {
            return false;
        };

        let mut ctx = GameContext::new(&mut self.core, &mut self.sink);
        match input {
            GameInput::Key { key, pressed } => {
                if !self.capabilities.contains(Capabilities::INPUT) {
                    return false;
                }
                game.handle_input(&mut ctx, &key, pressed);
            }
            GameInput::Click { x, y } => {
                if !self.capabilities.contains(Capabilities::CLICK) {
                    return false;
                }
                game.handle_click(&mut ctx, x, y);
            }
        }
        true
    }

    pub fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.normalizer.set_geometry(geometry);
    }

    // -- score ----------------------------------------------------------------

    pub fn add_score(&mut self, points: u64) {
        self.core.add_score(&mut self.sink, points);
    }

    pub fn set_score(&mut self, value: u64) {
        self.core.set_score(&mut self.sink, value);
    }

    /// End the running game; see [`GameContext::game_over`].
    pub fn game_over(&mut self) {
        self.core.game_over(&mut self.sink);
    }

    // -- determinism ----------------------------------------------------------

    /// Replace the RNG with a fresh one seeded from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        debug!(seed, "engine reseeded");
        self.config.seed = seed;
        self.core.rng = Pcg64::seed_from_u64(seed);
    }

    // -- accessors ------------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> LoopState {
        self.core.state
    }

    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    pub fn has_game(&self) -> bool {
        self.game.is_some()
    }

    pub fn score(&self) -> u64 {
        self.core.score
    }

    /// Milliseconds since the current game's first tick.
    pub fn elapsed(&self) -> f64 {
        self.core.elapsed
    }

    /// Ticks that did work since the current game started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> f64 {
        self.core.width
    }

    pub fn height(&self) -> f64 {
        self.core.height
    }

    pub fn input(&self) -> &InputState {
        &self.core.input
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.core.particles
    }

    /// Whether the host should schedule another frame.
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// The running game's own snapshot, if it provides one.
    pub fn game_snapshot(&self) -> Option<serde_json::Value> {
        self.game.as_ref().and_then(|game| game.snapshot())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: ScoreSink> FrameHost for Engine<S> {
    fn device_event(&mut self, event: &DeviceEvent) {
        self.handle_event(event);
    }

    fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> bool {
        self.tick(timestamp_ms, surface)
    }

    fn window_title(&self) -> String {
        match self.state() {
            LoopState::Idle => "Arcade".to_owned(),
            LoopState::Running => format!("{} - Score: {}", self.title, self.score()),
            LoopState::GameOver => format!("{} - Game Over ({})", self.title, self.score()),
        }
    }

    fn surface_size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }

    fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        Engine::set_geometry(self, geometry);
    }
}

// ---------------------------------------------------------------------------
// GameHarness
// ---------------------------------------------------------------------------

/// Engine services without a loop, for driving a game's hooks directly.
///
/// The harness starts out `Running` with a [`ScoreBoard`] sink, so
/// [`GameContext::game_over`] behaves as it would under a real engine.
/// Device events go through the same normalizer the engine uses.
pub struct GameHarness {
    core: EngineCore,
    board: ScoreBoard,
    normalizer: InputNormalizer,
}

impl GameHarness {
    /// # Panics
    ///
    /// Panics on invalid dimensions, like [`Engine::new`].
    pub fn new(config: EngineConfig) -> Self {
        config.validate();
        let mut core = EngineCore::new(&config);
        core.state = LoopState::Running;
        Self {
            core,
            board: ScoreBoard::new(),
            normalizer: InputNormalizer::default(),
        }
    }

    /// Borrow the services as a [`GameContext`].
    pub fn context(&mut self) -> GameContext<'_> {
        GameContext::new(&mut self.core, &mut self.board)
    }

    /// Fold a device event into input state. The game is not called.
    pub fn event(&mut self, event: &DeviceEvent) -> Option<GameInput> {
        self.normalizer.normalize(&mut self.core.input, event)
    }

    /// Advance elapsed time by `delta_ms` without running anything.
    pub fn advance_clock(&mut self, delta_ms: f64) {
        self.core.elapsed += delta_ms;
    }

    pub fn state(&self) -> LoopState {
        self.core.state
    }

    pub fn score(&self) -> u64 {
        self.core.score
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.core.particles
    }

    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut ScoreBoard {
        &mut self.board
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Rect;
    use crate::input::Key;
    use crate::particles::ParticleSpec;
    use crate::surface::{DrawCommand, DrawList};

    /// Records hook calls and draws a marker rect.
    struct Tally {
        caps: Capabilities,
        updates: Vec<f64>,
        keys: Vec<(Key, bool)>,
        clicks: Vec<(f64, f64)>,
    }

    impl Tally {
        fn boxed(caps: Capabilities) -> Box<dyn Game> {
            Box::new(Tally {
                caps,
                updates: Vec::new(),
                keys: Vec::new(),
                clicks: Vec::new(),
            })
        }
    }

    impl Game for Tally {
        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn update(&mut self, ctx: &mut GameContext<'_>, delta_ms: f64) {
            self.updates.push(delta_ms);
            if self.updates.len() == 1 {
                ctx.emit_particle(0.0, 0.0, ParticleSpec::default());
            }
        }

        fn render(&self, surface: &mut dyn Surface) {
            surface.fill_rect(Rect::new(1.0, 1.0, 1.0, 1.0), Color::BLACK);
        }

        fn handle_input(&mut self, ctx: &mut GameContext<'_>, key: &Key, pressed: bool) {
            self.keys.push((key.clone(), pressed));
            if *key == Key::Escape {
                ctx.game_over();
            }
        }

        fn handle_click(&mut self, ctx: &mut GameContext<'_>, x: f64, y: f64) {
            self.clicks.push((x, y));
            ctx.add_score(10);
        }

        fn snapshot(&self) -> Option<serde_json::Value> {
            Some(serde_json::json!({
                "updates": self.updates,
                "keys": self.keys.len(),
                "clicks": self.clicks.len(),
            }))
        }
    }

    fn all_hooks(_ctx: &mut GameContext<'_>) -> Box<dyn Game> {
        Tally::boxed(Capabilities::ALL)
    }

    fn render_only(_ctx: &mut GameContext<'_>) -> Box<dyn Game> {
        Tally::boxed(Capabilities::RENDER)
    }

    fn engine() -> Engine<ScoreBoard> {
        Engine::new(EngineConfig::default(), ScoreBoard::new())
    }

    // -- 1. Construction ------------------------------------------------------

    #[test]
    fn new_engine_is_idle() {
        let engine = engine();
        assert_eq!(engine.state(), LoopState::Idle);
        assert!(!engine.has_game());
        assert!(!engine.frame_requested());
        assert_eq!((engine.width(), engine.height()), (800.0, 600.0));
    }

    #[test]
    #[should_panic(expected = "width must be positive")]
    fn zero_width_panics() {
        let _ = Engine::new(
            EngineConfig {
                width: 0.0,
                ..Default::default()
            },
            ScoreBoard::new(),
        );
    }

    #[test]
    #[should_panic(expected = "height must be positive")]
    fn infinite_height_panics() {
        let _ = Engine::new(
            EngineConfig {
                height: f64::INFINITY,
                ..Default::default()
            },
            ScoreBoard::new(),
        );
    }

    // -- 2. Lifecycle ---------------------------------------------------------

    #[test]
    fn start_game_resets_score_and_notifies_sink() {
        let mut engine = engine();
        engine.start_game(all_hooks, "Tally");
        engine.add_score(120);
        engine.run_frames(3, 16.0);
        assert_eq!(engine.score(), 120);

        engine.start_game(all_hooks, "Tally Again");
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.elapsed(), 0.0);
        assert!(engine.particles().is_empty());
        assert_eq!(engine.sink().title(), "Tally Again");
        assert_eq!(engine.sink().score(), 0);
        assert!(engine.is_running());
        assert!(engine.frame_requested());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut engine = engine();
        engine.start_game(all_hooks, "Tally");
        engine.stop();
        engine.stop();
        assert_eq!(engine.state(), LoopState::Idle);
        assert!(!engine.has_game());
        assert!(!engine.frame_requested());
    }

    #[test]
    fn tick_when_idle_does_nothing() {
        let mut engine = engine();
        let mut list = DrawList::new();
        assert!(!engine.tick(16.0, &mut list));
        assert!(list.is_empty());
        assert_eq!(engine.ticks(), 0);
    }

    #[test]
    fn first_tick_has_zero_delta() {
        let mut engine = engine();
        engine.start_game(all_hooks, "Tally");
        let mut surface = NullSurface::new();
        engine.tick(5000.0, &mut surface);
        engine.tick(5016.0, &mut surface);
        engine.tick(5048.0, &mut surface);
        assert_eq!(engine.elapsed(), 48.0);
        let snapshot = engine.game_snapshot().unwrap();
        assert_eq!(snapshot["updates"], serde_json::json!([0.0, 16.0, 32.0]));
    }

    #[test]
    fn backwards_clock_gives_zero_delta() {
        let mut engine = engine();
        engine.start_game(all_hooks, "Tally");
        let mut surface = NullSurface::new();
        engine.tick(100.0, &mut surface);
        engine.tick(50.0, &mut surface);
        let snapshot = engine.game_snapshot().unwrap();
        assert_eq!(snapshot["updates"], serde_json::json!([0.0, 0.0]));
        assert_eq!(engine.elapsed(), 0.0);
    }

    // -- 3. Tick order --------------------------------------------------------

    #[test]
    fn tick_clears_then_renders_game_then_particles() {
        let mut engine = engine();
        engine.start_game(all_hooks, "Tally");
        let mut list = DrawList::new();
        assert!(engine.tick(0.0, &mut list));

        // The particle emitted during update was advanced once before render.
        let commands = list.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], DrawCommand::Clear { color: Color::SKY });
        match &commands[1] {
            DrawCommand::FillRect { color, .. } => assert_eq!(*color, Color::BLACK),
            other => panic!("expected game rect, got {other:?}"),
        }
        match &commands[2] {
            DrawCommand::FillRect { color, alpha, .. } => {
                assert_eq!(*color, Color::GOLD);
                assert!((alpha - 0.98).abs() < 1e-12);
            }
            other => panic!("expected particle rect, got {other:?}"),
        }
        assert_eq!(list.alpha(), 1.0);
    }

    #[test]
    fn missing_capabilities_are_skipped() {
        let mut engine = engine();
        engine.start_game(render_only, "Render Only");
        engine.run_frames(2, 16.0);
        assert!(!engine.handle_event(&DeviceEvent::KeyDown(Key::Space)));
        assert!(!engine.handle_event(&DeviceEvent::PointerDown { x: 1.0, y: 1.0 }));
        let snapshot = engine.game_snapshot().unwrap();
        assert_eq!(snapshot["updates"], serde_json::json!([]));
        // Input state is still tracked.
        assert!(engine.input().is_pressed(&Key::Space));
    }

    // -- 4. Input -------------------------------------------------------------

    #[test]
    fn events_forward_only_while_running() {
        let mut engine = engine();
        assert!(!engine.handle_event(&DeviceEvent::KeyDown(Key::ArrowLeft)));
        assert!(engine.input().is_pressed(&Key::ArrowLeft));

        engine.start_game(all_hooks, "Tally");
        assert!(engine.handle_event(&DeviceEvent::KeyDown(Key::ArrowRight)));
        assert!(!engine.handle_event(&DeviceEvent::PointerUp));
    }

    #[test]
    fn click_uses_surface_geometry() {
        let mut engine = engine();
        engine.set_geometry(SurfaceGeometry::new(10.0, 20.0, 2.0));
        engine.start_game(all_hooks, "Tally");
        assert!(engine.handle_event(&DeviceEvent::TouchStart { x: 30.0, y: 60.0 }));
        assert_eq!(engine.input().touch(), (10.0, 20.0));
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.sink().score(), 10);
    }

    // -- 5. Game over ---------------------------------------------------------

    #[test]
    fn game_over_reports_once_and_halts_ticks() {
        let mut engine = engine();
        engine.start_game(all_hooks, "Tally");
        engine.add_score(40);
        engine.run_frames(2, 16.0);

        engine.handle_event(&DeviceEvent::KeyDown(Key::Escape));
        assert_eq!(engine.state(), LoopState::GameOver);
        engine.game_over();
        engine.game_over();
        assert_eq!(engine.sink().game_over_count(), 1);
        assert_eq!(engine.sink_mut().take_game_over(), Some(40));

        assert_eq!(engine.run_frames(5, 16.0), 0);
        assert!(!engine.frame_requested());
        // Game stays loaded until stopped.
        assert!(engine.has_game());
    }

    #[test]
    fn game_over_when_idle_is_ignored() {
        let mut engine = engine();
        engine.game_over();
        assert_eq!(engine.state(), LoopState::Idle);
        assert_eq!(engine.sink().game_over_count(), 0);
    }

    #[test]
    fn run_frames_continues_timestamps() {
        let mut engine = engine();
        engine.start_game(all_hooks, "Tally");
        assert_eq!(engine.run_frames(5, 20.0), 5);
        assert_eq!(engine.run_frames(5, 20.0), 5);
        assert_eq!(engine.elapsed(), 180.0);
        assert_eq!(engine.ticks(), 10);
    }

    #[test]
    fn window_title_tracks_state() {
        let mut engine = engine();
        assert_eq!(engine.window_title(), "Arcade");
        engine.start_game(all_hooks, "Tally");
        engine.add_score(5);
        assert_eq!(engine.window_title(), "Tally - Score: 5");
        engine.game_over();
        assert_eq!(engine.window_title(), "Tally - Game Over (5)");
    }
}
