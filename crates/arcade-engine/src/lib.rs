//! Arcade Engine -- shared game loop, input, collision, and particle effects
//! for small 2D mini-games.
//!
//! A game implements [`Game`](game::Game) and is handed to an
//! [`Engine`](engine::Engine), which owns it, drives it once per host frame,
//! normalizes keyboard/pointer/touch input for it, and keeps score on its
//! behalf. Drawing goes through the [`Surface`](surface::Surface) trait so
//! games run identically in a window, in tests, and headless.
//!
//! # Quick Start
//!
//! ```
//! use arcade_engine::prelude::*;
//!
//! struct Clicker {
//!     clicks: u32,
//! }
//!
//! impl Game for Clicker {
//!     fn capabilities(&self) -> Capabilities {
//!         Capabilities::CLICK | Capabilities::RENDER
//!     }
//!
//!     fn handle_click(&mut self, ctx: &mut GameContext<'_>, x: f64, y: f64) {
//!         self.clicks += 1;
//!         ctx.add_score(10);
//!         ctx.emit_particle(x, y, ParticleSpec::default());
//!     }
//!
//!     fn render(&self, surface: &mut dyn Surface) {
//!         surface.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), Color::RED);
//!     }
//! }
//!
//! fn clicker(_ctx: &mut GameContext<'_>) -> Box<dyn Game> {
//!     Box::new(Clicker { clicks: 0 })
//! }
//!
//! let mut engine = Engine::new(EngineConfig::default(), ScoreBoard::new());
//! engine.start_game(clicker, "Clicker");
//! engine.handle_event(&DeviceEvent::PointerDown { x: 100.0, y: 100.0 });
//! engine.run_frames(3, 16.0);
//!
//! assert_eq!(engine.score(), 10);
//! assert_eq!(engine.sink().score_label(), "Score: 10");
//! assert_eq!(engine.particles().len(), 1);
//! ```

#![deny(unsafe_code)]

use std::path::PathBuf;

pub mod arena;
pub mod collision;
pub mod engine;
pub mod game;
pub mod highscore;
pub mod input;
pub mod particles;
pub mod replay;
pub mod score;
pub mod snapshot;
pub mod surface;

#[cfg(feature = "renderer")]
pub mod render;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the engine and its stores.
#[derive(Debug, thiserror::Error)]
pub enum ArcadeError {
    /// A game id that no registry entry matches.
    #[error("unknown game '{id}'")]
    UnknownGame {
        /// The id that was asked for.
        id: String,
    },

    /// The high-score file could not be read or written.
    #[error("high score file {}: {source}", path.display())]
    HighScoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// High-score data is not a JSON object of non-negative integers.
    #[error("malformed high score data: {0}")]
    HighScoreFormat(#[from] serde_json::Error),

    /// A replay log failed validation.
    #[error("invalid replay log: {0}")]
    Replay(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for writing games and hosts.
pub mod prelude {
    pub use crate::arena::{Arena, SlotMut};
    pub use crate::collision::{overlaps, GameObject, Rect};
    pub use crate::engine::{Engine, EngineConfig, FrameHost, GameHarness, LoopState};
    pub use crate::game::{
        clamp, distance, random_color, Capabilities, Game, GameContext, GameFactory, PALETTE,
    };
    pub use crate::highscore::{HighScores, DEFAULT_GAME_IDS};
    pub use crate::input::{
        ControlButton, DeviceEvent, GameInput, InputNormalizer, InputState, Key, SurfaceGeometry,
    };
    pub use crate::particles::{Particle, ParticleSpec, ParticleSystem};
    pub use crate::replay::{
        replay, ReplayDivergence, ReplayEntry, ReplayLog, ReplayRecorder, ReplayResult,
    };
    pub use crate::score::{NullSink, ScoreBoard, ScoreSink};
    pub use crate::snapshot::EngineSnapshot;
    pub use crate::surface::{
        Color, DrawCommand, DrawList, LinearGradient, NullSurface, Surface, TextAlign, TextStyle,
    };
    pub use crate::ArcadeError;
}
