//! The layer between a host and the engine: which game is loaded, and what
//! happens to its score when it ends.
//!
//! A [`Session`] starts games by id, forwards frames and device events, and
//! on game-over records the final score in [`HighScores`], persists it, and
//! keeps a [`GameResult`] for the host to show.

use serde::Serialize;
use tracing::{error, info, warn};

use arcade_engine::engine::{Engine, EngineConfig, FrameHost, LoopState};
use arcade_engine::highscore::HighScores;
use arcade_engine::input::{DeviceEvent, SurfaceGeometry};
use arcade_engine::score::ScoreBoard;
use arcade_engine::surface::Surface;
use arcade_engine::ArcadeError;

use crate::GameKind;

/// How the last game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub game: GameKind,
    pub final_score: u64,
    /// Best score for the game after this one was recorded.
    pub best: u64,
    pub new_high_score: bool,
}

pub struct Session {
    engine: Engine<ScoreBoard>,
    scores: HighScores,
    current: Option<GameKind>,
    last_result: Option<GameResult>,
}

impl Session {
    /// A session at the menu.
    pub fn new(config: EngineConfig, scores: HighScores) -> Self {
        Self {
            engine: Engine::new(config, ScoreBoard::new()),
            scores,
            current: None,
            last_result: None,
        }
    }

    /// Start the game named `id`, replacing whatever is running.
    ///
    /// # Errors
    ///
    /// [`ArcadeError::UnknownGame`] if `id` names no game. Nothing changes
    /// in that case.
    pub fn start(&mut self, id: &str) -> Result<(), ArcadeError> {
        let kind = GameKind::from_id(id).inspect_err(|_| {
            error!(id, "unknown game requested");
        })?;
        self.start_kind(kind);
        Ok(())
    }

    pub fn start_kind(&mut self, kind: GameKind) {
        self.last_result = None;
        self.engine.start_game(kind.factory(), kind.title());
        self.current = Some(kind);
        info!(game = %kind, best = self.scores.best(kind.id()), "session started game");
    }

    /// Start the current game over. Returns `false` at the menu.
    pub fn restart(&mut self) -> bool {
        match self.current {
            Some(kind) => {
                self.start_kind(kind);
                true
            }
            None => false,
        }
    }

    /// Stop the game and go back to the menu.
    pub fn show_menu(&mut self) {
        self.engine.stop();
        self.current = None;
    }

    /// Run one frame. Returns whether the engine did work.
    pub fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> bool {
        let worked = self.engine.tick(timestamp_ms, surface);
        self.collect_game_over();
        worked
    }

    /// Forward a device event. Clicks can end a game too.
    pub fn handle_event(&mut self, event: &DeviceEvent) -> bool {
        let handled = self.engine.handle_event(event);
        self.collect_game_over();
        handled
    }

    fn collect_game_over(&mut self) {
        let Some(final_score) = self.engine.sink_mut().take_game_over() else {
            return;
        };
        let Some(game) = self.current else {
            return;
        };

        let new_high_score = self.scores.record(game.id(), final_score);
        if new_high_score {
            if let Err(e) = self.scores.save() {
                warn!(error = %e, "could not persist high scores");
            }
        }
        let result = GameResult {
            game,
            final_score,
            best: self.scores.best(game.id()),
            new_high_score,
        };
        info!(
            game = %game,
            final_score,
            best = result.best,
            new_high_score,
            "game finished"
        );
        self.last_result = Some(result);
    }

    // -- accessors ------------------------------------------------------------

    pub fn current(&self) -> Option<GameKind> {
        self.current
    }

    pub fn state(&self) -> LoopState {
        self.engine.state()
    }

    pub fn last_result(&self) -> Option<GameResult> {
        self.last_result
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn engine(&self) -> &Engine<ScoreBoard> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<ScoreBoard> {
        &mut self.engine
    }
}

impl FrameHost for Session {
    fn device_event(&mut self, event: &DeviceEvent) {
        self.handle_event(event);
    }

    fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> bool {
        Session::frame(self, timestamp_ms, surface)
    }

    fn window_title(&self) -> String {
        self.engine.window_title()
    }

    fn surface_size(&self) -> (f64, f64) {
        self.engine.surface_size()
    }

    fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.engine.set_geometry(geometry);
    }
}
