//! Where score and game-over notifications go.
//!
//! The engine never formats or displays anything itself. It reports the
//! current title, every score change, and the final score to a
//! [`ScoreSink`] owned by the engine.

/// Receiver of score-related notifications from the engine.
pub trait ScoreSink {
    /// A game with this title has started.
    fn show_title(&mut self, title: &str);

    /// The displayed score changed.
    fn update_score(&mut self, score: u64);

    /// The running game ended with `final_score`. Called once per game.
    fn report_game_over(&mut self, final_score: u64);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn show_title(&mut self, _title: &str) {}
    fn update_score(&mut self, _score: u64) {}
    fn report_game_over(&mut self, _final_score: u64) {}
}

/// Keeps the last title and score, plus a final score waiting to be
/// collected by whoever handles game-over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    title: String,
    score: u64,
    pending_game_over: Option<u64>,
    game_overs: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Human-readable score line, e.g. `"Score: 150"`.
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// Take the final score reported since the last call, if any.
    pub fn take_game_over(&mut self) -> Option<u64> {
        self.pending_game_over.take()
    }

    /// Whether a game-over report is waiting.
    pub fn has_pending_game_over(&self) -> bool {
        self.pending_game_over.is_some()
    }

    /// Total game-over reports received.
    pub fn game_over_count(&self) -> u32 {
        self.game_overs
    }
}

impl ScoreSink for ScoreBoard {
    fn show_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }

    fn update_score(&mut self, score: u64) {
        self.score = score;
    }

    fn report_game_over(&mut self, final_score: u64) {
        self.pending_game_over = Some(final_score);
        self.game_overs += 1;
    }
}

impl<S: ScoreSink + ?Sized> ScoreSink for &mut S {
    fn show_title(&mut self, title: &str) {
        (**self).show_title(title);
    }

    fn update_score(&mut self, score: u64) {
        (**self).update_score(score);
    }

    fn report_game_over(&mut self, final_score: u64) {
        (**self).report_game_over(final_score);
    }
}
