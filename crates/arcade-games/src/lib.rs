//! Arcade Games -- the three mini-games built on `arcade-engine`, plus the
//! session layer that picks one, runs it, and keeps high scores.
//!
//! | id           | title            | module                   |
//! |--------------|------------------|--------------------------|
//! | `platformer` | Super Platformer | [`platformer`]           |
//! | `collector`  | Coin Rush        | [`collector`]            |
//! | `puzzle`     | Block Puzzle     | [`puzzle`]               |
//!
//! ```
//! use arcade_games::prelude::*;
//!
//! let mut session = Session::new(EngineConfig::default(), HighScores::new());
//! session.start("collector").unwrap();
//! assert_eq!(session.current(), Some(GameKind::Collector));
//! assert!(session.start("pinball").is_err());
//! assert_eq!(session.current(), Some(GameKind::Collector));
//! ```

#![deny(unsafe_code)]

use arcade_engine::game::{Game, GameContext, GameFactory};
use arcade_engine::ArcadeError;

pub mod collector;
pub mod platformer;
pub mod puzzle;
pub mod session;

// ---------------------------------------------------------------------------
// GameKind
// ---------------------------------------------------------------------------

/// The games this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Platformer,
    Collector,
    Puzzle,
}

impl GameKind {
    /// Menu order.
    pub const ALL: [GameKind; 3] = [GameKind::Platformer, GameKind::Collector, GameKind::Puzzle];

    /// Look a game up by its id.
    ///
    /// # Errors
    ///
    /// [`ArcadeError::UnknownGame`] if `id` names no game.
    pub fn from_id(id: &str) -> Result<Self, ArcadeError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| ArcadeError::UnknownGame { id: id.to_owned() })
    }

    /// Stable id, also the high-score key.
    pub fn id(self) -> &'static str {
        match self {
            GameKind::Platformer => "platformer",
            GameKind::Collector => "collector",
            GameKind::Puzzle => "puzzle",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Platformer => "Super Platformer",
            GameKind::Collector => "Coin Rush",
            GameKind::Puzzle => "Block Puzzle",
        }
    }

    pub fn factory(self) -> GameFactory {
        match self {
            GameKind::Platformer => new_platformer,
            GameKind::Collector => new_collector,
            GameKind::Puzzle => new_puzzle,
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

fn new_platformer(ctx: &mut GameContext<'_>) -> Box<dyn Game> {
    Box::new(platformer::Platformer::new(ctx))
}

fn new_collector(ctx: &mut GameContext<'_>) -> Box<dyn Game> {
    Box::new(collector::Collector::new(ctx))
}

fn new_puzzle(ctx: &mut GameContext<'_>) -> Box<dyn Game> {
    Box::new(puzzle::Puzzle::new(ctx))
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::collector::Collector;
    pub use crate::platformer::Platformer;
    pub use crate::puzzle::Puzzle;
    pub use crate::session::{GameResult, Session};
    pub use crate::GameKind;
    pub use arcade_engine::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_engine::highscore::DEFAULT_GAME_IDS;

    #[test]
    fn ids_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_id(kind.id()).unwrap(), kind);
        }
    }

    #[test]
    fn ids_match_high_score_defaults() {
        let ids: Vec<&str> = GameKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids, DEFAULT_GAME_IDS);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let err = GameKind::from_id("Collector").unwrap_err();
        assert!(matches!(err, ArcadeError::UnknownGame { ref id } if id == "Collector"));
        assert_eq!(err.to_string(), "unknown game 'Collector'");
    }
}
