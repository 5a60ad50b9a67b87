//! Best score per game, persisted as a small JSON object.
//!
//! ```json
//! { "collector": 1250, "platformer": 0, "puzzle": 3400 }
//! ```
//!
//! Loading never fails: a missing file yields the defaults, and an
//! unreadable or malformed one yields the defaults with a warning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::ArcadeError;

/// Game ids that always have an entry, starting at zero.
pub const DEFAULT_GAME_IDS: [&str; 3] = ["platformer", "collector", "puzzle"];

/// Game id to best score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    scores: BTreeMap<String, u64>,
    path: Option<PathBuf>,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// In-memory store with every default id at zero.
    pub fn new() -> Self {
        Self {
            scores: Self::defaults(),
            path: None,
        }
    }

    fn defaults() -> BTreeMap<String, u64> {
        DEFAULT_GAME_IDS
            .iter()
            .map(|id| ((*id).to_owned(), 0))
            .collect()
    }

    /// Parse a JSON object of id to score. Default ids missing from the
    /// input are filled in with zero.
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let parsed: BTreeMap<String, u64> = serde_json::from_str(json)?;
        let mut scores = Self::defaults();
        scores.extend(parsed);
        Ok(Self { scores, path: None })
    }

    /// Load from `path`, falling back to defaults on any problem. The
    /// returned store saves back to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut store = match Self::try_load(&path) {
            Ok(store) => store,
            Err(ArcadeError::HighScoreIo { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!(path = %path.display(), "no high score file yet, using defaults");
                Self::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "high scores unusable, using defaults");
                Self::new()
            }
        };
        store.path = Some(path);
        store
    }

    /// Load from `path`, reporting why it failed.
    pub fn try_load(path: &Path) -> Result<Self, ArcadeError> {
        let text = std::fs::read_to_string(path).map_err(|source| ArcadeError::HighScoreIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Write to the path this store was loaded from. A store with no path
    /// has nowhere to go and succeeds trivially.
    pub fn save(&self) -> Result<(), ArcadeError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| ArcadeError::HighScoreIo {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_json()).map_err(io_err)?;
        debug!(path = %path.display(), "high scores saved");
        Ok(())
    }

    pub fn to_json(&self) -> String {
        // A map of strings to integers always serializes.
        serde_json::to_string_pretty(&self.scores).unwrap_or_default()
    }

    /// Best score for `game_id`, zero if never recorded.
    pub fn best(&self, game_id: &str) -> u64 {
        self.scores.get(game_id).copied().unwrap_or(0)
    }

    /// Record a finished game. Returns `true` and stores the score only if
    /// it beats the current best.
    pub fn record(&mut self, game_id: &str, score: u64) -> bool {
        if score > self.best(game_id) {
            self.scores.insert(game_id.to_owned(), score);
            true
        } else {
            false
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.scores.iter().map(|(id, score)| (id.as_str(), *score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_zero() {
        let scores = HighScores::new();
        for id in DEFAULT_GAME_IDS {
            assert_eq!(scores.best(id), 0);
        }
        assert_eq!(scores.iter().count(), 3);
    }

    #[test]
    fn record_only_accepts_improvements() {
        let mut scores = HighScores::new();
        assert!(scores.record("collector", 500));
        assert!(!scores.record("collector", 500));
        assert!(!scores.record("collector", 20));
        assert!(scores.record("collector", 501));
        assert_eq!(scores.best("collector"), 501);
    }

    #[test]
    fn zero_is_never_a_new_best() {
        let mut scores = HighScores::new();
        assert!(!scores.record("puzzle", 0));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let scores = HighScores::from_json(r#"{"puzzle": 900}"#).unwrap();
        assert_eq!(scores.best("puzzle"), 900);
        assert_eq!(scores.best("platformer"), 0);
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        let err = HighScores::from_json("{not json").unwrap_err();
        assert!(matches!(err, ArcadeError::HighScoreFormat(_)));
        let err = HighScores::from_json(r#"{"puzzle": "lots"}"#).unwrap_err();
        assert!(matches!(err, ArcadeError::HighScoreFormat(_)));
    }

    #[test]
    fn in_memory_save_is_a_no_op() {
        assert!(HighScores::new().save().is_ok());
    }
}
