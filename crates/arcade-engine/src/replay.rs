//! Deterministic replay of recorded sessions.
//!
//! A [`ReplayLog`] holds the seed, the game title, and one entry per frame:
//! the frame's timestamp and the device events delivered before it, plus
//! periodic state-hash checkpoints taken after the frame ran. [`replay`]
//! feeds the same frames to a fresh game on the same seed and compares each
//! checkpoint, stopping at the first divergence.
//!
//! # Recording
//!
//! ```
//! use arcade_engine::prelude::*;
//!
//! fn idle(_ctx: &mut GameContext<'_>) -> Box<dyn Game> {
//!     struct Idle;
//!     impl Game for Idle {
//!         fn capabilities(&self) -> Capabilities { Capabilities::NONE }
//!     }
//!     Box::new(Idle)
//! }
//!
//! let mut engine = Engine::new(EngineConfig::default(), NullSink);
//! engine.start_game(idle, "Idle");
//! let mut recorder = ReplayRecorder::new(engine.config().seed, "Idle", 5);
//! let mut surface = NullSurface::new();
//! for frame in 0..20u64 {
//!     let timestamp = frame as f64 * 16.0;
//!     engine.tick(timestamp, &mut surface);
//!     recorder.record_frame(frame, timestamp, &[], Some(engine.state_hash())).unwrap();
//! }
//! let log = recorder.finish();
//!
//! let mut fresh = Engine::new(EngineConfig::default(), NullSink);
//! let result = replay(&mut fresh, idle, &log).unwrap();
//! assert!(result.completed);
//! assert_eq!(result.frames_replayed, 20);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::game::GameFactory;
use crate::input::DeviceEvent;
use crate::score::ScoreSink;
use crate::surface::NullSurface;
use crate::ArcadeError;

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// A recorded session: seed, title, frames, and checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayLog {
    /// Engine RNG seed the session started from.
    pub seed: u64,
    /// Title the game was started with.
    pub title: String,
    /// Number of frames recorded. Frames are numbered `0..total_frames`.
    pub total_frames: u64,
    pub entries: Vec<ReplayEntry>,
}

/// One entry in a [`ReplayLog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReplayEntry {
    /// A frame and the events delivered just before it.
    Frame {
        frame: u64,
        timestamp_ms: f64,
        events: Vec<DeviceEvent>,
    },
    /// State hash taken after `frame` ran.
    Checkpoint { frame: u64, state_hash: String },
}

// ---------------------------------------------------------------------------
// ReplayResult
// ---------------------------------------------------------------------------

/// Outcome of [`replay`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    /// Every frame ran and every checkpoint matched.
    pub completed: bool,
    pub frames_replayed: u64,
    /// The first checkpoint whose hash did not match, if any.
    pub first_divergence: Option<ReplayDivergence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayDivergence {
    pub frame: u64,
    pub expected_hash: String,
    pub actual_hash: String,
}

// ---------------------------------------------------------------------------
// ReplayRecorder
// ---------------------------------------------------------------------------

/// Builds a [`ReplayLog`] frame by frame.
///
/// Frames must be recorded in strictly increasing order starting at 0 with
/// no gaps.
pub struct ReplayRecorder {
    log: ReplayLog,
    checkpoint_interval: u64,
    next_frame: u64,
}

impl ReplayRecorder {
    /// `checkpoint_interval` of N keeps the hash of every Nth frame
    /// (0, N, 2N, ...). Zero keeps every hash that is supplied.
    pub fn new(seed: u64, title: &str, checkpoint_interval: u64) -> Self {
        Self {
            log: ReplayLog {
                seed,
                title: title.to_owned(),
                total_frames: 0,
                entries: Vec::new(),
            },
            checkpoint_interval,
            next_frame: 0,
        }
    }

    /// Record a frame after it ran.
    ///
    /// # Errors
    ///
    /// [`ArcadeError::Replay`] if `frame` is not the next frame in sequence.
    /// Nothing is recorded in that case.
    pub fn record_frame(
        &mut self,
        frame: u64,
        timestamp_ms: f64,
        events: &[DeviceEvent],
        state_hash: Option<String>,
    ) -> Result<(), ArcadeError> {
        if frame != self.next_frame {
            return Err(ArcadeError::Replay(format!(
                "expected frame {} but got {frame}",
                self.next_frame
            )));
        }
        self.next_frame += 1;

        self.log.entries.push(ReplayEntry::Frame {
            frame,
            timestamp_ms,
            events: events.to_vec(),
        });

        if let Some(state_hash) = state_hash {
            let keep = self.checkpoint_interval == 0 || frame % self.checkpoint_interval == 0;
            if keep {
                self.log
                    .entries
                    .push(ReplayEntry::Checkpoint { frame, state_hash });
            }
        }
        Ok(())
    }

    pub fn frames_recorded(&self) -> u64 {
        self.next_frame
    }

    pub fn finish(mut self) -> ReplayLog {
        self.log.total_frames = self.next_frame;
        self.log
    }
}

// ---------------------------------------------------------------------------
// replay()
// ---------------------------------------------------------------------------

struct RecordedFrame<'a> {
    timestamp_ms: f64,
    events: &'a [DeviceEvent],
}

/// Replay `log` on `engine` with a fresh game from `factory`.
///
/// The log is validated before the engine is touched: every frame in
/// `0..total_frames` must appear exactly once, and every checkpoint must
/// name a frame in that range, at most once. The engine is then reseeded, the game started, and each
/// frame's events and tick replayed in order against a [`NullSurface`].
///
/// # Errors
///
/// [`ArcadeError::Replay`] if the log is malformed. The engine is left
/// untouched in that case.
pub fn replay<S: ScoreSink>(
    engine: &mut Engine<S>,
    factory: GameFactory,
    log: &ReplayLog,
) -> Result<ReplayResult, ArcadeError> {
    let mut frames: BTreeMap<u64, RecordedFrame<'_>> = BTreeMap::new();
    let mut checkpoints: BTreeMap<u64, &str> = BTreeMap::new();

    for entry in &log.entries {
        match entry {
            ReplayEntry::Frame {
                frame,
                timestamp_ms,
                events,
            } => {
                if *frame >= log.total_frames {
                    return Err(ArcadeError::Replay(format!(
                        "frame {frame} is outside the recorded range 0..{}",
                        log.total_frames
                    )));
                }
                let recorded = RecordedFrame {
                    timestamp_ms: *timestamp_ms,
                    events,
                };
                if frames.insert(*frame, recorded).is_some() {
                    return Err(ArcadeError::Replay(format!(
                        "duplicate frame entry {frame}"
                    )));
                }
            }
            ReplayEntry::Checkpoint { frame, state_hash } => {
                if *frame >= log.total_frames {
                    return Err(ArcadeError::Replay(format!(
                        "checkpoint at frame {frame} is outside the recorded range 0..{}",
                        log.total_frames
                    )));
                }
                if checkpoints.insert(*frame, state_hash.as_str()).is_some() {
                    return Err(ArcadeError::Replay(format!(
                        "duplicate checkpoint at frame {frame}"
                    )));
                }
            }
        }
    }

    if frames.len() as u64 != log.total_frames {
        return Err(ArcadeError::Replay(format!(
            "log declares {} frames but holds {}",
            log.total_frames,
            frames.len()
        )));
    }

    engine.reseed(log.seed);
    engine.start_game(factory, &log.title);
    let mut surface = NullSurface::new();
    let mut frames_replayed = 0;

    for (frame, recorded) in &frames {
        for event in recorded.events {
            engine.handle_event(event);
        }
        engine.tick(recorded.timestamp_ms, &mut surface);
        frames_replayed += 1;

        if let Some(expected) = checkpoints.get(frame) {
            let actual = engine.state_hash();
            if actual != *expected {
                warn!(frame, expected = %expected, actual = %actual, "replay diverged");
                return Ok(ReplayResult {
                    completed: false,
                    frames_replayed,
                    first_divergence: Some(ReplayDivergence {
                        frame: *frame,
                        expected_hash: (*expected).to_owned(),
                        actual_hash: actual,
                    }),
                });
            }
        }
    }

    debug!(frames = frames_replayed, title = %log.title, "replay completed");
    Ok(ReplayResult {
        completed: true,
        frames_replayed,
        first_divergence: None,
    })
}
