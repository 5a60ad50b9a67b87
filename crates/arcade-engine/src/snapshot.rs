//! Engine state capture with BLAKE3 hashing.
//!
//! [`EngineSnapshot`] is a serializable view of everything that decides how
//! the next tick plays out: loop state, score, elapsed time, live particles,
//! held input, and the running game's own snapshot. Its `hash` is the BLAKE3
//! hex digest of that state serialized as JSON, so two engines that were fed
//! the same seed, game, timestamps, and events produce equal hashes.
//!
//! ```
//! use arcade_engine::prelude::*;
//!
//! let mut a = Engine::new(EngineConfig { seed: 9, ..Default::default() }, NullSink);
//! let mut b = Engine::new(EngineConfig { seed: 9, ..Default::default() }, NullSink);
//! a.run_frames(10, 16.0);
//! b.run_frames(10, 16.0);
//! assert_eq!(a.state_hash(), b.state_hash());
//! assert_eq!(a.capture_snapshot().hash.len(), 64);
//! ```
//!
//! # What is not captured
//!
//! - **RNG state**. Determinism comes from replaying from the same seed, not
//!   from restoring mid-run.
//! - **The score sink** and the frame-request flag. They do not feed back
//!   into simulation.

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, LoopState};
use crate::input::InputState;
use crate::particles::ParticleSystem;
use crate::score::ScoreSink;

// ---------------------------------------------------------------------------
// EngineSnapshot
// ---------------------------------------------------------------------------

/// A serializable snapshot of engine state plus its BLAKE3 hex digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: LoopState,
    pub score: u64,
    /// Milliseconds since the game's first tick.
    pub elapsed: f64,
    /// Ticks that did work since the game started.
    pub ticks: u64,
    pub particles: ParticleSystem,
    pub input: InputState,
    /// Whatever the running game chose to expose, if anything.
    pub game: Option<serde_json::Value>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of every other field.
    pub hash: String,
}

impl EngineSnapshot {
    /// Recompute the hash from the snapshot's fields and compare.
    pub fn verify(&self) -> bool {
        compute_hash(&HashableState::of(self)) == self.hash
    }
}

#[derive(Serialize)]
struct HashableState<'a> {
    state: LoopState,
    score: u64,
    elapsed: f64,
    ticks: u64,
    particles: &'a ParticleSystem,
    input: &'a InputState,
    game: Option<&'a serde_json::Value>,
}

impl<'a> HashableState<'a> {
    fn of(snapshot: &'a EngineSnapshot) -> Self {
        Self {
            state: snapshot.state,
            score: snapshot.score,
            elapsed: snapshot.elapsed,
            ticks: snapshot.ticks,
            particles: &snapshot.particles,
            input: &snapshot.input,
            game: snapshot.game.as_ref(),
        }
    }
}

fn compute_hash(state: &HashableState<'_>) -> String {
    // Plain data; serializing into a Vec cannot fail.
    let bytes = serde_json::to_vec(state).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// Engine snapshot methods
// ---------------------------------------------------------------------------

impl<S: ScoreSink> Engine<S> {
    /// Capture the current engine state and its hash.
    pub fn capture_snapshot(&self) -> EngineSnapshot {
        let mut snapshot = EngineSnapshot {
            state: self.state(),
            score: self.score(),
            elapsed: self.elapsed(),
            ticks: self.ticks(),
            particles: self.particles().clone(),
            input: self.input().clone(),
            game: self.game_snapshot(),
            hash: String::new(),
        };
        snapshot.hash = compute_hash(&HashableState::of(&snapshot));
        snapshot
    }

    /// BLAKE3 hex digest of the current state.
    pub fn state_hash(&self) -> String {
        let game = self.game_snapshot();
        compute_hash(&HashableState {
            state: self.state(),
            score: self.score(),
            elapsed: self.elapsed(),
            ticks: self.ticks(),
            particles: self.particles(),
            input: self.input(),
            game: game.as_ref(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn engine(seed: u64) -> Engine<NullSink> {
        Engine::new(
            EngineConfig {
                seed,
                headless: true,
                ..Default::default()
            },
            NullSink,
        )
    }

    struct Sparkler;

    impl Game for Sparkler {
        fn capabilities(&self) -> Capabilities {
            Capabilities::UPDATE
        }

        fn update(&mut self, ctx: &mut GameContext<'_>, _delta_ms: f64) {
            let x = ctx.random_range(0.0, 800.0);
            ctx.emit_particle(x, 300.0, ParticleSpec::default());
        }
    }

    fn sparkler(_ctx: &mut GameContext<'_>) -> Box<dyn Game> {
        Box::new(Sparkler)
    }

    #[test]
    fn snapshot_hash_matches_state_hash() {
        let mut e = engine(1);
        e.start_game(sparkler, "Sparkler");
        e.run_frames(20, 16.0);
        let snapshot = e.capture_snapshot();
        assert_eq!(snapshot.hash, e.state_hash());
        assert!(snapshot.verify());
    }

    #[test]
    fn same_seed_same_hash() {
        let mut a = engine(42);
        let mut b = engine(42);
        a.start_game(sparkler, "Sparkler");
        b.start_game(sparkler, "Sparkler");
        a.run_frames(30, 16.0);
        b.run_frames(30, 16.0);
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn different_seed_different_hash() {
        let mut a = engine(1);
        let mut b = engine(2);
        a.start_game(sparkler, "Sparkler");
        b.start_game(sparkler, "Sparkler");
        a.run_frames(5, 16.0);
        b.run_frames(5, 16.0);
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn tampered_snapshot_fails_verification() {
        let mut e = engine(3);
        e.start_game(sparkler, "Sparkler");
        e.run_frames(3, 16.0);
        let mut snapshot = e.capture_snapshot();
        snapshot.score += 1;
        assert!(!snapshot.verify());
    }

    #[test]
    fn snapshot_survives_json() {
        let mut e = engine(4);
        e.start_game(sparkler, "Sparkler");
        e.run_frames(8, 16.0);
        let snapshot = e.capture_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: EngineSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hash, snapshot.hash);
        assert_eq!(back.score, snapshot.score);
        assert_eq!(back.particles.len(), 8);
    }
}
