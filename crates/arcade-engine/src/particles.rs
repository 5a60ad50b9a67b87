//! Engine-owned transient particle effects.
//!
//! Games request particles through the engine context; the engine advances
//! and draws them every tick after the game's own update. Each particle
//! falls under a constant per-tick gravity and fades out linearly.
//!
//! # Fixed-step decay
//!
//! Decay is applied per tick, not scaled by the frame delta: a particle with
//! the default decay of 0.02 lives exactly 50 ticks whatever the frame rate.
//! Remaining life is computed as `1.0 - age * decay` rather than accumulated,
//! so the 50th tick lands on exactly zero instead of a rounding residue.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::collision::Rect;
use crate::surface::{Color, Surface};

/// Life removed per tick.
pub const PARTICLE_DECAY: f64 = 0.02;

/// Added to a particle's vertical velocity every tick.
pub const PARTICLE_GRAVITY: f64 = 0.1;

/// Half-width of the uniform jitter added to each velocity axis on emit.
pub const PARTICLE_JITTER: f64 = 1.0;

// ---------------------------------------------------------------------------
// Particle
// ---------------------------------------------------------------------------

/// A single fading square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: Color,
    pub size: f64,
    /// Ticks this particle has been advanced.
    pub age: u32,
    pub decay: f64,
}

impl Particle {
    /// Remaining life fraction; starts at 1.0 and reaches 0.0 after
    /// `1 / decay` ticks.
    pub fn life(&self) -> f64 {
        1.0 - self.age as f64 * self.decay
    }

    pub fn is_alive(&self) -> bool {
        self.life() > 0.0
    }
}

/// What a game asks for when it emits a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    pub color: Color,
    pub size: f64,
    /// Initial velocity before jitter, in pixels per tick.
    pub velocity: (f64, f64),
}

impl Default for ParticleSpec {
    /// Gold, size 5, drifting upward.
    fn default() -> Self {
        Self {
            color: Color::GOLD,
            size: 5.0,
            velocity: (0.0, -2.0),
        }
    }
}

impl ParticleSpec {
    pub fn new(color: Color, size: f64, velocity: (f64, f64)) -> Self {
        Self {
            color,
            size,
            velocity,
        }
    }
}

// ---------------------------------------------------------------------------
// ParticleSystem
// ---------------------------------------------------------------------------

/// The live particle set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Arena<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a particle at `(x, y)`.
    ///
    /// Each velocity axis gets uniform jitter in `[-1, 1)` from `rng`.
    pub fn emit<R: Rng>(&mut self, rng: &mut R, x: f64, y: f64, spec: ParticleSpec) {
        let vx = spec.velocity.0 + rng.gen_range(-PARTICLE_JITTER..PARTICLE_JITTER);
        let vy = spec.velocity.1 + rng.gen_range(-PARTICLE_JITTER..PARTICLE_JITTER);
        self.particles.push(Particle {
            x,
            y,
            vx,
            vy,
            color: spec.color,
            size: spec.size,
            age: 0,
            decay: PARTICLE_DECAY,
        });
    }

    /// Advance every particle by one tick and drop the expired ones.
    ///
    /// Movement and gravity happen before the life check, so a particle's
    /// final tick still moves it. The frame delta is not used (see module
    /// docs).
    pub fn advance(&mut self, _delta_ms: f64) {
        for mut slot in self.particles.iter_mut() {
            let particle = &mut *slot;
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.vy += PARTICLE_GRAVITY;
            particle.age += 1;
            if !particle.is_alive() {
                slot.kill();
            }
        }
        self.particles.compact();
    }

    /// Draw each particle as a square with alpha equal to its life, then
    /// restore full opacity.
    pub fn render(&self, surface: &mut dyn Surface) {
        for particle in self.particles.iter() {
            surface.set_alpha(particle.life());
            surface.fill_rect(
                Rect::new(particle.x, particle.y, particle.size, particle.size),
                particle.color,
            );
        }
        surface.set_alpha(1.0);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
