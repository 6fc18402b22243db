//! Burst particles
//!
//! Purely visual. Particles live in board cell units (a cell is 1×1, y grows
//! downward) and advance once per rendered frame, independent of the tick
//! rate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Cells per frame
    pub vel: Vec2,
    /// 0-1, multiplied by [`PARTICLE_DECAY`] each frame
    pub life: f32,
    /// 0xRRGGBB
    pub color: u32,
}

/// Owner of every live particle
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` particles at `origin`, flying out at uniform random
    /// angles with a random speed in [`PARTICLE_MIN_SPEED`, `PARTICLE_MAX_SPEED`).
    pub fn spawn_burst<R: Rng>(&mut self, rng: &mut R, origin: Vec2, color: u32, count: usize) {
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
            self.push(Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                life: 1.0,
                color,
            });
        }
    }

    /// Add a single particle. It stays until its life fades out.
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// One frame: integrate, apply gravity, decay, then drop faded particles
    pub fn advance(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.vel.y += PARTICLE_GRAVITY;
            particle.life *= PARTICLE_DECAY;
        }
        self.particles.retain(|p| p.life >= PARTICLE_MIN_LIFE);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
