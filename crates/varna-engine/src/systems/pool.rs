//! Particle pool construction.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::core::dna::WordDNA;
use crate::core::phase::CLOSE_DISTANCE_SQ;
use crate::systems::rng::Rng;

/// A single particle: kinematics, its glyph target, and visual attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub target: Vec2,
    /// Hue in degrees before the color dial and speed shift are applied.
    pub hue: f32,
    pub size: f32,
    /// Oscillator phase offset in radians.
    pub phase: f32,
}

impl Particle {
    /// How far outside the surface particles are born.
    pub const SPAWN_MARGIN: f32 = 20.0;
    /// Cap on the initial speed along each axis.
    pub const SPAWN_SPEED: f32 = 2.0;
    pub const MIN_SIZE: f32 = 0.6;
    pub const SIZE_SPREAD: f32 = 1.8;

    /// Spawn just off a random edge of `bounds`, drifting inward, aimed at `target`.
    pub fn spawn(target: Vec2, bounds: Vec2, dna: &WordDNA, rng: &mut Rng) -> Self {
        let m = Self::SPAWN_MARGIN;
        let s = Self::SPAWN_SPEED;
        let (position, velocity) = match rng.next_int(4) {
            0 => (
                Vec2::new(rng.range(0.0, bounds.x), -m),
                Vec2::new(rng.centered(2.0 * s), rng.range(0.0, s)),
            ),
            1 => (
                Vec2::new(bounds.x + m, rng.range(0.0, bounds.y)),
                Vec2::new(-rng.range(0.0, s), rng.centered(2.0 * s)),
            ),
            2 => (
                Vec2::new(rng.range(0.0, bounds.x), bounds.y + m),
                Vec2::new(rng.centered(2.0 * s), -rng.range(0.0, s)),
            ),
            _ => (
                Vec2::new(-m, rng.range(0.0, bounds.y)),
                Vec2::new(rng.range(0.0, s), rng.centered(2.0 * s)),
            ),
        };
        Self {
            position,
            velocity,
            target,
            hue: dna.hue_base + rng.centered(dna.hue_spread),
            size: Self::MIN_SIZE + rng.next_f32() * Self::SIZE_SPREAD,
            phase: rng.next_f32() * TAU,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn to_target(&self) -> Vec2 {
        self.target - self.position
    }

    /// Within `CLOSE_DISTANCE_SQ` of the target.
    pub fn has_arrived(&self) -> bool {
        self.to_target().length_squared() < CLOSE_DISTANCE_SQ
    }
}

/// Fraction of the pool that has arrived at its target (0 for an empty pool).
pub fn arrived_fraction(particles: &[Particle]) -> f32 {
    if particles.is_empty() {
        return 0.0;
    }
    let arrived = particles.iter().filter(|p| p.has_arrived()).count();
    arrived as f32 / particles.len() as f32
}

/// Overwrite `pool` in place with `count` fresh particles.
///
/// Targets are assigned round-robin, so a short target list is shared.
/// Returns false and leaves the pool untouched when `targets` is empty.
pub fn rebuild_pool(
    pool: &mut Vec<Particle>,
    count: usize,
    targets: &[Vec2],
    dna: &WordDNA,
    bounds: Vec2,
    rng: &mut Rng,
) -> bool {
    if targets.is_empty() {
        return false;
    }
    pool.resize(count, Particle::default());
    for (i, particle) in pool.iter_mut().enumerate() {
        *particle = Particle::spawn(targets[i % targets.len()], bounds, dna, rng);
    }
    true
}

/// Allocate a new pool of `count` particles over `targets`.
pub fn build_pool(
    count: usize,
    targets: &[Vec2],
    dna: &WordDNA,
    bounds: Vec2,
    rng: &mut Rng,
) -> Vec<Particle> {
    let mut pool = Vec::with_capacity(count);
    rebuild_pool(&mut pool, count, targets, dna, bounds, rng);
    pool
}
