use glam::Vec2;

use crate::api::types::SurfaceSize;
use crate::core::dna::WordDNA;
use crate::core::phase::{Phase, PhaseMachine};
use crate::systems::pool::Particle;

/// Everything the field mutates from frame to frame.
///
/// Owned by exactly one `AnimationDriver`; the stepper and renderer borrow it.
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// The label the current pool was sampled from.
    pub label: String,
    pub dna: WordDNA,
    pub particles: Vec<Particle>,
    pub machine: PhaseMachine,
    /// Surface geometry the targets were sampled against.
    pub size: SurfaceSize,
}

impl AnimationState {
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Simulation bounds in logical pixels.
    pub fn bounds(&self) -> Vec2 {
        self.size.logical()
    }

    pub fn pool_size(&self) -> usize {
        self.particles.len()
    }
}
