//! Draws the particle pool onto a [`DrawSurface`]: trail fade, velocity
//! streaks, and glow dots on fast particles.

use crate::api::types::Dials;
use crate::core::state::AnimationState;
use crate::renderer::color::{Hsla, Rgba};
use crate::renderer::traits::{BlendMode, DrawSurface};
use crate::systems::pool::Particle;

/// Trail colour; its alpha is `1 - lifespan`.
pub const TRAIL_RGB: [u8; 3] = [2, 8, 6];
/// Streak length in steps of velocity.
pub const STREAK_STEPS: f32 = 3.0;
/// Particles faster than this (px/step) get a glow dot.
pub const GLOW_SPEED: f32 = 2.5;
pub const MAX_ALPHA: f32 = 0.85;

/// Shifted hue in `[0, 360)`.
pub fn particle_hue(particle: &Particle, color_mode: u8) -> f32 {
    (color_mode as f32 + particle.hue + 15.0 * particle.speed()).rem_euclid(360.0)
}

/// Streak opacity before the dissolve fade.
pub fn particle_alpha(particle: &Particle) -> f32 {
    (0.15 + 0.4 * particle.speed()).min(MAX_ALPHA)
}

/// Draw one frame of `state` at simulated time `now_ms`.
pub fn render_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    state: &AnimationState,
    dials: Dials,
    now_ms: f64,
) {
    let (width, height) = surface.size();
    let [r, g, b] = TRAIL_RGB;
    let trail = Rgba::from_rgb8(r, g, b, 1.0 - state.dna.lifespan);
    surface.fill_rect(0.0, 0.0, width as f32, height as f32, trail, BlendMode::Alpha);

    let fade = state.machine.fade(now_ms);
    if fade <= 0.0 {
        return;
    }
    let dpr = state.size.dpr;
    for particle in &state.particles {
        let speed = particle.speed();
        let hue = particle_hue(particle, dials.color_mode);
        let alpha = particle_alpha(particle) * fade;
        let head = particle.position * dpr;
        let tail = (particle.position - particle.velocity * STREAK_STEPS) * dpr;
        let stroke = Hsla::new(hue, 0.85, 0.65, alpha).to_rgba();
        let width = particle.size * (1.0 + 0.3 * speed) * dpr;
        surface.draw_line(head, tail, width, stroke, BlendMode::Additive);

        if speed > GLOW_SPEED {
            let glow = Hsla::new(hue, 1.0, 0.9, 0.4 * alpha).to_rgba();
            surface.fill_circle(head, 1.2 * particle.size * dpr, glow, BlendMode::Additive);
        }
    }
}
