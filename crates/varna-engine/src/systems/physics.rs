//! Per-step particle integration for every phase and motion model.

use glam::Vec2;

use crate::api::types::Dials;
use crate::core::dna::{MotionModel, WordDNA};
use crate::core::phase::{Phase, DISSOLVE_BURST_MS};
use crate::systems::flow::flow_direction;
use crate::systems::pool::Particle;

/// Velocity retained per step while assembling or alive.
pub const FRICTION: f32 = 0.92;
/// Velocity retained per step while dissolving.
pub const DISSOLVE_FRICTION: f32 = 0.96;
/// Distance past an edge before a particle wraps to the opposite side.
pub const WRAP_MARGIN: f32 = 50.0;
/// Outward push from the surface center at the start of a dissolve.
pub const DISSOLVE_BURST: f32 = 0.5;
/// Tether pulling Orbital and Flow particles back toward their targets.
pub const TETHER: f32 = 0.01;

/// Everything a step needs besides the particles and DNA. Time is explicit so
/// tests can drive the stepper without real delays.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub phase: Phase,
    /// Time spent in the current phase.
    pub phase_elapsed_ms: f64,
    /// Simulated clock in seconds, for oscillators and the flow field.
    pub time_secs: f64,
    pub dials: Dials,
    /// Simulation bounds in logical pixels.
    pub bounds: Vec2,
}

pub fn friction(phase: Phase) -> f32 {
    match phase {
        Phase::Dissolving => DISSOLVE_FRICTION,
        Phase::Assembling | Phase::Alive => FRICTION,
    }
}

/// Advance every particle one step.
pub fn step_particles(particles: &mut [Particle], dna: &WordDNA, ctx: &StepContext) {
    let damping = friction(ctx.phase);
    for particle in particles.iter_mut() {
        particle.velocity += acceleration(particle, dna, ctx);
        particle.velocity *= damping;
        particle.position += particle.velocity;
        particle.position = wrap_position(particle.position, ctx.bounds);
    }
}

/// Toroidal boundary: past the margin on one side re-enters at the margin on the other.
pub fn wrap_position(position: Vec2, bounds: Vec2) -> Vec2 {
    let wrap = |v: f32, extent: f32| {
        if v < -WRAP_MARGIN {
            extent + WRAP_MARGIN
        } else if v > extent + WRAP_MARGIN {
            -WRAP_MARGIN
        } else {
            v
        }
    };
    Vec2::new(wrap(position.x, bounds.x), wrap(position.y, bounds.y))
}

fn acceleration(p: &Particle, dna: &WordDNA, ctx: &StepContext) -> Vec2 {
    match ctx.phase {
        Phase::Assembling => assemble(p, dna, ctx.dials),
        Phase::Alive => match dna.motion {
            MotionModel::Orbital => orbital(p, dna, ctx.dials),
            MotionModel::Lattice => lattice(p, dna, ctx.dials, ctx.time_secs),
            MotionModel::Flow => flow(p, dna, ctx.dials, ctx.time_secs),
        },
        Phase::Dissolving => dissolve(p, dna, ctx),
    }
}

/// Straight at the target; chaos makes the approach more aggressive.
fn assemble(p: &Particle, dna: &WordDNA, dials: Dials) -> Vec2 {
    let d = p.to_target();
    let dist = d.length() + 0.001;
    let force = dna.assembly_speed * (1.0 + dials.chaos as f32 / 70.0);
    d / dist * force
}

/// Tangential swirl (the target offset rotated 90°) plus a weak centripetal pull.
fn orbital(p: &Particle, dna: &WordDNA, dials: Dials) -> Vec2 {
    let d = p.to_target();
    let dist = d.length() + 0.001;
    let strength = dna.vortex_strength * 8.0 * (dials.complexity as f32 / 50.0);
    d.perp() / dist * strength * 0.05 + d * TETHER
}

/// Stiff spring to the target with a time-driven shiver.
fn lattice(p: &Particle, dna: &WordDNA, dials: Dials, t: f64) -> Vec2 {
    let d = p.to_target();
    let angle = t * 10.0 + p.phase as f64;
    let jitter = Vec2::new(angle.sin() as f32, angle.cos() as f32) * (dials.complexity as f32 / 150.0);
    d * dna.lattice_rigidity + jitter
}

/// Ride the flow field, loosely tethered to the target.
fn flow(p: &Particle, dna: &WordDNA, dials: Dials, t: f64) -> Vec2 {
    let along = flow_direction(p.position, t, dna.flow_frequency);
    along * (dials.chaos as f32 / 50.0) + p.to_target() * TETHER
}

/// Brief outward burst, then a softened flow so the cloud drifts apart.
fn dissolve(p: &Particle, dna: &WordDNA, ctx: &StepContext) -> Vec2 {
    let mut accel = Vec2::ZERO;
    if ctx.phase_elapsed_ms < DISSOLVE_BURST_MS {
        let outward = (p.position - ctx.bounds * 0.5).normalize_or_zero();
        accel += outward * DISSOLVE_BURST;
    }
    let along = flow_direction(p.position * 0.6, ctx.time_secs, dna.flow_frequency);
    accel + along * (dna.vortex_strength * 1.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dna::derive_dna;
    use crate::core::phase::{ASSEMBLED_FRACTION, ASSEMBLE_TIMEOUT_MS};
    use crate::systems::pool::{arrived_fraction, build_pool};
    use crate::systems::rng::Rng;

    const BOUNDS: Vec2 = Vec2::new(400.0, 200.0);

    fn ctx(phase: Phase, dials: Dials) -> StepContext {
        StepContext {
            phase,
            phase_elapsed_ms: 0.0,
            time_secs: 0.0,
            dials,
            bounds: BOUNDS,
        }
    }

    fn dna_with(motion: MotionModel) -> WordDNA {
        WordDNA {
            motion,
            ..derive_dna("আলো")
        }
    }

    fn at(position: Vec2, target: Vec2) -> Particle {
        Particle {
            position,
            target,
            size: 1.0,
            ..Particle::default()
        }
    }

    #[test]
    fn wrap_moves_escapees_to_opposite_edge() {
        let m = WRAP_MARGIN;
        assert_eq!(wrap_position(Vec2::new(-m - 0.1, 50.0), BOUNDS), Vec2::new(BOUNDS.x + m, 50.0));
        assert_eq!(wrap_position(Vec2::new(BOUNDS.x + m + 1.0, 50.0), BOUNDS), Vec2::new(-m, 50.0));
        assert_eq!(wrap_position(Vec2::new(10.0, -m - 5.0), BOUNDS), Vec2::new(10.0, BOUNDS.y + m));
        assert_eq!(wrap_position(Vec2::new(10.0, BOUNDS.y + m + 5.0), BOUNDS), Vec2::new(10.0, -m));
        // Inside the margin nothing moves
        assert_eq!(wrap_position(Vec2::new(-m, BOUNDS.y + m), BOUNDS), Vec2::new(-m, BOUNDS.y + m));
    }

    #[test]
    fn no_particle_escapes_the_margin() {
        let dna = dna_with(MotionModel::Flow);
        let mut rng = Rng::new(11);
        let mut pool = build_pool(500, &[Vec2::new(200.0, 100.0)], &dna, BOUNDS, &mut rng);
        for p in pool.iter_mut() {
            p.velocity = Vec2::new(rng.centered(400.0), rng.centered(400.0));
        }
        let c = ctx(Phase::Dissolving, Dials::new(100, 100, 0));
        for _ in 0..20 {
            step_particles(&mut pool, &dna, &c);
            for p in &pool {
                assert!(p.position.x >= -WRAP_MARGIN && p.position.x <= BOUNDS.x + WRAP_MARGIN, "{p:?}");
                assert!(p.position.y >= -WRAP_MARGIN && p.position.y <= BOUNDS.y + WRAP_MARGIN, "{p:?}");
            }
        }
    }

    #[test]
    fn assembling_pulls_toward_target() {
        let dna = derive_dna("আলো");
        let mut pool = [at(Vec2::new(0.0, 100.0), Vec2::new(200.0, 100.0))];
        step_particles(&mut pool, &dna, &ctx(Phase::Assembling, Dials::new(0, 50, 0)));
        let expected = dna.assembly_speed * FRICTION;
        assert!((pool[0].velocity.x - expected).abs() < 1e-4, "{:?}", pool[0].velocity);
        assert!(pool[0].velocity.y.abs() < 1e-6);
    }

    #[test]
    fn chaos_strengthens_assembly() {
        let dna = derive_dna("আলো");
        let start = at(Vec2::ZERO, Vec2::new(100.0, 0.0));
        let mut calm = [start];
        let mut wild = [start];
        step_particles(&mut calm, &dna, &ctx(Phase::Assembling, Dials::new(0, 50, 0)));
        step_particles(&mut wild, &dna, &ctx(Phase::Assembling, Dials::new(100, 50, 0)));
        assert!(wild[0].velocity.x > calm[0].velocity.x * 2.0);
    }

    #[test]
    fn orbital_swirls_tangentially() {
        let dna = dna_with(MotionModel::Orbital);
        let mut pool = [at(Vec2::new(100.0, 100.0), Vec2::new(110.0, 100.0))];
        step_particles(&mut pool, &dna, &ctx(Phase::Alive, Dials::new(0, 100, 0)));
        // Offset points +x, so the swirl points +y; the tether adds a little +x
        assert!(pool[0].velocity.y > 0.0);
        assert!(pool[0].velocity.y > pool[0].velocity.x);
    }

    #[test]
    fn orbital_without_complexity_only_tethers() {
        let dna = dna_with(MotionModel::Orbital);
        let mut pool = [at(Vec2::new(100.0, 100.0), Vec2::new(110.0, 100.0))];
        step_particles(&mut pool, &dna, &ctx(Phase::Alive, Dials::new(0, 0, 0)));
        assert!(pool[0].velocity.y.abs() < 1e-6);
        assert!((pool[0].velocity.x - 10.0 * TETHER * FRICTION).abs() < 1e-5);
    }

    #[test]
    fn lattice_springs_back_and_shivers() {
        let dna = dna_with(MotionModel::Lattice);
        let mut still = [at(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0))];
        step_particles(&mut still, &dna, &ctx(Phase::Alive, Dials::new(0, 0, 0)));
        assert_eq!(still[0].velocity, Vec2::ZERO);

        let mut shaking = [at(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0))];
        step_particles(&mut shaking, &dna, &ctx(Phase::Alive, Dials::new(0, 100, 0)));
        // phase 0 at t 0: jitter is (sin 0, cos 0) * 100/150
        assert!((shaking[0].velocity.y - 100.0 / 150.0 * FRICTION).abs() < 1e-5);

        let mut displaced = [at(Vec2::new(90.0, 100.0), Vec2::new(100.0, 100.0))];
        step_particles(&mut displaced, &dna, &ctx(Phase::Alive, Dials::new(0, 0, 0)));
        let expected = 10.0 * dna.lattice_rigidity * FRICTION;
        assert!((displaced[0].velocity.x - expected).abs() < 1e-5);
    }

    #[test]
    fn lattice_shiver_keeps_moving_after_a_day() {
        let dna = dna_with(MotionModel::Lattice);
        let day = 86_400.0;
        let step = 1.0 / 60.0;
        let velocity_at = |t: f64| {
            let mut p = [at(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0))];
            let mut c = ctx(Phase::Alive, Dials::new(0, 100, 0));
            c.time_secs = t;
            step_particles(&mut p, &dna, &c);
            p[0].velocity
        };
        let expected = |t: f64| {
            Vec2::new((t * 10.0).sin() as f32, (t * 10.0).cos() as f32) * (100.0 / 150.0) * FRICTION
        };
        let now = velocity_at(day);
        let next = velocity_at(day + step);
        assert!((now - expected(day)).length() < 1e-5, "{now:?}");
        assert!((next - expected(day + step)).length() < 1e-5, "{next:?}");
        assert!((next - now).length() > 0.05, "shiver froze: {now:?} vs {next:?}");
    }

    #[test]
    fn flow_scales_with_chaos() {
        let dna = dna_with(MotionModel::Flow);
        let start = at(Vec2::new(150.0, 80.0), Vec2::new(150.0, 80.0));
        let mut calm = [start];
        let mut wild = [start];
        step_particles(&mut calm, &dna, &ctx(Phase::Alive, Dials::new(0, 50, 0)));
        step_particles(&mut wild, &dna, &ctx(Phase::Alive, Dials::new(100, 50, 0)));
        assert_eq!(calm[0].velocity, Vec2::ZERO);
        assert!((wild[0].velocity.length() - 2.0 * FRICTION).abs() < 1e-4);
    }

    #[test]
    fn dissolve_bursts_outward_then_drifts() {
        let dna = dna_with(MotionModel::Lattice);
        let start = at(Vec2::new(300.0, 100.0), Vec2::new(200.0, 100.0));
        let flow_only = {
            let mut p = [start];
            let mut c = ctx(Phase::Dissolving, Dials::default());
            c.phase_elapsed_ms = DISSOLVE_BURST_MS;
            step_particles(&mut p, &dna, &c);
            p[0].velocity
        };
        let with_burst = {
            let mut p = [start];
            step_particles(&mut p, &dna, &ctx(Phase::Dissolving, Dials::default()));
            p[0].velocity
        };
        let burst = (with_burst - flow_only) / DISSOLVE_FRICTION;
        assert!((burst - Vec2::new(DISSOLVE_BURST, 0.0)).length() < 1e-4, "{burst:?}");
        assert!(flow_only.length() > 0.0, "dissolving particles must keep drifting");
    }

    #[test]
    fn dissolve_damps_less_than_alive() {
        assert!(friction(Phase::Dissolving) > friction(Phase::Alive));
        assert_eq!(friction(Phase::Assembling), friction(Phase::Alive));
    }

    fn steps_to_assemble(chaos: u32) -> usize {
        let dna = derive_dna("আলো");
        let mut rng = Rng::new(2024);
        let targets: Vec<Vec2> = (0..200)
            .map(|i| Vec2::new(120.0 + (i % 20) as f32 * 8.0, 60.0 + (i / 20) as f32 * 8.0))
            .collect();
        let mut pool = build_pool(800, &targets, &dna, BOUNDS, &mut rng);
        let c = ctx(Phase::Assembling, Dials::new(chaos, 50, 0));
        for step in 1..=2000 {
            step_particles(&mut pool, &dna, &c);
            if arrived_fraction(&pool) >= ASSEMBLED_FRACTION {
                return step;
            }
        }
        usize::MAX
    }

    #[test]
    fn high_chaos_assembles_in_fewer_steps() {
        let calm = steps_to_assemble(0);
        let wild = steps_to_assemble(100);
        assert!(wild < calm, "chaos 100 took {wild} steps, chaos 0 took {calm}");
        // Both settle well inside the timeout at 60 Hz
        assert!((calm as f64) < ASSEMBLE_TIMEOUT_MS / (1000.0 / 60.0), "calm took {calm}");
    }

    #[test]
    fn unreachable_targets_never_arrive() {
        let dna = derive_dna("আলো");
        let far = Vec2::new(BOUNDS.x * 4.0, BOUNDS.y * 4.0);
        let mut pool = build_pool(100, &[far], &dna, BOUNDS, &mut Rng::new(1));
        let c = ctx(Phase::Assembling, Dials::new(100, 50, 0));
        for _ in 0..300 {
            step_particles(&mut pool, &dna, &c);
        }
        assert_eq!(arrived_fraction(&pool), 0.0);
    }
}
