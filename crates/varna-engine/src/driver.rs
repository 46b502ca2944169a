use crate::api::config::FieldConfig;
use crate::api::error::VarnaError;
use crate::api::types::{Dials, SurfaceSize};
use crate::core::dna::derive_dna;
use crate::core::phase::{Phase, PhaseMachine, PhaseTransition};
use crate::core::state::AnimationState;
use crate::core::time::FixedTimestep;
use crate::input::queue::{ControlEvent, ControlQueue};
use crate::renderer::traits::DrawSurface;
use crate::systems::physics::{step_particles, StepContext};
use crate::systems::pool::{arrived_fraction, build_pool, rebuild_pool};
use crate::systems::render::render_frame;
use crate::systems::rng::Rng;
use crate::systems::sampler::{sample_glyph, GlyphRasterizer, GlyphStyle};

/// RNG seed used when the config does not provide one.
pub const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Frame loop for one particle field.
///
/// Owns the `AnimationState` exclusively. The host pushes `ControlEvent`s
/// between frames and calls `update` / `render` (or `frame`) once per display
/// refresh; all mutation happens inside those calls.
pub struct AnimationDriver<R: GlyphRasterizer> {
    config: FieldConfig,
    style: GlyphStyle,
    rasterizer: R,
    rng: Rng,
    clock: FixedTimestep,
    controls: ControlQueue,
    dials: Dials,
    text: String,
    generating: bool,
    fonts_ready: bool,
    size: SurfaceSize,
    state: Option<AnimationState>,
    /// A text change, resize or failed build is waiting for a (re)sample.
    rebuild_pending: bool,
    /// The last build attempt failed; suppresses repeated warnings.
    degraded: bool,
}

impl<R: GlyphRasterizer> AnimationDriver<R> {
    pub fn new(config: FieldConfig, rasterizer: R, size: SurfaceSize) -> Self {
        let config = config.sanitized();
        Self {
            style: config.glyph_style(),
            rng: Rng::new(config.seed.unwrap_or(DEFAULT_SEED)),
            clock: FixedTimestep::new(config.fixed_dt),
            fonts_ready: !config.wait_for_fonts,
            config,
            rasterizer,
            controls: ControlQueue::new(),
            dials: Dials::default(),
            text: String::new(),
            generating: false,
            size,
            state: None,
            rebuild_pending: true,
            degraded: false,
        }
    }

    /// Queue a control event for the next `update`.
    pub fn push(&mut self, event: ControlEvent) {
        self.controls.push(event);
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn dials(&self) -> Dials {
        self.dials
    }

    /// Raw text as last set by the host (may be blank).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn fonts_ready(&self) -> bool {
        self.fonts_ready
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// The live pool, if one has been built.
    pub fn state(&self) -> Option<&AnimationState> {
        self.state.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.state.as_ref().map(AnimationState::phase)
    }

    /// Simulated clock in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    /// Apply pending controls, (re)build if needed, then run the fixed steps `dt` covers.
    pub fn update(&mut self, dt: f32) {
        self.apply_controls();

        let mut rebuilt = false;
        if self.rebuild_pending {
            self.try_rebuild();
            rebuilt = true;
        }

        let steps = self.clock.accumulate(dt);
        for _ in 0..steps {
            let now = self.clock.advance();
            let Some(transition) = self.advance_phase(now) else {
                continue;
            };
            match transition {
                PhaseTransition::Entered(phase) => {
                    log::debug!("phase -> {} at {:.0}ms", phase.name(), now);
                }
                // Once per frame at most; the machine keeps reporting Expired until a build lands.
                PhaseTransition::Expired if !rebuilt => {
                    rebuilt = true;
                    self.rebuild_pending = true;
                    self.try_rebuild();
                }
                PhaseTransition::Expired | PhaseTransition::Stay => {}
            }
            self.step_physics(now);
        }
    }

    /// Draw the current pool. A no-op until the first pool exists.
    pub fn render<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        if let Some(state) = &self.state {
            render_frame(surface, state, self.dials, self.clock.now_ms());
        }
    }

    /// `update` followed by `render`.
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, dt: f32, surface: &mut S) {
        self.update(dt);
        self.render(surface);
    }

    fn apply_controls(&mut self) {
        for event in self.controls.drain() {
            match event {
                ControlEvent::SetText(text) => {
                    if text != self.text {
                        self.text = text;
                        self.rebuild_pending = true;
                    }
                }
                ControlEvent::SetDials(dials) => self.dials = dials.clamped(),
                ControlEvent::SetGenerating(generating) => self.generating = generating,
                ControlEvent::Resize(size) => {
                    self.size = size;
                    self.rebuild_pending = true;
                }
                ControlEvent::FontsReady => {
                    if !self.fonts_ready {
                        log::debug!("fonts ready");
                    }
                    self.fonts_ready = true;
                }
            }
        }
    }

    fn advance_phase(&mut self, now_ms: f64) -> Option<PhaseTransition> {
        let state = self.state.as_mut()?;
        let dna = state.dna;
        let particles = &state.particles;
        Some(state.machine.advance(now_ms, &dna, || arrived_fraction(particles)))
    }

    fn step_physics(&mut self, now_ms: f64) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let ctx = StepContext {
            phase: state.phase(),
            phase_elapsed_ms: state.machine.elapsed_ms(now_ms),
            time_secs: self.clock.seconds(),
            dials: self.dials,
            bounds: state.bounds(),
        };
        step_particles(&mut state.particles, &state.dna, &ctx);
    }

    /// Rebuild and record the outcome.
    ///
    /// Unready fonts keep the request pending silently. Without any pool every
    /// failure is retried next frame; with a pool the old one is kept and the
    /// request dropped.
    fn try_rebuild(&mut self) {
        match self.rebuild() {
            Ok(()) => {
                self.rebuild_pending = false;
                self.degraded = false;
            }
            Err(VarnaError::FontsNotReady) => {}
            Err(err) => {
                if !self.degraded {
                    log::warn!("keeping previous pool: {}", err);
                    self.degraded = true;
                }
                self.rebuild_pending = self.state.is_none();
            }
        }
    }

    /// Sample the current label, derive its DNA and overwrite the pool in place.
    pub fn rebuild(&mut self) -> Result<(), VarnaError> {
        if !self.fonts_ready {
            return Err(VarnaError::FontsNotReady);
        }
        let label = self.config.resolve_label(&self.text).to_string();
        let targets = sample_glyph(
            &mut self.rasterizer,
            &label,
            self.size,
            self.config.particle_count,
            &self.style,
            &mut self.rng,
        )?;
        let dna = derive_dna(&label);
        let now = self.clock.now_ms();
        let bounds = self.size.logical();
        let count = self.config.particle_count;

        match self.state.as_mut() {
            Some(state) => {
                rebuild_pool(&mut state.particles, count, &targets, &dna, bounds, &mut self.rng);
                state.dna = dna;
                state.size = self.size;
                state.machine.restart(now);
                state.label = label;
            }
            None => {
                self.state = Some(AnimationState {
                    particles: build_pool(count, &targets, &dna, bounds, &mut self.rng),
                    label,
                    dna,
                    machine: PhaseMachine::new(now),
                    size: self.size,
                });
            }
        }
        log::info!(
            "pool rebuilt: {} particles over {} targets, motion {}, {}x{} @{}x",
            count,
            targets.len(),
            dna.motion.name(),
            self.size.width,
            self.size.height,
            self.size.dpr,
        );
        Ok(())
    }
}
