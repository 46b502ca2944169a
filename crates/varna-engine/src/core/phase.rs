//! Lifecycle of a particle pool: Assembling → Alive → Dissolving → (rebuild).

use crate::core::dna::WordDNA;

/// Squared distance (logical px²) under which a particle counts as arrived.
pub const CLOSE_DISTANCE_SQ: f32 = 20.0;
/// Fraction of arrived particles that ends assembly early.
pub const ASSEMBLED_FRACTION: f32 = 0.8;
/// Assembly always ends after this long, reachable targets or not.
pub const ASSEMBLE_TIMEOUT_MS: f64 = 3500.0;
/// Length of the dissolve window; opacity ramps to zero across it.
pub const DISSOLVE_DURATION_MS: f64 = 4000.0;
/// Opening slice of the dissolve window that pushes particles outward.
pub const DISSOLVE_BURST_MS: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Assembling,
    Alive,
    Dissolving,
}

impl Phase {
    /// The phase that follows this one. Dissolving wraps to a fresh Assembling pool.
    pub fn next(self) -> Phase {
        match self {
            Self::Assembling => Self::Alive,
            Self::Alive => Self::Dissolving,
            Self::Dissolving => Self::Assembling,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Assembling => "assembling",
            Self::Alive => "alive",
            Self::Dissolving => "dissolving",
        }
    }
}

/// Outcome of evaluating the machine at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTransition {
    /// Nothing changed.
    Stay,
    /// The machine moved into this phase.
    Entered(Phase),
    /// The dissolve window is over; the owner must rebuild the pool and `restart`.
    Expired,
}

/// Current phase plus the simulated time it began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseMachine {
    phase: Phase,
    started_at_ms: f64,
}

impl PhaseMachine {
    /// A fresh machine, born Assembling at `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            phase: Phase::Assembling,
            started_at_ms: now_ms,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started_at_ms(&self) -> f64 {
        self.started_at_ms
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.started_at_ms).max(0.0)
    }

    /// Back to Assembling, e.g. after a rebuild or a text change.
    pub fn restart(&mut self, now_ms: f64) {
        *self = Self::new(now_ms);
    }

    /// Opacity multiplier: ramps 1 → 0 across the dissolve window, 1 otherwise.
    pub fn fade(&self, now_ms: f64) -> f32 {
        match self.phase {
            Phase::Dissolving => {
                (1.0 - self.elapsed_ms(now_ms) / DISSOLVE_DURATION_MS).clamp(0.0, 1.0) as f32
            }
            _ => 1.0,
        }
    }

    /// Evaluate transitions at `now_ms`.
    ///
    /// `arrived_fraction` is only called while Assembling, and only once the
    /// timeout has not already decided the outcome.
    pub fn advance(
        &mut self,
        now_ms: f64,
        dna: &WordDNA,
        arrived_fraction: impl FnOnce() -> f32,
    ) -> PhaseTransition {
        let elapsed = self.elapsed_ms(now_ms);
        let done = match self.phase {
            Phase::Assembling => {
                elapsed >= ASSEMBLE_TIMEOUT_MS || arrived_fraction() >= ASSEMBLED_FRACTION
            }
            Phase::Alive => elapsed >= dna.dissolve_delay_ms as f64,
            Phase::Dissolving => {
                return if elapsed >= DISSOLVE_DURATION_MS {
                    PhaseTransition::Expired
                } else {
                    PhaseTransition::Stay
                };
            }
        };
        if !done {
            return PhaseTransition::Stay;
        }
        self.phase = self.phase.next();
        self.started_at_ms = now_ms;
        PhaseTransition::Entered(self.phase)
    }
}
