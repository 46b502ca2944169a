//! Deterministic per-label parameter bundle ("DNA").
//!
//! The label is hashed to a 32-bit seed, the seed is widened to 64 bits with a
//! splitmix64 finalizer, and each coefficient reads its own byte of that word.
//! Same label, same DNA, on every platform.

/// Label rendered when the host supplies no text.
pub const DEFAULT_LABEL: &str = "ওক্ষর";

/// Inclusive coefficient intervals, one byte of the widened seed each.
pub const VORTEX_STRENGTH: (f32, f32) = (0.3, 1.0);
pub const LATTICE_RIGIDITY: (f32, f32) = (0.04, 0.16);
pub const FLOW_FREQUENCY: (f32, f32) = (0.0008, 0.003);
pub const LIFESPAN: (f32, f32) = (0.84, 0.96);
pub const HUE_BASE: (f32, f32) = (0.0, 360.0);
pub const HUE_SPREAD: (f32, f32) = (25.0, 120.0);
pub const ASSEMBLY_SPEED: (f32, f32) = (0.12, 0.30);
pub const DISSOLVE_DELAY_MS: (f32, f32) = (3500.0, 7500.0);

/// Idle behaviour a pool adopts once it has assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionModel {
    /// Tangential swirl around each target.
    Orbital,
    /// Stiff spring to the target with a sinusoidal shiver.
    Lattice,
    /// Drift through a time-varying flow field, loosely tethered.
    Flow,
}

impl MotionModel {
    pub const ALL: [MotionModel; 3] = [Self::Orbital, Self::Lattice, Self::Flow];

    /// Stable selector: fold the high half into the low half, then mod 3.
    pub fn from_seed(seed: u32) -> Self {
        Self::ALL[((seed ^ (seed >> 16)) % 3) as usize]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Orbital => "orbital",
            Self::Lattice => "lattice",
            Self::Flow => "flow",
        }
    }
}

/// Parameters derived once per distinct label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordDNA {
    pub seed: u32,
    pub motion: MotionModel,
    pub vortex_strength: f32,
    pub lattice_rigidity: f32,
    pub flow_frequency: f32,
    /// Trail persistence; the per-frame fade is `1 - lifespan`.
    pub lifespan: f32,
    pub hue_base: f32,
    pub hue_spread: f32,
    pub assembly_speed: f32,
    /// Time spent in Alive before dissolving.
    pub dissolve_delay_ms: f32,
}

/// djb2-xor over UTF-16 code units, wrapping in 32 bits.
pub fn hash_label(text: &str) -> u32 {
    text.encode_utf16()
        .fold(5381u32, |h, unit| h.wrapping_mul(33) ^ unit as u32)
}

/// Widen a 32-bit seed so eight coefficients can each own a full byte.
fn widen(seed: u32) -> u64 {
    let mut z = (seed as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Map byte `lane` of `bits` linearly onto `range`.
fn lane(bits: u64, lane: u32, range: (f32, f32)) -> f32 {
    let t = ((bits >> (lane * 8)) & 0xff) as f32 / 255.0;
    (range.0 + t * (range.1 - range.0)).clamp(range.0, range.1)
}

/// Derive the DNA for `text`. Empty input uses [`DEFAULT_LABEL`].
pub fn derive_dna(text: &str) -> WordDNA {
    let label = if text.is_empty() { DEFAULT_LABEL } else { text };
    let seed = hash_label(label);
    let bits = widen(seed);
    WordDNA {
        seed,
        motion: MotionModel::from_seed(seed),
        vortex_strength: lane(bits, 0, VORTEX_STRENGTH),
        lattice_rigidity: lane(bits, 1, LATTICE_RIGIDITY),
        flow_frequency: lane(bits, 2, FLOW_FREQUENCY),
        lifespan: lane(bits, 3, LIFESPAN),
        hue_base: lane(bits, 4, HUE_BASE),
        hue_spread: lane(bits, 5, HUE_SPREAD),
        assembly_speed: lane(bits, 6, ASSEMBLY_SPEED),
        dissolve_delay_ms: lane(bits, 7, DISSOLVE_DELAY_MS),
    }
}
