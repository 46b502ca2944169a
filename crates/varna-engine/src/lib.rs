pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod driver;

// Re-export key types at crate root for convenience
pub use api::config::FieldConfig;
pub use api::error::VarnaError;
pub use api::types::{Dials, SurfaceSize};
pub use crate::core::dna::{derive_dna, hash_label, MotionModel, WordDNA, DEFAULT_LABEL};
pub use crate::core::phase::{Phase, PhaseMachine, PhaseTransition};
pub use crate::core::state::AnimationState;
pub use crate::core::time::FixedTimestep;
pub use driver::AnimationDriver;
pub use input::queue::{ControlEvent, ControlQueue};
pub use renderer::color::{Hsla, Rgba};
pub use renderer::pixel::PixelSurface;
pub use renderer::traits::{BlendMode, DrawSurface, PixelBuffer};
pub use systems::pool::{build_pool, Particle};
pub use systems::render::render_frame;
pub use systems::rng::Rng;
pub use systems::sampler::{sample_glyph, sample_points, AlphaMask, GlyphRasterizer, GlyphStyle};

#[cfg(feature = "png")]
pub use renderer::export::export_png;
