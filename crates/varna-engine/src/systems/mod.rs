pub mod flow;
pub mod physics;
pub mod pool;
pub mod render;
pub mod rng;
pub mod sampler;
