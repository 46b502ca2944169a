pub mod dna;
pub mod phase;
pub mod state;
pub mod time;
