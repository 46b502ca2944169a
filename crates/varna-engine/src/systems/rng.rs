//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic and fast; the only randomness the field uses.

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, upper_bound). Returns 0 for an empty range.
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        if upper_bound == 0 {
            return 0;
        }
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Uniform float in [0, 1), built from the top 24 bits.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform float in [lo, hi).
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Uniform float in [-width/2, width/2).
    pub fn centered(&mut self, width: f32) -> f32 {
        (self.next_f32() - 0.5) * width
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}
