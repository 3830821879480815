// rng.rs - Uniform random source
//
// Layout, geometry and typing rhythm all draw from an `Rng`.
// The engine defaults to xorshift32; tests swap in `FixedRng`.

/// Source of uniform samples in [0, 1)
pub trait Rng {
    fn next_f32(&mut self) -> f32;

    /// Uniform sample in [min, max)
    #[inline]
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform index in 0..n
    #[inline]
    fn below(&mut self, n: usize) -> usize {
        if n == 0 { return 0; }
        ((self.next_f32() * n as f32) as usize).min(n - 1)
    }
}

impl<R: Rng + ?Sized> Rng for &mut R {
    fn next_f32(&mut self) -> f32 { (**self).next_f32() }
}

impl<R: Rng + ?Sized> Rng for Box<R> {
    fn next_f32(&mut self) -> f32 { (**self).next_f32() }
}

const DEFAULT_SEED: u32 = 0xDEADBEEF;

/// xorshift32, seedable
#[derive(Clone, Debug)]
pub struct XorShift {
    state: u32,
}

impl XorShift {
    /// Zero is not a valid xorshift state, so it maps to the default seed.
    pub fn new(seed: u32) -> Self {
        Self { state: if seed == 0 { DEFAULT_SEED } else { seed } }
    }
}

impl Default for XorShift {
    fn default() -> Self { Self::new(DEFAULT_SEED) }
}

impl Rng for XorShift {
    #[inline(always)]
    fn next_f32(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state >> 8) as f32 * (1.0 / 16777216.0)
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Clone, Debug)]
pub struct FixedRng {
    values: Vec<f32>,
    i: usize,
}

impl FixedRng {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "FixedRng needs at least one value");
        Self { values, i: 0 }
    }

    /// Always returns `v`
    pub fn constant(v: f32) -> Self { Self::new(vec![v]) }
}

impl Rng for FixedRng {
    fn next_f32(&mut self) -> f32 {
        let v = self.values[self.i % self.values.len()];
        self.i += 1;
        v.clamp(0.0, 0.999_999_9)
    }
}
