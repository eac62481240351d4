//! Injectable uniform sample sources.
//!
//! Every jitter or progress step pulls its randomness through
//! [`RandomSource`], so a feed can be replayed exactly by handing it a
//! [`SeededSource`] with a known seed, or pinned to a value with
//! [`FixedSource`].

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform samples in `[0, 1]`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// `StdRng`-backed source. Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Non-reproducible source for live feeds without a configured seed.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always yields the same sample (clamped to `[0, 1]`, NaN reads as 0.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSource(f64);

impl FixedSource {
    pub fn new(v: f64) -> Self {
        if v.is_nan() {
            return Self(0.5);
        }
        Self(v.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl RandomSource for FixedSource {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
///
/// An empty script yields 0.5, which is a zero-jitter draw.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    samples: Vec<f64>,
    pos: usize,
}

impl ScriptedSource {
    pub fn new(samples: impl Into<Vec<f64>>) -> Self {
        let samples = samples
            .into()
            .into_iter()
            .map(|v| FixedSource::new(v).value())
            .collect();
        Self { samples, pos: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let Some(v) = self.samples.get(self.pos).copied() else {
            return 0.5;
        };
        self.pos = (self.pos + 1) % self.samples.len();
        v
    }
}
