use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: Option<u64>,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform draw from `0..=max`.
    pub fn up_to(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..=max)
    }

    /// Fisher–Yates over a copy of `items`: walk from the last index down to 1,
    /// swapping each position with a uniform pick from `0..=i`.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.up_to(i);
            out.swap(i, j);
        }
        out
    }
}
