// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Dataset Generation

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Lower bound (inclusive) of generated cell values.
const GENERATED_MIN: u32 = 10;
/// Upper bound (exclusive) of generated cell values.
const GENERATED_MAX: u32 = 60;

/// Fixed 8x4 demonstration dataset.
pub const SAMPLE_DATA: [[f64; 4]; 8] = [
    [10.0, 15.0, 20.0, 25.0],
    [12.0, 18.0, 22.0, 28.0],
    [14.0, 16.0, 24.0, 30.0],
    [16.0, 20.0, 26.0, 32.0],
    [18.0, 22.0, 28.0, 35.0],
    [20.0, 25.0, 30.0, 38.0],
    [22.0, 28.0, 32.0, 40.0],
    [24.0, 30.0, 35.0, 42.0],
];

pub fn sample_data() -> Vec<Vec<f64>> {
    SAMPLE_DATA.iter().map(|row| row.to_vec()).collect()
}

/// Seedable source of random integer cell values.
#[derive(Debug, Clone)]
pub struct CellGenerator {
    rng: ChaCha8Rng,
}

impl CellGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Next integer value in `[10, 60)`.
    pub fn next_value(&mut self) -> f64 {
        self.rng.gen_range(GENERATED_MIN..GENERATED_MAX) as f64
    }
}
