use std::cell::RefCell;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::network::network::Network;

impl Network {
    /// Fills every weight and bias with draws from `U[low, high)` using a
    /// `StdRng` seeded with `seed`. The same seed reproduces the same network.
    pub fn initialize_uniform(&mut self, seed: u64, low: f64, high: f64) {
        let rng = RefCell::new(StdRng::seed_from_u64(seed));
        self.initialize_weights(
            |_, _, _| rng.borrow_mut().gen_range(low..high),
            |_, _| rng.borrow_mut().gen_range(low..high),
        );
    }
}
