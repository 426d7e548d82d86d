use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::domain::DomainError;

pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Pick `amount` distinct positions out of `population` with a fixed seed.
///
/// The same (seed, population, amount) always yields the same positions in
/// the same order. Asking for more than the population is an error, never a
/// truncated sample.
pub fn sample_positions(seed: u64, population: usize, amount: usize) -> Result<Vec<usize>, DomainError> {
    if amount > population {
        return Err(DomainError::internal(format!(
            "cannot take a larger sample than population: requested {} out of {} customers",
            amount, population
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Ok(index::sample(&mut rng, population, amount).into_vec())
}
