//! Held-out sampling
//!
//! Uniform sampling without replacement, driven by a ChaCha8 RNG so a seed
//! reproduces the same rows on every platform.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Use the given seed, or draw a fresh one (log it so the run can be replayed)
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            log::info!("No sampling seed given, using {}", seed);
            seed
        }
    }
}

/// Row indices to score: all rows when `total <= cap`, else `cap` distinct
/// indices in sampled order
pub fn sample_indices(total: usize, cap: usize, seed: u64) -> Vec<usize> {
    if total <= cap {
        return (0..total).collect();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    index::sample(&mut rng, total, cap).into_vec()
}

/// Move the selected items out of `items`, in index order given
pub fn take_sample<T>(items: Vec<T>, indices: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    indices
        .iter()
        .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
        .collect()
}
