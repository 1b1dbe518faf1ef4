//! Uniform sampling of the recommended-careers list for display.

use rand::seq::IndexedRandom;
use rand::Rng;

/// At most this many careers appear on a report.
pub const MAX_SAMPLED_CAREERS: usize = 10;

/// Draw `min(10, len)` careers uniformly without replacement.
///
/// The rng is injected so production can pass `rand::rng()` while tests and
/// the CLI seed a `StdRng` for exact, reproducible output.
pub fn sample_careers<R: Rng + ?Sized>(careers: &[String], rng: &mut R) -> Vec<String> {
    let amount = MAX_SAMPLED_CAREERS.min(careers.len());
    careers.choose_multiple(rng, amount).cloned().collect()
}
