//! Lane permutations.

#[allow(clippy::module_inception)]
mod shuffle;

pub use shuffle::Shuffle;
