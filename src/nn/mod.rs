//! Learned-evaluator data layer.
//!
//! Converts `GameState` into the [21, 23] tensor consumed by the policy and
//! value networks, and derives augmented samples from the board's
//! symmetries.

#[cfg(feature = "ndarray")]
pub mod array;
pub mod encoding;
pub mod symmetry;

pub use encoding::{decode, encode, try_decode, Feature, Policy, FEATURE_COUNT};
pub use symmetry::{apply_to_state, apply_transform, move_permutation, random_augment, Transform};
