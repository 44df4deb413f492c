//! `ndarray` views of encoded samples for the evaluator's batch input.

use ndarray::{Array1, Array2, Array3, ArrayView2};

use super::encoding::{empty_feature, Feature, Policy, FEATURE_COUNT, NUM_ROWS};
use crate::board::MOVE_SPACE_SIZE;

/// Converts a feature tensor into a [21, 23] array.
pub fn feature_to_array(feature: &Feature) -> Array2<f32> {
    Array2::from_shape_fn((NUM_ROWS, FEATURE_COUNT), |(r, c)| feature[r][c])
}

/// Reads a [21, 23] array back into a feature tensor. Returns `None` on a
/// shape mismatch.
pub fn feature_from_array(array: ArrayView2<f32>) -> Option<Feature> {
    if array.dim() != (NUM_ROWS, FEATURE_COUNT) {
        return None;
    }
    let mut feature = empty_feature();
    for ((r, c), &v) in array.indexed_iter() {
        feature[r][c] = v;
    }
    Some(feature)
}

pub fn policy_to_array(policy: &Policy) -> Array1<f32> {
    Array1::from(policy.to_vec())
}

/// Stacks features into a [batch, 21, 23] array.
pub fn stack_features(features: &[Feature]) -> Array3<f32> {
    Array3::from_shape_fn((features.len(), NUM_ROWS, FEATURE_COUNT), |(i, r, c)| {
        features[i][r][c]
    })
}

/// Stacks policies into a [batch, 41] array.
pub fn stack_policies(policies: &[Policy]) -> Array2<f32> {
    Array2::from_shape_fn((policies.len(), MOVE_SPACE_SIZE), |(i, s)| policies[i][s])
}
