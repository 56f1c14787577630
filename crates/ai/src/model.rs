//! Trained model representation and the forward pass.

use ndarray::{Array1, Array2};

use crate::error::InferenceError;
use crate::features::FeatureVector;

/// Input width of the network (one per feature vector component).
pub const INPUT_FEATURES: usize = 3;

/// Width of the single hidden layer.
pub const HIDDEN_UNITS: usize = 8;

/// A trained reorder classifier: 3 inputs → 8 ReLU units → 1 sigmoid output.
///
/// Only constructed by [`crate::Classifier::train`]; holding one is proof a
/// training pass completed. Weights are immutable after training: a retrain
/// produces a whole new model value, it never mutates an existing one.
///
/// Inputs are consumed raw, with no scaling or normalization. That bounds
/// the model's accuracy and is kept on purpose.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderModel {
    pub(crate) w1: Array2<f64>, // (INPUT_FEATURES, HIDDEN_UNITS)
    pub(crate) b1: Array1<f64>, // (HIDDEN_UNITS)
    pub(crate) w2: Array2<f64>, // (HIDDEN_UNITS, 1)
    pub(crate) b2: Array1<f64>, // (1)
}

impl ReorderModel {
    /// Sigmoid probability in [0, 1] that the item needs reordering.
    ///
    /// Per-call buffers are owned by this frame and dropped on every exit
    /// path, including the error one.
    pub fn score(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        if !features.is_finite() {
            return Err(InferenceError::NonFiniteFeature(format!("{features:?}")));
        }

        let x = Array1::from(features.as_array().to_vec());
        let z1 = x.dot(&self.w1) + &self.b1;
        let a1 = z1.mapv(relu);
        let z2 = a1.dot(&self.w2) + &self.b2;

        Ok(sigmoid(z2[0]))
    }
}

pub(crate) fn relu(x: f64) -> f64 {
    x.max(0.0)
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
