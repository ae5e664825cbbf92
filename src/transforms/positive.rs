// hyperspectrs/src/transforms/positive.rs

use super::errors::TransformError;
use super::traits::{SignalTransform, Transformed};
use ndarray::ArrayView2;
use ndarray_stats::QuantileExt;

/// Shifts the whole matrix by its global minimum when that minimum is
/// negative, so that every value ends up >= 0.
///
/// A matrix containing NaN has no defined minimum and is returned unchanged.
#[derive(Clone, Debug, Default)]
pub struct PositiveShift;

impl PositiveShift {
    pub fn new() -> Self {
        Self
    }
}

impl SignalTransform for PositiveShift {
    fn name(&self) -> &'static str {
        "Positive transformation"
    }

    fn short_name(&self) -> &'static str {
        "Pos"
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        match x.min() {
            Ok(&min) if min < 0. => {
                log::trace!("Shifting matrix by global minimum {}", min);
                Ok(Transformed::new(x.mapv(|value| value - min)))
            }
            _ => Ok(Transformed::new(x.to_owned())),
        }
    }
}
