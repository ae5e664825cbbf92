// hyperspectrs/src/transforms/logarithm.rs

use super::errors::TransformError;
use super::traits::{SignalTransform, Transformed};
use ndarray::ArrayView2;

/// Absorbance style transformation `Y = -log10(X)`.
///
/// Non positive values are not rejected; they propagate as NaN or infinity.
#[derive(Clone, Debug, Default)]
pub struct LogTransform;

impl LogTransform {
    pub fn new() -> Self {
        Self
    }
}

impl SignalTransform for LogTransform {
    fn name(&self) -> &'static str {
        "Logarithmic transformation"
    }

    fn short_name(&self) -> &'static str {
        "Log"
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        Ok(Transformed::new(x.mapv(|value| -libm::log10(value))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_log() {
        let x = array![1., 10., 100.].into_dyn();
        let out = LogTransform::new().transform_dyn(x.view()).unwrap();
        let expected = array![[0., -1., -2.]];
        for (got, want) in out.data.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!(out.domain.is_none());
    }

    #[test]
    fn test_log_non_positive_propagates() {
        let x = array![[0., -1.]];
        let out = LogTransform::new().transform(x.view()).unwrap();
        assert_eq!(out.data[[0, 0]], f64::INFINITY);
        assert!(out.data[[0, 1]].is_nan());
    }
}
