// hyperspectrs/src/transforms/snv.rs

use super::errors::TransformError;
use super::traits::{SignalTransform, Transformed};
use ndarray::{ArrayView2, Zip};

/// Standard Normal Variate: every row is centred on its mean and divided by
/// its population standard deviation. A constant row yields NaN.
#[derive(Clone, Debug, Default)]
pub struct StandardNormalVariate;

impl StandardNormalVariate {
    pub fn new() -> Self {
        Self
    }
}

impl SignalTransform for StandardNormalVariate {
    fn name(&self) -> &'static str {
        "Standard Normal Variate"
    }

    fn short_name(&self) -> &'static str {
        "SNV"
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        let mut out = x.to_owned();
        Zip::from(out.rows_mut()).par_for_each(|mut row| {
            let n = row.len() as f64;
            let mean = row.sum() / n;
            let variance = row.fold(0., |acc, &value| acc + (value - mean).powi(2)) / n;
            let std = libm::sqrt(variance);
            row.mapv_inplace(|value| (value - mean) / std);
        });
        Ok(Transformed::new(out))
    }
}
