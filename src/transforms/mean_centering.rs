// hyperspectrs/src/transforms/mean_centering.rs

use super::errors::TransformError;
use super::traits::{SignalTransform, Transformed};
use ndarray::{ArrayView2, Zip};

/// Removes the mean of every row.
#[derive(Clone, Debug, Default)]
pub struct MeanCentering;

impl MeanCentering {
    pub fn new() -> Self {
        Self
    }
}

impl SignalTransform for MeanCentering {
    fn name(&self) -> &'static str {
        "Mean centering"
    }

    fn short_name(&self) -> &'static str {
        "MC"
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        let mut out = x.to_owned();
        Zip::from(out.rows_mut()).par_for_each(|mut row| {
            let mean = row.sum() / row.len() as f64;
            row.mapv_inplace(|value| value - mean);
        });
        Ok(Transformed::new(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mean_centering_row() {
        let x = array![1., 2.].into_dyn();
        let out = MeanCentering::new().transform_dyn(x.view()).unwrap();
        assert_eq!(out.data, array![[-0.5, 0.5]]);
    }

    #[test]
    fn test_mean_centering_rows_have_zero_mean() {
        let x = array![[1., 2., 7.5], [3., -4., 0.25], [1e3, 2e3, 4e3]];
        let out = MeanCentering::new().transform(x.view()).unwrap();
        for row in out.data.rows() {
            assert!(row.sum().abs() / (row.len() as f64) < 1e-9);
        }
    }
}
