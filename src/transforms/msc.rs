// hyperspectrs/src/transforms/msc.rs

use super::errors::TransformError;
use super::traits::{SignalTransform, Transformed};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use rayon::prelude::*;

/// Multiplicative Scatter Correction.
///
/// Each row is regressed against a reference spectrum, `x_i = a_i + b_i * r`,
/// and corrected as `(x_i - a_i) / b_i`. The reference is either given
/// explicitly with shape `(1, ncols)` or taken as the column mean of the
/// fitted matrix.
#[derive(Clone, Debug, Default)]
pub struct MultiplicativeScatterCorrection {
    explicit_reference: Option<Array2<f64>>,
    reference: Option<Array1<f64>>,
}

impl MultiplicativeScatterCorrection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `reference` whenever `fit` is called without one.
    pub fn with_reference(reference: Array2<f64>) -> Self {
        Self {
            explicit_reference: Some(reference),
            reference: None,
        }
    }

    /// Reference spectrum learned by the last call to `fit`.
    pub fn reference(&self) -> Option<&Array1<f64>> {
        self.reference.as_ref()
    }

    fn validate_reference_shape(
        reference: &ArrayView2<f64>,
        ncols: usize,
    ) -> Result<(), TransformError> {
        if reference.dim() != (1, ncols) {
            return Err(TransformError::ReferenceShapeMismatch {
                expected: ncols,
                got: reference.shape().to_vec(),
            });
        }
        Ok(())
    }
}

/// Least squares line through `(reference, signal)`, returned as
/// `(intercept, slope)`.
fn fit_line(reference: ArrayView1<f64>, signal: ArrayView1<f64>) -> (f64, f64) {
    let n = reference.len() as f64;
    let reference_mean = reference.sum() / n;
    let signal_mean = signal.sum() / n;
    let (covariance, variance) = Zip::from(&reference).and(&signal).fold(
        (0., 0.),
        |(cov, var), &r, &s| {
            let dr = r - reference_mean;
            (cov + dr * (s - signal_mean), var + dr * dr)
        },
    );
    let slope = covariance / variance;
    (signal_mean - slope * reference_mean, slope)
}

impl SignalTransform for MultiplicativeScatterCorrection {
    fn name(&self) -> &'static str {
        "Multiplicative Scatter Correction"
    }

    fn short_name(&self) -> &'static str {
        "MSC"
    }

    fn fit(
        &mut self,
        x: ArrayView2<f64>,
        reference: Option<ArrayView2<f64>>,
    ) -> Result<&mut Self, TransformError> {
        let reference = reference
            .map(|reference| reference.to_owned())
            .or_else(|| self.explicit_reference.clone());
        let reference = match reference {
            Some(reference) => {
                Self::validate_reference_shape(&reference.view(), x.ncols())?;
                reference.row(0).to_owned()
            }
            None => {
                if x.nrows() < 2 {
                    return Err(TransformError::MissingReference);
                }
                x.mean_axis(Axis(0))
                    .ok_or(TransformError::MissingReference)?
            }
        };
        self.reference = Some(reference);
        Ok(self)
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        let reference = self
            .reference
            .as_ref()
            .ok_or(TransformError::NotFitted("Multiplicative Scatter Correction"))?;
        if x.ncols() != reference.len() {
            return Err(TransformError::ColumnMismatch {
                expected: reference.len(),
                got: x.ncols(),
            });
        }
        let coefficients: Vec<(f64, f64)> = (0..x.nrows())
            .into_par_iter()
            .map(|i| fit_line(reference.view(), x.row(i)))
            .collect();
        let mut out = x.to_owned();
        for (mut row, (intercept, slope)) in out.rows_mut().into_iter().zip(coefficients) {
            log::trace!("MSC row: a={}, b={}", intercept, slope);
            row.mapv_inplace(|value| (value - intercept) / slope);
        }
        Ok(Transformed::new(out))
    }
}
