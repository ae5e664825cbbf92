// hyperspectrs/src/transforms/savitzky_golay.rs

use super::errors::TransformError;
use super::traits::{SignalTransform, Transformed};
use super::utils::{mirror_pad, savitzky_golay_coefficients};
use ndarray::{s, Array1, Array2, ArrayView2, Zip};

pub const DEFAULT_WINDOW_SIZE: usize = 7;
pub const DEFAULT_POLYNOMIAL_ORDER: usize = 2;
pub const DEFAULT_DERIVATION_ORDER: usize = 1;

/// Row-wise Savitzky-Golay smoothing and derivative filter.
///
/// Rows are padded with mirrored samples before a "valid" convolution, so the
/// output keeps the input column count.
#[derive(Clone, Debug)]
pub struct SavitzkyGolayFilter {
    window_size: usize,
    polynomial_order: usize,
    derivation_order: usize,
    kernel: Array1<f64>,
}

impl SavitzkyGolayFilter {
    pub fn new(
        window_size: usize,
        polynomial_order: usize,
        derivation_order: usize,
    ) -> Result<Self, TransformError> {
        Self::validate_window_size(window_size, polynomial_order)?;
        Self::validate_derivation_order(derivation_order, polynomial_order)?;
        let kernel =
            savitzky_golay_coefficients(window_size, polynomial_order, derivation_order)?;
        log::debug!(
            "Savitzky-Golay kernel (window={}, order={}, deriv={}): {}",
            window_size,
            polynomial_order,
            derivation_order,
            kernel
        );
        Ok(Self {
            window_size,
            polynomial_order,
            derivation_order,
            kernel,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn polynomial_order(&self) -> usize {
        self.polynomial_order
    }

    pub fn derivation_order(&self) -> usize {
        self.derivation_order
    }

    pub fn kernel(&self) -> &Array1<f64> {
        &self.kernel
    }

    fn validate_window_size(
        window_size: usize,
        polynomial_order: usize,
    ) -> Result<(), TransformError> {
        if window_size % 2 == 0 {
            return Err(TransformError::EvenWindowSize(window_size));
        }
        if window_size < polynomial_order + 1 {
            return Err(TransformError::WindowTooSmall(
                window_size,
                polynomial_order + 1,
            ));
        }
        Ok(())
    }

    fn validate_derivation_order(
        derivation_order: usize,
        polynomial_order: usize,
    ) -> Result<(), TransformError> {
        if derivation_order > polynomial_order {
            return Err(TransformError::DerivationOrderTooHigh(
                derivation_order,
                polynomial_order,
            ));
        }
        Ok(())
    }
}

impl SignalTransform for SavitzkyGolayFilter {
    fn name(&self) -> &'static str {
        "Savitzky Golay filter"
    }

    fn short_name(&self) -> &'static str {
        "SG"
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError> {
        let half = (self.window_size - 1) / 2;
        let padded = mirror_pad(x, half)?;
        // convolution flips the kernel
        let flipped: Array1<f64> = self.kernel.iter().rev().cloned().collect();
        let window = self.window_size;
        let mut out = Array2::<f64>::zeros(x.dim());
        Zip::from(out.rows_mut())
            .and(padded.rows())
            .par_for_each(|mut out_row, padded_row| {
                for (i, value) in out_row.iter_mut().enumerate() {
                    *value = padded_row.slice(s![i..i + window]).dot(&flipped);
                }
            });
        Ok(Transformed::new(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_boxcar_on_ramp() {
        let sg = SavitzkyGolayFilter::new(3, 0, 0).unwrap();
        for (got, want) in sg.kernel().iter().zip([1. / 3.; 3].iter()) {
            assert!((got - want).abs() < 1e-12);
        }
        let x = array![[1., 2., 3., 4., 5.], [1., 2., 3., 4., 5.]];
        let out = sg.transform(x.view()).unwrap();
        assert_eq!(out.data.dim(), (2, 5));
        for (got, want) in out.data.iter().zip(x.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_derivative_of_ramp_is_constant() {
        let sg = SavitzkyGolayFilter::new(5, 2, 1).unwrap();
        let x = array![[1., 2., 3., 4., 5., 6., 7.]];
        let out = sg.transform(x.view()).unwrap();
        // true convolution reverses the derivative kernel, hence the sign
        for value in out.data.iter() {
            assert!((value + 1.).abs() < 1e-12);
        }
    }

    #[test]
    fn test_quadratic_smoothing_preserves_parabola() {
        let sg = SavitzkyGolayFilter::new(5, 2, 0).unwrap();
        let x = Array2::from_shape_fn((1, 9), |(_, j)| (j as f64).powi(2));
        let out = sg.transform(x.view()).unwrap();
        // away from the padded edges the fit is exact
        for j in 2..7 {
            assert!((out.data[[0, j]] - x[[0, j]]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_configurations() {
        let err = SavitzkyGolayFilter::new(4, 2, 1).unwrap_err();
        assert!(matches!(err, TransformError::EvenWindowSize(4)));
        assert!(err.is_configuration_error());
        let err = SavitzkyGolayFilter::new(3, 3, 1).unwrap_err();
        assert!(matches!(err, TransformError::WindowTooSmall(3, 4)));
        let err = SavitzkyGolayFilter::new(7, 2, 3).unwrap_err();
        assert!(matches!(err, TransformError::DerivationOrderTooHigh(3, 2)));
    }

    #[test]
    fn test_short_signal() {
        let sg = SavitzkyGolayFilter::new(7, 2, 1).unwrap();
        let err = sg.transform(array![[1., 2., 3.]].view()).unwrap_err();
        assert!(matches!(err, TransformError::SignalTooShort(3, 7)));
    }
}
