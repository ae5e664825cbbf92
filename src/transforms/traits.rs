// hyperspectrs/src/transforms/traits.rs

use super::errors::TransformError;
use ndarray::{Array1, Array2, ArrayView2, ArrayViewD, Axis, Ix2};

/// Output of a transform: the processed matrix and, when the transform
/// changes the column layout, the domain labelling the new columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Transformed {
    pub data: Array2<f64>,
    pub domain: Option<Array1<f64>>,
}

impl Transformed {
    pub fn new(data: Array2<f64>) -> Self {
        Self { data, domain: None }
    }

    pub fn with_domain(data: Array2<f64>, domain: Array1<f64>) -> Self {
        Self {
            data,
            domain: Some(domain),
        }
    }
}

/// Row-wise operator over a matrix of spectra (rows are signals, columns are
/// domain samples).
pub trait SignalTransform {
    fn name(&self) -> &'static str;

    fn short_name(&self) -> &'static str;

    /// Learns whatever state `transform` needs. Most transforms are stateless.
    fn fit(
        &mut self,
        _x: ArrayView2<f64>,
        _reference: Option<ArrayView2<f64>>,
    ) -> Result<&mut Self, TransformError> {
        Ok(self)
    }

    fn transform(&self, x: ArrayView2<f64>) -> Result<Transformed, TransformError>;

    fn fit_transform(
        &mut self,
        x: ArrayView2<f64>,
        reference: Option<ArrayView2<f64>>,
    ) -> Result<Transformed, TransformError> {
        self.fit(x, reference)?;
        self.transform(x)
    }

    /// Same as [`SignalTransform::transform`] for input of any rank; a single
    /// spectrum is handled as a one row matrix.
    fn transform_dyn(&self, x: ArrayViewD<f64>) -> Result<Transformed, TransformError> {
        let x = resize_x(x)?;
        self.transform(x)
    }
}

/// Coerces a 1D or 2D array into a 2D matrix; a 1D array becomes one row.
pub fn resize_x(x: ArrayViewD<f64>) -> Result<ArrayView2<f64>, TransformError> {
    match x.ndim() {
        1 => Ok(x
            .insert_axis(Axis(0))
            .into_dimensionality::<Ix2>()
            .map_err(|_| TransformError::DimensionError(1))?),
        2 => Ok(x
            .into_dimensionality::<Ix2>()
            .map_err(|_| TransformError::DimensionError(2))?),
        ndim => Err(TransformError::DimensionError(ndim)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, ArrayD, IxDyn};

    #[test]
    fn test_resize_x_1d() {
        let x = array![0., 1., 2., 3.].into_dyn();
        let resized = resize_x(x.view()).unwrap();
        assert_eq!(resized, array![[0., 1., 2., 3.]]);
    }

    #[test]
    fn test_resize_x_2d() {
        let x = array![[0., 1.], [2., 3.]].into_dyn();
        let resized = resize_x(x.view()).unwrap();
        assert_eq!(resized, array![[0., 1.], [2., 3.]]);
    }

    #[test]
    fn test_resize_x_fail() {
        let x = ArrayD::<f64>::zeros(IxDyn(&[2, 3, 1]));
        let err = resize_x(x.view()).unwrap_err();
        assert!(matches!(err, TransformError::DimensionError(3)));
    }
}
