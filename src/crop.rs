// hyperspectrs/src/crop.rs

use crate::spectral::{Spectral, SpectralCube, SpectralError};
use ndarray::{Array, Array2, ArrayBase, ArrayView2, Axis, Data, Dimension, Slice};
use thiserror::Error;

/// Rectangular region `x_mask.0..x_mask.1` by `y_mask.0..y_mask.1` of a
/// `shape` spatial grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RectangleMask {
    shape: (usize, usize),
    x_mask: (usize, usize),
    y_mask: (usize, usize),
}

impl RectangleMask {
    pub fn new(
        shape: (usize, usize),
        x_mask: (usize, usize),
        y_mask: (usize, usize),
    ) -> Result<Self, CropError> {
        Self::validate_range(x_mask, shape.0)?;
        Self::validate_range(y_mask, shape.1)?;
        Ok(Self {
            shape,
            x_mask,
            y_mask,
        })
    }

    fn validate_range(range: (usize, usize), len: usize) -> Result<(), CropError> {
        if range.0 > range.1 || range.1 > len {
            return Err(CropError::InvalidRange(range.0, range.1, len));
        }
        Ok(())
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn x_mask(&self) -> (usize, usize) {
        self.x_mask
    }

    pub fn y_mask(&self) -> (usize, usize) {
        self.y_mask
    }

    pub fn get_binary_mask(&self) -> Array2<bool> {
        let (x0, x1) = self.x_mask;
        let (y0, y1) = self.y_mask;
        Array2::from_shape_fn(self.shape, |(x, y)| {
            (x0..x1).contains(&x) && (y0..y1).contains(&y)
        })
    }

    /// Crops the first two axes of a 2D image or a 3D cube.
    pub fn apply<A, S, D>(&self, array: &ArrayBase<S, D>) -> Result<Array<A, D>, CropError>
    where
        A: Clone,
        S: Data<Elem = A>,
        D: Dimension,
    {
        if array.ndim() != 2 && array.ndim() != 3 {
            return Err(CropError::DimensionError(array.ndim()));
        }
        let spatial = (array.shape()[0], array.shape()[1]);
        if spatial != self.shape {
            return Err(CropError::ShapeMismatch {
                expected: self.shape,
                got: spatial,
            });
        }
        let rows = array.slice_axis(Axis(0), Slice::from(self.x_mask.0..self.x_mask.1));
        Ok(rows
            .slice_axis(Axis(1), Slice::from(self.y_mask.0..self.y_mask.1))
            .to_owned())
    }

    pub fn crop(&self, cube: &SpectralCube) -> Result<SpectralCube, CropError> {
        let data = self.apply(cube.data())?;
        Ok(SpectralCube::new(data, cube.domain().clone())?)
    }
}

/// Smallest rectangle containing every `true` cell of `mask`.
pub fn get_max_rectangle_mask(mask: ArrayView2<bool>) -> Result<RectangleMask, CropError> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for ((x, y), _) in mask.indexed_iter().filter(|(_, inside)| **inside) {
        bounds = Some(match bounds {
            None => (x, x, y, y),
            Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        });
    }
    let (x0, x1, y0, y1) = bounds.ok_or(CropError::EmptyMask)?;
    RectangleMask::new(mask.dim(), (x0, x1 + 1), (y0, y1 + 1))
}

#[derive(Error, Debug)]
pub enum CropError {
    #[error("Range {0}..{1} does not fit in an axis of length {2}")]
    InvalidRange(usize, usize, usize),
    #[error("Expected data with 2 or 3 dimensions but received {0} instead.")]
    DimensionError(usize),
    #[error("Mask of shape {expected:?} cannot be applied to data of spatial shape {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("Mask does not contain any selected cell")]
    EmptyMask,
    #[error(transparent)]
    SpectralError(#[from] SpectralError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array, Array3};

    #[test]
    fn test_binary_mask() {
        let mask = RectangleMask::new((3, 4), (1, 3), (0, 2)).unwrap();
        assert_eq!(
            mask.get_binary_mask(),
            array![
                [false, false, false, false],
                [true, true, false, false],
                [true, true, false, false]
            ]
        );
    }

    #[test]
    fn test_apply_2d_and_3d() {
        let mask = RectangleMask::new((3, 4), (1, 3), (2, 4)).unwrap();
        let image = Array::range(0., 12., 1.).into_shape((3, 4)).unwrap();
        assert_eq!(mask.apply(&image).unwrap(), array![[6., 7.], [10., 11.]]);

        let cube = Array::range(0., 60., 1.).into_shape((3, 4, 5)).unwrap();
        let cropped = mask.apply(&cube).unwrap();
        assert_eq!(cropped.dim(), (2, 2, 5));
        assert_eq!(cropped[[0, 0, 0]], 30.);
        assert_eq!(cropped[[1, 1, 4]], 59.);

        let empty = RectangleMask::new((3, 4), (1, 1), (0, 4)).unwrap();
        assert_eq!(empty.apply(&Array3::<f64>::zeros((3, 4, 5))).unwrap().dim(), (0, 4, 5));
    }

    #[test]
    fn test_apply_errors() {
        let mask = RectangleMask::new((3, 4), (1, 3), (2, 4)).unwrap();
        let wrong = Array2::<f64>::zeros((4, 4));
        assert!(matches!(
            mask.apply(&wrong).unwrap_err(),
            CropError::ShapeMismatch { .. }
        ));
        let flat = Array::<f64, _>::zeros(3);
        assert!(matches!(
            mask.apply(&flat).unwrap_err(),
            CropError::DimensionError(1)
        ));
        assert!(matches!(
            RectangleMask::new((3, 4), (2, 5), (0, 1)).unwrap_err(),
            CropError::InvalidRange(2, 5, 3)
        ));
    }

    #[test]
    fn test_max_rectangle_mask() {
        let mask = array![
            [false, false, false, false],
            [false, true, false, false],
            [false, false, false, true],
            [false, false, false, false]
        ];
        let rectangle = get_max_rectangle_mask(mask.view()).unwrap();
        assert_eq!(rectangle.x_mask(), (1, 3));
        assert_eq!(rectangle.y_mask(), (1, 4));

        let empty = Array2::from_elem((2, 2), false);
        assert!(matches!(
            get_max_rectangle_mask(empty.view()).unwrap_err(),
            CropError::EmptyMask
        ));
    }

    #[test]
    fn test_crop_cube() {
        let data = Array::range(0., 24., 1.).into_shape((2, 3, 4)).unwrap();
        let cube = SpectralCube::new(data, array![1., 2., 3., 4.]).unwrap();
        let mask = RectangleMask::new((2, 3), (1, 2), (1, 3)).unwrap();
        let cropped = mask.crop(&cube).unwrap();
        assert_eq!(cropped.shape(), (1, 2, 4));
        assert_eq!(cropped.data()[[0, 0, 0]], 16.);
        assert_eq!(cropped.domain(), cube.domain());
    }
}
