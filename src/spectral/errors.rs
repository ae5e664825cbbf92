// hyperspectrs/src/spectral/errors.rs

use ndarray::ShapeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectralError {
    #[error("Expected data with {expected} dimensions but received {got} instead.")]
    DimensionError { got: usize, expected: usize },
    #[error("Wrong domain shape ({domain_len},) for data of shape {data_shape:?}.")]
    DomainMismatch {
        domain_len: usize,
        data_shape: Vec<usize>,
    },
    #[error(transparent)]
    Reshape(#[from] ShapeError),
}
