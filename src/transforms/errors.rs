// hyperspectrs/src/transforms/errors.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Expected data with (1, 2) dimensions but received {0} instead.")]
    DimensionError(usize),
    #[error("{0} is an invalid value for norm. Should be among [\"l1\", \"l2\", \"inf\"]")]
    InvalidNorm(String),
    #[error("window_size must be odd, but got {0}")]
    EvenWindowSize(usize),
    #[error("window_size must be >= polynomial_order + 1 (which is {1}), but got {0}")]
    WindowTooSmall(usize, usize),
    #[error("derivation_order must be <= polynomial_order (which is {1}), but got {0}")]
    DerivationOrderTooHigh(usize, usize),
    #[error("Invalid transform step: {0}")]
    InvalidStep(String),
    #[error("Invalid domain selection: {0}")]
    InvalidSelection(String),
    #[error("Signals of length {0} are too short for a window of size {1}")]
    SignalTooShort(usize, usize),
    #[error("A reference spectrum y must be given for X with only one row.")]
    MissingReference,
    #[error("The reference must be of shape (1, {expected}) but is {got:?}")]
    ReferenceShapeMismatch { expected: usize, got: Vec<usize> },
    #[error("Expected {expected} columns but got {got}")]
    ColumnMismatch { expected: usize, got: usize },
    #[error("{0} must be fitted before calling transform")]
    NotFitted(&'static str),
    #[error("Singular matrix while computing filter coefficients")]
    SingularMatrix,
}

impl TransformError {
    /// Whether the error comes from invalid transform parameters rather than
    /// from the data the transform was applied to.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidNorm(_)
                | Self::InvalidStep(_)
                | Self::EvenWindowSize(_)
                | Self::WindowTooSmall(..)
                | Self::DerivationOrderTooHigh(..)
                | Self::InvalidSelection(_)
        )
    }
}
