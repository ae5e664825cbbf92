// hyperspectrs/src/reflectance.rs

use crate::spectral::{SpectralCube, SpectralError};
use ndarray::{s, Array, Array1, Array3, ArrayView, ArrayView3, Axis, Dimension, Zip};
use thiserror::Error;

pub const DEFAULT_ZERO_DENOMINATOR_REPLACE: f64 = 1e-9;

/// Reflectance from raw counts and white/dark reference measurements:
/// `(raw - dark) / (white - dark)`.
///
/// Without `dark_ref` the dark level is zero. Denominator entries that are
/// exactly zero are replaced by `zero_denominator_replace` before dividing.
pub fn get_reflectance<D: Dimension>(
    raw: ArrayView<f64, D>,
    white_ref: ArrayView<f64, D>,
    dark_ref: Option<ArrayView<f64, D>>,
    zero_denominator_replace: f64,
) -> Result<Array<f64, D>, ReflectanceError> {
    validate_same_shape("white_ref", &raw, &white_ref)?;
    let ratio = |numerator: f64, denominator: f64| {
        if denominator == 0. {
            numerator / zero_denominator_replace
        } else {
            numerator / denominator
        }
    };
    let reflectance = match dark_ref {
        Some(dark_ref) => {
            validate_same_shape("dark_ref", &raw, &dark_ref)?;
            Zip::from(&raw)
                .and(&white_ref)
                .and(&dark_ref)
                .par_map_collect(|&r, &w, &d| ratio(r - d, w - d))
        }
        None => Zip::from(&raw)
            .and(&white_ref)
            .par_map_collect(|&r, &w| ratio(r, w)),
    };
    Ok(reflectance)
}

/// Averages a reference block along `average_dim` and repeats the resulting
/// profile `expand_size` times.
///
/// The mean of a `(a, b, c)` block over `average_dim` is a 2D `(p, q)` array;
/// the output has shape `(p, expand_size, q)`. With the default
/// `average_dim = 1` this turns a `(samples, lines, bands)` reference
/// recording into a per-pixel baseline for an image with `expand_size` lines.
pub fn expand_average(
    raw: ArrayView3<f64>,
    expand_size: usize,
    average_dim: usize,
) -> Result<Array3<f64>, ReflectanceError> {
    if average_dim > 2 {
        return Err(ReflectanceError::InvalidAverageDim(average_dim));
    }
    let mean = raw
        .mean_axis(Axis(average_dim))
        .ok_or(ReflectanceError::EmptyReference(average_dim))?;
    let (p, q) = mean.dim();
    Ok(Array3::from_shape_fn((p, expand_size, q), |(i, _, k)| {
        mean[[i, k]]
    }))
}

fn validate_same_shape<D: Dimension>(
    name: &'static str,
    raw: &ArrayView<f64, D>,
    other: &ArrayView<f64, D>,
) -> Result<(), ReflectanceError> {
    if raw.shape() != other.shape() {
        return Err(ReflectanceError::ShapeMismatch {
            name,
            expected: raw.shape().to_vec(),
            got: other.shape().to_vec(),
        });
    }
    Ok(())
}

impl SpectralCube {
    /// Reflectance cube from a raw image and separate white and dark
    /// reference recordings of shape `(samples, reference_lines, bands)`.
    pub fn from_specim(
        raw: ArrayView3<f64>,
        white_ref: ArrayView3<f64>,
        dark_ref: ArrayView3<f64>,
        wavelengths: Array1<f64>,
    ) -> Result<Self, ReflectanceError> {
        let lines = raw.dim().1;
        log::debug!(
            "Specim reflectance: raw {:?}, white {:?}, dark {:?}",
            raw.dim(),
            white_ref.dim(),
            dark_ref.dim()
        );
        let white = expand_average(white_ref, lines, 1)?;
        let dark = expand_average(dark_ref, lines, 1)?;
        let reflectance = get_reflectance(
            raw,
            white.view(),
            Some(dark.view()),
            DEFAULT_ZERO_DENOMINATOR_REPLACE,
        )?;
        Ok(Self::new(reflectance, wavelengths)?)
    }

    /// Reflectance cube from a raw image whose lines
    /// `start_white_index..end_white_index` image the white reference.
    pub fn from_hyspex(
        raw: ArrayView3<f64>,
        wavelengths: Array1<f64>,
        start_white_index: usize,
        end_white_index: usize,
    ) -> Result<Self, ReflectanceError> {
        let lines = raw.dim().1;
        if start_white_index >= end_white_index || end_white_index > lines {
            return Err(ReflectanceError::InvalidWhiteRange(
                start_white_index,
                end_white_index,
                lines,
            ));
        }
        let white_ref = raw.slice(s![.., start_white_index..end_white_index, ..]);
        let white = expand_average(white_ref, lines, 1)?;
        let reflectance =
            get_reflectance(raw, white.view(), None, DEFAULT_ZERO_DENOMINATOR_REPLACE)?;
        Ok(Self::new(reflectance, wavelengths)?)
    }
}

#[derive(Error, Debug)]
pub enum ReflectanceError {
    #[error("{name} must have the same shape as raw data {expected:?}, but got {got:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("average_dim must be 0, 1 or 2 but got {0}")]
    InvalidAverageDim(usize),
    #[error("Cannot average an empty reference along axis {0}")]
    EmptyReference(usize),
    #[error("White reference lines {0}..{1} are not a valid range for an image of {2} lines")]
    InvalidWhiteRange(usize, usize, usize),
    #[error(transparent)]
    SpectralError(#[from] SpectralError),
}
