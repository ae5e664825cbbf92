// hyperspectrs/src/kmeans.rs

use crate::spectral::{as_cube, Spectral, SpectralCube, SpectralError};
use humantime::format_duration;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{array, Array1, Array2, Axis, ShapeError};
use std::time::Instant;
use thiserror::Error;

pub type SpectralKMeans = KMeans<f64, L2Dist>;

/// Which pixels the clustering model is fitted on. Every pixel is labelled
/// regardless of the sub-sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SubSampling {
    /// Fraction of the pixels in `(0, 1]`, rounded up.
    Fraction(f64),
    /// Absolute number of pixels.
    Count(usize),
}

impl SubSampling {
    fn sample_size(&self, nrows: usize) -> Result<usize, KMeansError> {
        match *self {
            Self::Fraction(fraction) if fraction > 0. && fraction <= 1. => {
                Ok(((fraction * nrows as f64).ceil() as usize).min(nrows))
            }
            Self::Count(count) if count > 0 && count <= nrows => Ok(count),
            other => Err(KMeansError::InvalidSubSampling(other, nrows)),
        }
    }

    /// Evenly strided row indices so repeated runs fit on the same pixels.
    pub fn indices(&self, nrows: usize) -> Result<Vec<usize>, KMeansError> {
        let size = self.sample_size(nrows)?;
        Ok((0..size).map(|k| k * nrows / size).collect())
    }
}

/// Clusters the pixel spectra of `cube` into `nclusters` groups.
///
/// Returns the fitted model and a cube of labels with the spatial shape of
/// `cube` and a single band.
pub fn kmeans(
    cube: &SpectralCube,
    nclusters: usize,
    sub_sampling: Option<SubSampling>,
) -> Result<(SpectralKMeans, SpectralCube), KMeansError> {
    log::info!(
        "Begin k-means clustering of {} pixels with nclusters={}",
        cube.width() * cube.height(),
        nclusters
    );
    let now = Instant::now();
    let matrix: Array2<f64> = cube.get_matrix()?.into_owned();
    let fit_set = match sub_sampling {
        Some(sub_sampling) => {
            let indices = sub_sampling.indices(matrix.nrows())?;
            log::debug!("Fitting on {} sub-sampled pixels", indices.len());
            matrix.select(Axis(0), &indices)
        }
        None => matrix.clone(),
    };
    if fit_set.nrows() < nclusters {
        return Err(KMeansError::TooFewSamples(fit_set.nrows(), nclusters));
    }
    let observations = DatasetBase::from(fit_set);
    let model = KMeans::params(nclusters).fit(&observations)?;
    let predictions: Array1<usize> = model.predict(&matrix);
    let labels = predictions.mapv(|label| label as f64);
    let labels = as_cube(&labels, cube, Some(&array![0.]))?;
    log::debug!(
        "Took {} to cluster {} pixels.",
        format_duration(now.elapsed()),
        matrix.nrows()
    );
    Ok((model, labels))
}

#[derive(Error, Debug)]
pub enum KMeansError {
    #[error(transparent)]
    NDArrayShapeError(#[from] ShapeError),
    #[error(transparent)]
    KMeansError(#[from] linfa_clustering::KMeansError),
    #[error(transparent)]
    SpectralError(#[from] SpectralError),
    #[error("{0:?} is not a valid sub-sampling of {1} pixels")]
    InvalidSubSampling(SubSampling, usize),
    #[error("Cannot fit {1} clusters on {0} pixels")]
    TooFewSamples(usize, usize),
}
