// hyperspectrs/src/spectral/container.rs

use super::errors::SpectralError;
use ndarray::{Array, Array1, Array2, Array3, ArrayBase, ArrayD, CowArray, Data, Dimension, Ix1};
use ndarray::{Ix2, Ix3};

/// Common surface of the spectral containers: a block of measurements whose
/// last axis is indexed by a 1D spectral domain.
pub trait Spectral: Sized {
    fn domain(&self) -> &Array1<f64>;

    /// Two dimensional view of the data, one row per spectrum.
    fn get_matrix(&self) -> Result<CowArray<'_, f64, Ix2>, SpectralError>;

    /// Builds a container with the same spatial geometry from a processed
    /// matrix whose columns are indexed by `domain`.
    fn rebuild(&self, matrix: Array2<f64>, domain: Array1<f64>) -> Result<Self, SpectralError>;
}

fn into_rank<D: Dimension>(array: ArrayD<f64>) -> Result<Array<f64, D>, SpectralError> {
    let expected = D::NDIM.unwrap_or_else(|| array.ndim());
    if array.ndim() != expected {
        return Err(SpectralError::DimensionError {
            got: array.ndim(),
            expected,
        });
    }
    Ok(array.into_dimensionality::<D>()?)
}

fn validate_domain_len(
    data_shape: &[usize],
    domain: &Array1<f64>,
) -> Result<(), SpectralError> {
    let spectral_len = data_shape.last().copied().unwrap_or(0);
    if spectral_len != domain.len() {
        return Err(SpectralError::DomainMismatch {
            domain_len: domain.len(),
            data_shape: data_shape.to_vec(),
        });
    }
    Ok(())
}

/// Hyperspectral cube of shape `(width, height, domain_len)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralCube {
    data: Array3<f64>,
    domain: Array1<f64>,
}

impl SpectralCube {
    pub fn new(data: Array3<f64>, domain: Array1<f64>) -> Result<Self, SpectralError> {
        validate_domain_len(data.shape(), &domain)?;
        Ok(Self { data, domain })
    }

    /// Construction from arrays of unknown rank. The data rank is checked
    /// first, then the domain rank, and only then the domain length.
    pub fn from_dyn(data: ArrayD<f64>, domain: ArrayD<f64>) -> Result<Self, SpectralError> {
        let data = into_rank::<Ix3>(data)?;
        let domain = into_rank::<Ix1>(domain)?;
        Self::new(data, domain)
    }

    /// Cube whose domain is the band numbers `1..=d`.
    pub fn with_default_domain(data: Array3<f64>) -> Self {
        let bands = data.dim().2;
        let domain = Array1::from_iter((1..=bands).map(|band| band as f64));
        Self { data, domain }
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn width(&self) -> usize {
        self.data.dim().0
    }

    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    /// Replaces the measurements, keeping the current domain.
    pub fn update_data(&mut self, data: Array3<f64>) -> Result<(), SpectralError> {
        validate_domain_len(data.shape(), &self.domain)?;
        self.data = data;
        Ok(())
    }

    pub fn into_parts(self) -> (Array3<f64>, Array1<f64>) {
        (self.data, self.domain)
    }
}

impl Spectral for SpectralCube {
    fn domain(&self) -> &Array1<f64> {
        &self.domain
    }

    fn get_matrix(&self) -> Result<CowArray<'_, f64, Ix2>, SpectralError> {
        let (width, height, bands) = self.data.dim();
        Ok(self.data.to_shape((width * height, bands))?)
    }

    fn rebuild(&self, matrix: Array2<f64>, domain: Array1<f64>) -> Result<Self, SpectralError> {
        as_cube(&matrix, self, Some(&domain))
    }
}

/// Plain matrix of spectra, one row per spectrum.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralMat {
    data: Array2<f64>,
    domain: Array1<f64>,
}

impl SpectralMat {
    pub fn new(data: Array2<f64>, domain: Array1<f64>) -> Result<Self, SpectralError> {
        validate_domain_len(data.shape(), &domain)?;
        Ok(Self { data, domain })
    }

    pub fn from_dyn(data: ArrayD<f64>, domain: ArrayD<f64>) -> Result<Self, SpectralError> {
        let data = into_rank::<Ix2>(data)?;
        let domain = into_rank::<Ix1>(domain)?;
        Self::new(data, domain)
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn update_data(&mut self, data: Array2<f64>) -> Result<(), SpectralError> {
        validate_domain_len(data.shape(), &self.domain)?;
        self.data = data;
        Ok(())
    }

    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>) {
        (self.data, self.domain)
    }
}

impl Spectral for SpectralMat {
    fn domain(&self) -> &Array1<f64> {
        &self.domain
    }

    fn get_matrix(&self) -> Result<CowArray<'_, f64, Ix2>, SpectralError> {
        Ok(CowArray::from(self.data.view()))
    }

    fn rebuild(&self, matrix: Array2<f64>, domain: Array1<f64>) -> Result<Self, SpectralError> {
        Self::new(matrix, domain)
    }
}

/// Reinterprets flat results (e.g. one prediction per pixel) as a cube with
/// the spatial shape of `reference`. Without `domain` the reference domain is
/// reused. Values are consumed in row-major order, the inverse of
/// [`Spectral::get_matrix`].
pub fn as_cube<S, D>(
    data: &ArrayBase<S, D>,
    reference: &SpectralCube,
    domain: Option<&Array1<f64>>,
) -> Result<SpectralCube, SpectralError>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let domain = domain.unwrap_or(&reference.domain).clone();
    let (width, height, _) = reference.shape();
    let values: Vec<f64> = data.iter().cloned().collect();
    let cube = Array3::from_shape_vec((width, height, domain.len()), values)?;
    SpectralCube::new(cube, domain)
}
