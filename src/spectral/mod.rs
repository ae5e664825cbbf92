// hyperspectrs/src/spectral/mod.rs

mod container;
mod errors;

pub use container::{as_cube, Spectral, SpectralCube, SpectralMat};
pub use errors::SpectralError;
