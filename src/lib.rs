use pretty_env_logger;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn _setup_pretty_env_logger_default() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}

pub use crop::{get_max_rectangle_mask, CropError, RectangleMask};
pub use kmeans::{kmeans, KMeansError, SpectralKMeans, SubSampling};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineError};
pub use reflectance::{expand_average, get_reflectance, ReflectanceError};
pub use spectral::{as_cube, Spectral, SpectralCube, SpectralError, SpectralMat};
pub use transforms::{SignalTransform, TransformConfig, TransformError};
pub mod crop;
pub mod kmeans;
pub mod pipeline;
pub mod reflectance;
pub mod spectral;
pub mod transforms;
