// hyperspectrs/src/transforms/mod.rs

pub use domain_selection::{DomainSelection, Selection};
pub use errors::TransformError;
pub use logarithm::LogTransform;
pub use mean_centering::MeanCentering;
pub use msc::MultiplicativeScatterCorrection;
pub use normalization::{Norm, Normalization};
pub use positive::PositiveShift;
pub use savitzky_golay::SavitzkyGolayFilter;
pub use snv::StandardNormalVariate;
pub use traits::{resize_x, SignalTransform, Transformed};
pub use transforms::{Preprocessing, TransformConfig};

pub mod domain_selection;
pub mod errors;
pub mod logarithm;
pub mod mean_centering;
pub mod msc;
pub mod normalization;
pub mod positive;
pub mod savitzky_golay;
pub mod snv;
pub mod traits;
pub mod transforms;
pub mod utils;
