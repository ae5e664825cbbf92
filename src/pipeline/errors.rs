// hyperspectrs/src/pipeline/errors.rs

use crate::spectral::SpectralError;
use crate::transforms::TransformError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unitialized field on PipelineBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("Pipeline stage {index} ({kind}) failed")]
    Stage {
        index: usize,
        kind: &'static str,
        #[source]
        source: TransformError,
    },
    #[error(transparent)]
    SpectralError(#[from] SpectralError),
}

impl PipelineError {
    pub(crate) fn stage(index: usize, kind: &'static str) -> impl Fn(TransformError) -> Self {
        move |source| Self::Stage {
            index,
            kind,
            source,
        }
    }
}
