// hyperspectrs/src/pipeline/mod.rs

mod errors;
mod pipeline;

pub use errors::PipelineError;
pub use pipeline::{Pipeline, PipelineBuilder};
