//! Filter selection, parameter binding and rendering on top of an
//! [`ImageFilterEngine`](filter_engine::ImageFilterEngine).
//!
//! A [`FilterPipeline`] owns the selected filter, the three slider values
//! (intensity, radius, scale) and the current source and rendered images.
//! Every failure leaves the pipeline without a rendered image instead of
//! showing a stale one.

pub mod descriptor;
pub mod parameters;
pub mod pipeline;
pub mod raster;
pub mod source;

pub use descriptor::FilterDescriptor;
pub use filter_engine::{FilterKind, ImageFilterEngine, ParameterKey, ParameterSet, RasterEngine};
pub use parameters::{ParameterState, RADIUS_SCALE, SCALE_SCALE};
pub use pipeline::FilterPipeline;
pub use raster::{RenderedImage, SourceImage};
pub use source::{FileSource, ImageSource, LoadTicket, LoadedImage, MemorySource};

use std::path::PathBuf;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(thiserror::Error, Debug)]
pub enum AcquisitionError {
    #[error("No image selected")]
    NothingSelected,

    #[error("Failed to read {path}: {error}")]
    Read {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Image loading task failed: {0}")]
    Task(String),
}

#[derive(thiserror::Error, Debug)]
#[error("Image data could not be decoded: {0}")]
pub struct DecodeError(#[from] image::ImageError);

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("No source image")]
    NoSource,

    #[error("{0} produced no output")]
    NoOutput(FilterKind),

    #[error("Binding rejected: {0}")]
    Binding(#[from] filter_engine::FilterEngineError),
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
