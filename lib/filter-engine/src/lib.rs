pub mod blur;
pub mod engine;
pub mod filter;
pub mod graph;
pub mod kind;
pub mod parameter;
pub mod sharpen;
pub mod stylized;

pub use engine::{ImageFilterEngine, RasterEngine};
pub use graph::FilterGraph;
pub use image::{Rgba, RgbaImage};
pub use kind::FilterKind;
pub use parameter::{ParameterKey, ParameterSet};

pub type FilterEngineResult<T> = Result<T, FilterEngineError>;

#[derive(thiserror::Error, Debug)]
pub enum FilterEngineError {
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("{filter} has no {key} input")]
    UnsupportedParameter { filter: FilterKind, key: ParameterKey },

    #[error("Invalid parameter value {value} for {key}")]
    InvalidParameter { key: ParameterKey, value: f32 },
}

/// A single image transformation. Returns `None` when no output can be produced.
pub trait Effect {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage>;
}
