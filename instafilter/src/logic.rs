//! Edit and share flows driving a [`filter_pipeline::FilterPipeline`].

mod edit;
mod share;

pub use edit::{EditSettings, edit, filter_listing};
pub use share::{default_output_path, export};
