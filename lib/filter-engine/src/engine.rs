use crate::{
    Effect, FilterEngineError, FilterEngineResult,
    blur::{DepthOfFieldConfig, GaussianBlurConfig},
    filter::{SepiaConfig, VignetteConfig},
    graph::FilterGraph,
    kind::FilterKind,
    parameter::{ParameterKey, ParameterSet},
    sharpen::{SharpenLuminanceConfig, UnsharpMaskConfig},
    stylized::{CrystallizeConfig, EdgesConfig, PixellateConfig, PointillizeConfig},
};
use image::RgbaImage;
use std::sync::Arc;

/// An image-processing backend that builds filter graphs and renders them.
pub trait ImageFilterEngine {
    type Graph;

    fn instantiate(&self, kind: FilterKind) -> Self::Graph;

    /// The parameter inputs the graph accepts.
    fn supported_keys(&self, graph: &Self::Graph) -> ParameterSet;

    fn bind_source(&self, graph: &mut Self::Graph, image: Arc<RgbaImage>);

    /// Fails for keys outside [`ImageFilterEngine::supported_keys`].
    fn bind(&self, graph: &mut Self::Graph, key: ParameterKey, value: f32)
    -> FilterEngineResult<()>;

    /// Renders the graph at its natural extent. `None` when the graph is
    /// incomplete or cannot produce pixels.
    fn render(&self, graph: &Self::Graph) -> Option<RgbaImage>;
}

/// CPU engine backed by the effect configs in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterEngine;

impl RasterEngine {
    pub fn new() -> Self {
        Self
    }

    fn effect(graph: &FilterGraph) -> Box<dyn Effect> {
        let intensity = graph.value(ParameterKey::Intensity);
        let radius = graph.value(ParameterKey::Radius);
        let scale = graph.value(ParameterKey::Scale);

        macro_rules! configure {
            ($config:expr, $($setter:ident = $value:expr),*) => {{
                let mut config = $config;
                $(if let Some(v) = $value {
                    config = config.$setter(v);
                })*
                Box::new(config) as Box<dyn Effect>
            }};
        }

        match graph.kind() {
            FilterKind::Crystallize => configure!(CrystallizeConfig::new(), with_radius = radius),
            FilterKind::Edges => configure!(EdgesConfig::new(), with_intensity = intensity),
            FilterKind::GaussianBlur => configure!(GaussianBlurConfig::new(), with_radius = radius),
            FilterKind::Pixellate => configure!(PixellateConfig::new(), with_scale = scale),
            FilterKind::SepiaTone => configure!(SepiaConfig::new(), with_intensity = intensity),
            FilterKind::UnsharpMask => configure!(
                UnsharpMaskConfig::new(),
                with_intensity = intensity,
                with_radius = radius
            ),
            FilterKind::Vignette => configure!(
                VignetteConfig::new(),
                with_intensity = intensity,
                with_radius = radius
            ),
            FilterKind::DepthOfField => configure!(DepthOfFieldConfig::new(), with_radius = radius),
            FilterKind::SharpenLuminance => {
                configure!(SharpenLuminanceConfig::new(), with_radius = radius)
            }
            FilterKind::Pointillize => configure!(PointillizeConfig::new(), with_radius = radius),
        }
    }
}

impl ImageFilterEngine for RasterEngine {
    type Graph = FilterGraph;

    fn instantiate(&self, kind: FilterKind) -> FilterGraph {
        FilterGraph::new(kind)
    }

    fn supported_keys(&self, graph: &FilterGraph) -> ParameterSet {
        graph.kind().input_keys()
    }

    fn bind_source(&self, graph: &mut FilterGraph, image: Arc<RgbaImage>) {
        graph.set_input(image);
    }

    fn bind(&self, graph: &mut FilterGraph, key: ParameterKey, value: f32) -> FilterEngineResult<()> {
        if !self.supported_keys(graph).contains(key) {
            return Err(FilterEngineError::UnsupportedParameter {
                filter: graph.kind(),
                key,
            });
        }

        if !value.is_finite() {
            return Err(FilterEngineError::InvalidParameter { key, value });
        }

        graph.set_value(key, value);
        Ok(())
    }

    fn render(&self, graph: &FilterGraph) -> Option<RgbaImage> {
        let Some(input) = graph.input() else {
            log::debug!("{} has no input image", graph.kind());
            return None;
        };

        if input.width() == 0 || input.height() == 0 {
            log::debug!("{} input image is empty", graph.kind());
            return None;
        }

        let output = Self::effect(graph).apply(RgbaImage::clone(input));
        if output.is_none() {
            log::warn!("{} produced no output", graph.kind());
        }
        output
    }
}
