use crate::{
    kind::FilterKind,
    parameter::{ParameterKey, ParameterSet},
};
use image::RgbaImage;
use std::sync::Arc;

/// A named filter together with its input image and bound values.
#[derive(Debug, Clone)]
pub struct FilterGraph {
    kind: FilterKind,
    input: Option<Arc<RgbaImage>>,
    values: [Option<f32>; 3],
}

impl FilterGraph {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            input: None,
            values: [None; 3],
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn input(&self) -> Option<&Arc<RgbaImage>> {
        self.input.as_ref()
    }

    pub fn set_input(&mut self, image: Arc<RgbaImage>) {
        self.input = Some(image);
    }

    pub fn value(&self, key: ParameterKey) -> Option<f32> {
        self.values[key.index()]
    }

    pub fn set_value(&mut self, key: ParameterKey, value: f32) {
        self.values[key.index()] = Some(value);
    }

    pub fn bound_keys(&self) -> ParameterSet {
        ParameterKey::ALL
            .into_iter()
            .filter(|key| self.value(*key).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_is_unbound() {
        let graph = FilterGraph::new(FilterKind::Vignette);
        assert_eq!(graph.kind(), FilterKind::Vignette);
        assert!(graph.input().is_none());
        assert!(graph.bound_keys().is_empty());
    }

    #[test]
    fn test_set_value_overwrites() {
        let mut graph = FilterGraph::new(FilterKind::Vignette);
        graph.set_value(ParameterKey::Radius, 10.0);
        graph.set_value(ParameterKey::Radius, 20.0);
        assert_eq!(graph.value(ParameterKey::Radius), Some(20.0));
        assert_eq!(graph.value(ParameterKey::Intensity), None);
        assert_eq!(graph.bound_keys(), ParameterSet::from_keys(&[ParameterKey::Radius]));
    }
}
