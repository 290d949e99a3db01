use filter_engine::{FilterKind, ImageFilterEngine, ParameterKey, ParameterSet};

/// Identity of a selectable filter and the parameters it understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDescriptor {
    kind: FilterKind,
    supported: ParameterSet,
}

impl FilterDescriptor {
    pub fn new(kind: FilterKind, supported: ParameterSet) -> Self {
        Self { kind, supported }
    }

    /// Asks `engine` which keys a freshly instantiated graph of `kind` accepts.
    pub fn describe<E: ImageFilterEngine>(engine: &E, kind: FilterKind) -> Self {
        let graph = engine.instantiate(kind);
        Self::new(kind, engine.supported_keys(&graph))
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn supported(&self) -> ParameterSet {
        self.supported
    }

    pub fn supports(&self, key: ParameterKey) -> bool {
        self.supported.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter_engine::RasterEngine;

    #[test]
    fn test_describe_queries_engine() {
        let engine = RasterEngine::new();
        let descriptor = FilterDescriptor::describe(&engine, FilterKind::UnsharpMask);
        assert_eq!(descriptor.name(), "Unsharp Mask");
        assert!(descriptor.supports(ParameterKey::Intensity));
        assert!(descriptor.supports(ParameterKey::Radius));
        assert!(!descriptor.supports(ParameterKey::Scale));
    }
}
