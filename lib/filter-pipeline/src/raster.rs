use crate::DecodeError;
use filter_engine::FilterKind;
use image::RgbaImage;
use std::sync::Arc;

/// Caller-owned input image. Cheap to clone, never mutated by the pipeline.
#[derive(Debug, Clone)]
pub struct SourceImage(Arc<RgbaImage>);

impl SourceImage {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Decodes any format the `image` crate was built with.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(image.to_rgba8()))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    pub(crate) fn shared(&self) -> Arc<RgbaImage> {
        self.0.clone()
    }
}

impl From<RgbaImage> for SourceImage {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

/// Output of a successful render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    image: RgbaImage,
    filter: FilterKind,
}

impl RenderedImage {
    pub(crate) fn new(image: RgbaImage, filter: FilterKind) -> Self {
        Self { image, filter }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
