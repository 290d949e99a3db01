use crate::Effect;
use derivative::Derivative;
use derive_setters::Setters;
use image::{RgbaImage, imageops};
use imageproc::filter::gaussian_blur_f32;
use rayon::prelude::*;

/// Smallest standard deviation that still produces a usable kernel.
const MIN_SIGMA: f32 = 0.01;

/// Gaussian standard deviation for a blur radius given in pixels. `None` when
/// the radius is too small to blur anything.
pub(crate) fn blur_sigma(radius: f32) -> Option<f32> {
    let sigma = radius / 3.0;
    (sigma.is_finite() && sigma >= MIN_SIGMA).then_some(sigma)
}

/// Gaussian blur configuration.
///
/// The output is larger than the input: the blur spreads `radius` pixels past
/// every edge into the transparent surroundings.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianBlurConfig {
    #[derivative(Default(value = "10.0"))]
    radius: f32,
}

impl GaussianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels added on each side of the input.
    pub fn padding(&self) -> u32 {
        match blur_sigma(self.radius) {
            Some(_) => self.radius.ceil() as u32,
            None => 0,
        }
    }
}

impl Effect for GaussianBlurConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let Some(sigma) = blur_sigma(self.radius) else {
            return Some(image);
        };

        let pad = self.padding();
        let border = pad.checked_mul(2)?;
        let (width, height) = (image.width(), image.height());
        let mut canvas = RgbaImage::new(width.checked_add(border)?, height.checked_add(border)?);
        imageops::overlay(&mut canvas, &image, pad as i64, pad as i64);

        Some(gaussian_blur_f32(&canvas, sigma))
    }
}

/// Depth of field configuration
///
/// Keeps a horizontal band in focus and blurs progressively towards the top
/// and bottom edges.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct DepthOfFieldConfig {
    #[derivative(Default(value = "6.0"))]
    radius: f32,

    /// Top of the focus band as a fraction of the height
    #[derivative(Default(value = "0.35"))]
    focus_top: f32,

    /// Bottom of the focus band as a fraction of the height
    #[derivative(Default(value = "0.65"))]
    focus_bottom: f32,

    /// Distance (fraction of the height) over which the blur fades in
    #[derivative(Default(value = "0.2"))]
    falloff: f32,
}

impl DepthOfFieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn blur_weight(&self, y: u32, height: u32) -> f32 {
        let t = (y as f32 + 0.5) / height as f32;
        let distance = if t < self.focus_top {
            self.focus_top - t
        } else if t > self.focus_bottom {
            t - self.focus_bottom
        } else {
            0.0
        };

        (distance / self.falloff.max(f32::EPSILON)).clamp(0.0, 1.0)
    }
}

impl Effect for DepthOfFieldConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let Some(sigma) = blur_sigma(self.radius) else {
            return Some(image);
        };

        let (width, height) = (image.width(), image.height());
        let blurred = gaussian_blur_f32(&image, sigma);
        let row_stride = width as usize * 4;
        let mut pixels = image.into_raw();

        pixels
            .par_chunks_mut(row_stride)
            .zip(blurred.as_raw().par_chunks(row_stride))
            .enumerate()
            .for_each(|(y, (row, blurred_row))| {
                let weight = self.blur_weight(y as u32, height);
                if weight == 0.0 {
                    return;
                }

                for (sharp, soft) in row.iter_mut().zip(blurred_row) {
                    *sharp = (*sharp as f32 * (1.0 - weight) + *soft as f32 * weight).round() as u8;
                }
            });

        RgbaImage::from_raw(width, height, pixels)
    }
}
