use crate::{Effect, blur::blur_sigma};
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, Luma, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use rayon::prelude::*;

/// Unsharp mask configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct UnsharpMaskConfig {
    #[derivative(Default(value = "2.5"))]
    radius: f32,

    #[derivative(Default(value = "0.5"))]
    intensity: f32,
}

impl UnsharpMaskConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for UnsharpMaskConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let Some(sigma) = blur_sigma(self.radius) else {
            return Some(image);
        };
        if self.intensity == 0.0 {
            return Some(image);
        }

        let (width, height) = (image.width(), image.height());
        let blurred = gaussian_blur_f32(&image, sigma);
        let amount = self.intensity;
        let mut pixels = image.into_raw();

        pixels
            .par_chunks_exact_mut(4)
            .zip(blurred.as_raw().par_chunks_exact(4))
            .for_each(|(pixel, soft)| {
                for c in 0..3 {
                    let original = pixel[c] as f32;
                    let detail = original - soft[c] as f32;
                    pixel[c] = (original + amount * detail).round().clamp(0.0, 255.0) as u8;
                }
            });

        RgbaImage::from_raw(width, height, pixels)
    }
}

/// Sharpens luminance detail only, leaving chroma untouched.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SharpenLuminanceConfig {
    #[derivative(Default(value = "1.69"))]
    radius: f32,

    #[derivative(Default(value = "0.4"))]
    sharpness: f32,
}

impl SharpenLuminanceConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

fn luma(pixel: &[u8]) -> f32 {
    0.2126 * pixel[0] as f32 + 0.7152 * pixel[1] as f32 + 0.0722 * pixel[2] as f32
}

impl Effect for SharpenLuminanceConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let Some(sigma) = blur_sigma(self.radius) else {
            return Some(image);
        };
        if self.sharpness == 0.0 {
            return Some(image);
        }

        let (width, height) = (image.width(), image.height());
        let luminance = GrayImage::from_fn(width, height, |x, y| {
            Luma([luma(&image.get_pixel(x, y).0).round().clamp(0.0, 255.0) as u8])
        });
        let blurred = gaussian_blur_f32(&luminance, sigma);
        let sharpness = self.sharpness;
        let mut pixels = image.into_raw();

        pixels
            .par_chunks_exact_mut(4)
            .zip(luminance.as_raw().par_iter().zip(blurred.as_raw().par_iter()))
            .for_each(|(pixel, (y, soft))| {
                let delta = sharpness * (*y as f32 - *soft as f32);
                for c in pixel.iter_mut().take(3) {
                    *c = (*c as f32 + delta).round().clamp(0.0, 255.0) as u8;
                }
            });

        RgbaImage::from_raw(width, height, pixels)
    }
}
