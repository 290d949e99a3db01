use crate::Effect;
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use photon_rs::{PhotonImage, monochrome};
use rayon::prelude::*;

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SepiaConfig {
    #[derivative(Default(value = "1.0"))]
    intensity: f32,
}

impl SepiaConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for SepiaConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let intensity = self.intensity.clamp(0.0, 1.0);
        if intensity == 0.0 {
            return Some(image);
        }

        let (width, height) = (image.width(), image.height());
        let mut photon_img = PhotonImage::new(image.to_vec(), width, height);
        monochrome::sepia(&mut photon_img);
        let sepia_pixels = photon_img.get_raw_pixels();
        let mut pixels = image.into_raw();

        // Blend towards the sepia tone, alpha stays with the original
        pixels
            .par_chunks_exact_mut(4)
            .zip(sepia_pixels.par_chunks_exact(4))
            .for_each(|(original, sepia)| {
                for c in 0..3 {
                    original[c] = (original[c] as f32 * (1.0 - intensity)
                        + sepia[c] as f32 * intensity)
                        .round() as u8;
                }
            });

        RgbaImage::from_raw(width, height, pixels)
    }
}

/// Vignette configuration
///
/// Pixels closer than `radius` to the centre are untouched; beyond it the
/// image darkens smoothly towards the corners by up to `intensity`.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct VignetteConfig {
    #[derivative(Default(value = "0.0"))]
    intensity: f32,

    #[derivative(Default(value = "100.0"))]
    radius: f32,
}

impl VignetteConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for VignetteConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let intensity = self.intensity.clamp(0.0, 1.0);
        if intensity == 0.0 {
            return Some(image);
        }

        let (width, height) = (image.width(), image.height());
        let center_x = width as f32 / 2.0;
        let center_y = height as f32 / 2.0;
        let max_distance = (center_x * center_x + center_y * center_y).sqrt();
        let radius = self.radius.max(0.0);
        let span = (max_distance - radius).max(1.0);
        let row_stride = width as usize * 4;
        let mut pixels = image.into_raw();

        pixels
            .par_chunks_mut(row_stride)
            .enumerate()
            .for_each(|(y, row)| {
                let dy = y as f32 + 0.5 - center_y;

                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let dx = x as f32 + 0.5 - center_x;
                    let distance = (dx * dx + dy * dy).sqrt();
                    if distance <= radius {
                        continue;
                    }

                    let t = ((distance - radius) / span).clamp(0.0, 1.0);
                    let falloff = t * t * (3.0 - 2.0 * t);
                    let factor = 1.0 - intensity * falloff;

                    for c in pixel.iter_mut().take(3) {
                        *c = (*c as f32 * factor).round() as u8;
                    }
                }
            });

        RgbaImage::from_raw(width, height, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_sepia_full_intensity_warms_grey() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([128, 128, 128, 255]));
        let output = SepiaConfig::new().with_intensity(1.0).apply(image).unwrap();
        let pixel = output.get_pixel(1, 1);
        assert!(pixel[0] >= pixel[1]);
        assert!(pixel[1] >= pixel[2]);
        assert!(pixel[0] > pixel[2]);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_sepia_zero_intensity_is_identity() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255]));
        let output = SepiaConfig::new().with_intensity(0.0).apply(image.clone()).unwrap();
        assert_eq!(output, image);
    }

    #[test]
    fn test_sepia_keeps_alpha() {
        let image = RgbaImage::from_pixel(3, 3, Rgba([200, 100, 50, 77]));
        let output = SepiaConfig::new().with_intensity(0.5).apply(image).unwrap();
        assert!(output.pixels().all(|p| p[3] == 77));
    }

    #[test]
    fn test_vignette_darkens_corners_only() {
        let image = RgbaImage::from_pixel(40, 40, Rgba([200, 200, 200, 255]));
        let output = VignetteConfig::new()
            .with_intensity(1.0)
            .with_radius(10.0)
            .apply(image)
            .unwrap();

        assert_eq!(output.get_pixel(20, 20)[0], 200);
        assert!(output.get_pixel(0, 0)[0] < 50);
    }

    #[test]
    fn test_vignette_large_radius_is_identity() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([90, 90, 90, 255]));
        let output = VignetteConfig::new()
            .with_intensity(1.0)
            .with_radius(200.0)
            .apply(image.clone())
            .unwrap();
        assert_eq!(output, image);
    }
}
