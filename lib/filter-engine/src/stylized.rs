use crate::Effect;
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

const CELL_SEED: u64 = 0x1f5e_ed00;

/// Edge detection configuration
///
/// Per-channel Sobel gradient magnitude, scaled by `intensity`.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct EdgesConfig {
    #[derivative(Default(value = "1.0"))]
    intensity: f32,
}

impl EdgesConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for EdgesConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let (width, height) = (image.width(), image.height());
        let intensity = self.intensity.max(0.0);
        let mut result = image.clone();

        let sobel_x: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
        let sobel_y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];
        let max_x = width as i32 - 1;
        let max_y = height as i32 - 1;

        result
            .par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let mut gx = [0i32; 3];
                    let mut gy = [0i32; 3];

                    for ky in -1i32..=1 {
                        for kx in -1i32..=1 {
                            let px = (x as i32 + kx).clamp(0, max_x) as u32;
                            let py = (y as i32 + ky).clamp(0, max_y) as u32;
                            let sample = image.get_pixel(px, py);
                            let ki = ((ky + 1) * 3 + (kx + 1)) as usize;

                            for c in 0..3 {
                                gx[c] += sample[c] as i32 * sobel_x[ki];
                                gy[c] += sample[c] as i32 * sobel_y[ki];
                            }
                        }
                    }

                    for c in 0..3 {
                        let magnitude = ((gx[c] * gx[c] + gy[c] * gy[c]) as f32).sqrt();
                        pixel[c] = (magnitude * intensity).round().clamp(0.0, 255.0) as u8;
                    }
                }
            });

        Some(result)
    }
}

/// Pixellate configuration
///
/// Replaces each `scale`-sized square block with its average colour.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct PixellateConfig {
    #[derivative(Default(value = "8.0"))]
    scale: f32,
}

impl PixellateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_size(&self) -> u32 {
        cell_size(self.scale)
    }
}

impl Effect for PixellateConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let width = image.width();
        let height = image.height();
        let block_size = self.block_size();
        if block_size == 1 {
            return Some(image);
        }

        let mut result = image.clone();

        for y in (0..height).step_by(block_size as usize) {
            for x in (0..width).step_by(block_size as usize) {
                let mut sum = [0u32; 4];
                let mut count = 0u32;

                let y_end = (y + block_size).min(height);
                let x_end = (x + block_size).min(width);

                for by in y..y_end {
                    for bx in x..x_end {
                        let pixel = image.get_pixel(bx, by);
                        for c in 0..4 {
                            sum[c] += pixel[c] as u32;
                        }
                        count += 1;
                    }
                }

                let average = sum.map(|s| ((s + count / 2) / count) as u8);

                for by in y..y_end {
                    for bx in x..x_end {
                        result.get_pixel_mut(bx, by).0 = average;
                    }
                }
            }
        }

        Some(result)
    }
}

/// Crystallize configuration
///
/// Voronoi cells of roughly `radius` pixels, each filled with the colour
/// found at its seed.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CrystallizeConfig {
    #[derivative(Default(value = "20.0"))]
    radius: f32,
}

impl CrystallizeConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for CrystallizeConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let cell = cell_size(self.radius);
        if cell == 1 {
            return Some(image);
        }

        let cells = CellGrid::new(image.width(), image.height(), cell);
        let mut result = image.clone();

        result
            .par_chunks_mut(image.width() as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let (seed, _) = cells.nearest(x as u32, y as u32);
                    pixel.copy_from_slice(&image.get_pixel(seed.0, seed.1).0);
                }
            });

        Some(result)
    }
}

/// Pointillize configuration
///
/// Paints one disc per cell in the colour at the cell's seed over a white
/// background.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct PointillizeConfig {
    #[derivative(Default(value = "20.0"))]
    radius: f32,
}

impl PointillizeConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for PointillizeConfig {
    fn apply(&self, image: RgbaImage) -> Option<RgbaImage> {
        let cell = cell_size(self.radius);
        if cell == 1 {
            return Some(image);
        }

        let cells = CellGrid::new(image.width(), image.height(), cell);
        let dot_radius_sq = (cell as f32 * 0.5).powi(2);
        let mut result = image.clone();

        result
            .par_chunks_mut(image.width() as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let (seed, distance_sq) = cells.nearest(x as u32, y as u32);
                    if distance_sq as f32 <= dot_radius_sq {
                        pixel.copy_from_slice(&image.get_pixel(seed.0, seed.1).0);
                    } else {
                        pixel[..3].fill(255);
                    }
                }
            });

        Some(result)
    }
}

fn cell_size(value: f32) -> u32 {
    if value.is_finite() {
        value.round().max(1.0) as u32
    } else {
        1
    }
}

/// One jittered seed per `cell`-sized grid square. Seeds are reproducible for
/// a given cell size.
struct CellGrid {
    cell: u32,
    columns: u32,
    rows: u32,
    seeds: Vec<(u32, u32)>,
}

impl CellGrid {
    fn new(width: u32, height: u32, cell: u32) -> Self {
        let columns = width.div_ceil(cell);
        let rows = height.div_ceil(cell);
        let mut rng = StdRng::seed_from_u64(CELL_SEED ^ cell as u64);

        let mut seeds = Vec::with_capacity((columns * rows) as usize);
        for gy in 0..rows {
            for gx in 0..columns {
                let x = (gx * cell + rng.random_range(0..cell)).min(width - 1);
                let y = (gy * cell + rng.random_range(0..cell)).min(height - 1);
                seeds.push((x, y));
            }
        }

        Self {
            cell,
            columns,
            rows,
            seeds,
        }
    }

    /// Closest seed to `(x, y)` and its squared distance.
    fn nearest(&self, x: u32, y: u32) -> ((u32, u32), u64) {
        let gx = (x / self.cell) as i64;
        let gy = (y / self.cell) as i64;
        let mut best = (self.seeds[(gy * self.columns as i64 + gx) as usize], u64::MAX);

        for ny in (gy - 1).max(0)..=(gy + 1).min(self.rows as i64 - 1) {
            for nx in (gx - 1).max(0)..=(gx + 1).min(self.columns as i64 - 1) {
                let seed = self.seeds[(ny * self.columns as i64 + nx) as usize];
                let dx = seed.0 as i64 - x as i64;
                let dy = seed.1 as i64 - y as i64;
                let distance_sq = (dx * dx + dy * dy) as u64;
                if distance_sq < best.1 {
                    best = (seed, distance_sq);
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 255 / width) as u8, (y * 255 / height) as u8, 128, 255])
        })
    }

    #[test]
    fn test_edges_flat_image_is_black() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([120, 40, 200, 255]));
        let output = EdgesConfig::new().apply(image).unwrap();
        assert!(output.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_edges_detects_step() {
        let image = RgbaImage::from_fn(10, 4, |x, _| {
            if x < 5 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        });
        let output = EdgesConfig::new().with_intensity(0.5).apply(image).unwrap();
        assert_eq!(output.get_pixel(5, 2)[0], 255);
        assert_eq!(output.get_pixel(0, 2)[0], 0);
    }

    #[test]
    fn test_edges_zero_intensity_is_black() {
        let output = EdgesConfig::new().with_intensity(0.0).apply(gradient(8, 8)).unwrap();
        assert!(output.pixels().all(|p| p[0] == 0 && p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn test_pixellate_blocks_are_uniform() {
        let output = PixellateConfig::new().with_scale(4.0).apply(gradient(16, 16)).unwrap();
        let first = *output.get_pixel(0, 0);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(*output.get_pixel(x, y), first);
            }
        }
        assert_ne!(*output.get_pixel(12, 12), first);
    }

    #[test]
    fn test_pixellate_scale_below_one_is_identity() {
        let image = gradient(9, 9);
        let output = PixellateConfig::new().with_scale(0.0).apply(image.clone()).unwrap();
        assert_eq!(output, image);
    }

    #[test]
    fn test_pixellate_handles_partial_blocks() {
        let output = PixellateConfig::new().with_scale(4.0).apply(gradient(10, 7)).unwrap();
        assert_eq!(output.dimensions(), (10, 7));
    }

    #[test]
    fn test_crystallize_is_deterministic() {
        let config = CrystallizeConfig::new().with_radius(6.0);
        let a = config.apply(gradient(30, 20)).unwrap();
        let b = config.apply(gradient(30, 20)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_crystallize_only_uses_source_colours() {
        let image = gradient(24, 24);
        let output = CrystallizeConfig::new().with_radius(5.0).apply(image.clone()).unwrap();
        for pixel in output.pixels() {
            assert!(image.pixels().any(|p| p == pixel));
        }
    }

    #[test]
    fn test_pointillize_leaves_white_gaps() {
        let image = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
        let output = PointillizeConfig::new().with_radius(10.0).apply(image).unwrap();
        assert!(output.pixels().any(|p| p.0 == [255, 255, 255, 255]));
        assert!(output.pixels().any(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_cell_grid_seed_lies_in_image() {
        let grid = CellGrid::new(7, 5, 4);
        assert_eq!(grid.seeds.len(), 4);
        assert!(grid.seeds.iter().all(|(x, y)| *x < 7 && *y < 5));
    }
}
