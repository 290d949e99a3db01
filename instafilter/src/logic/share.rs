use crate::config::Export;
use anyhow::{Context, Result, bail};
use filter_pipeline::{FilterKind, RenderedImage};
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::{fs, path::Path, path::PathBuf};

/// `<output_dir>/<stem>-<filter>.<format>`
pub fn default_output_path(input: &Path, kind: FilterKind, export: &Export) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or("image".into());

    export
        .output_dir
        .join(format!("{stem}-{}.{}", kind.slug(), export.format))
}

/// Saves the rendered image, choosing the encoder from the file extension.
pub fn export(image: &RenderedImage, path: &Path) -> Result<()> {
    let format = match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
        _ => bail!("unsupported export format: {}", path.display()),
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {} failed", dir.display()))?;
    }

    let result = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(image.image().clone())
            .to_rgb8()
            .save_with_format(path, format),
        _ => image.image().save_with_format(path, format),
    };
    result.with_context(|| format!("save {} failed", path.display()))?;

    debug!(
        "exported {} {:?} to {}",
        image.filter(),
        image.dimensions(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter_pipeline::{FilterPipeline, SourceImage};
    use image::{Rgba, RgbaImage};

    fn rendered(width: u32, height: u32) -> RenderedImage {
        let mut pipeline = FilterPipeline::new();
        pipeline.set_source_image(SourceImage::new(RgbaImage::from_pixel(
            width,
            height,
            Rgba([200, 40, 40, 255]),
        )));
        pipeline.render().cloned().unwrap()
    }

    #[test]
    fn test_default_output_path() {
        let export = Export {
            output_dir: PathBuf::from("/tmp/out"),
            format: "jpg".to_string(),
        };

        assert_eq!(
            default_output_path(Path::new("/photos/beach.heic"), FilterKind::Vignette, &export),
            PathBuf::from("/tmp/out/beach-vignette.jpg")
        );
        assert_eq!(
            default_output_path(Path::new(""), FilterKind::SepiaTone, &Export::default()),
            PathBuf::from("./image-sepia-tone.png")
        );
    }

    #[test]
    fn test_export_png_and_jpeg() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let picture = rendered(10, 6);

        let png = dir.path().join("a").join("out.png");
        export(&picture, &png)?;
        assert_eq!(image::open(&png)?.to_rgba8(), *picture.image());

        let jpeg = dir.path().join("out.jpeg");
        export(&picture, &jpeg)?;
        let decoded = image::open(&jpeg)?;
        assert_eq!((decoded.width(), decoded.height()), (10, 6));
        Ok(())
    }

    #[test]
    fn test_export_rejects_unknown_extension() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(export(&rendered(2, 2), &dir.path().join("out.bmp")).is_err());
        assert!(export(&rendered(2, 2), &dir.path().join("out")).is_err());
        Ok(())
    }
}
