//! Image file output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context, Result};
use hybrid_rt_render::Framebuffer;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// RGBA PNG.
    Png,
    /// Binary RGB pixmap (P6), alpha dropped.
    Ppm,
}

impl ImageKind {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "png" => Ok(ImageKind::Png),
            "ppm" => Ok(ImageKind::Ppm),
            _ => bail!("unknown output format {:?} (expected .png or .ppm)", ext),
        }
    }
}

/// Encode `frame` to `path` in the format its extension names.
pub fn write_image(path: &Path, frame: Framebuffer) -> Result<()> {
    match ImageKind::from_path(path)? {
        ImageKind::Png => {
            let (width, height) = (frame.width(), frame.height());
            let image = RgbaImage::from_raw(width, height, frame.into_rgba8())
                .context("framebuffer size does not match its dimensions")?;
            image
                .save_with_format(path, ImageFormat::Png)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        ImageKind::Ppm => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            PnmEncoder::new(BufWriter::new(file))
                .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
                .write_image(
                    &frame.to_rgb8(),
                    frame.width(),
                    frame.height(),
                    ExtendedColorType::Rgb8,
                )
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }
    Ok(())
}
