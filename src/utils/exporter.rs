use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use crate::error::{PainterError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    PNG,
    JPEG,
}

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::PNG => "PNG",
            ExportFormat::JPEG => "JPEG",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::PNG => "png",
            ExportFormat::JPEG => "jpg",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ExportFormat::PNG => ImageFormat::Png,
            ExportFormat::JPEG => ImageFormat::Jpeg,
        }
    }

    /// Pick a format from a file extension, defaulting to PNG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "jpg" || ext == "jpeg" => ExportFormat::JPEG,
            _ => ExportFormat::PNG,
        }
    }
}

/// Suggested file name for a save, e.g. `my-drawing-20260118-154501.png`.
pub fn default_file_name(format: ExportFormat) -> String {
    format!(
        "my-drawing-{}.{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Write a flattened canvas to disk. JPEG has no alpha, so the image is flattened to
/// RGB first (the composite is already opaque).
pub fn save_flattened(img: &RgbaImage, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::PNG => img.save_with_format(path, format.image_format())?,
        ExportFormat::JPEG => {
            let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            rgb.save_with_format(path, format.image_format())?
        }
    }
    log::info!("saved {}", path.display());
    Ok(())
}

/// In-memory PNG encoding used by history snapshots.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage> {
    if bytes.is_empty() {
        return Err(PainterError::Image(image::ImageError::IoError(
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "empty snapshot data"),
        )));
    }
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_bytes_decode_back_to_the_same_pixels() {
        let mut img = RgbaImage::new(4, 3);
        img.put_pixel(1, 2, image::Rgba([10, 20, 30, 128]));
        let decoded = decode_png(&encode_png(&img).unwrap()).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn empty_bytes_are_an_error() {
        assert!(decode_png(&[]).is_err());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.JPG")), ExportFormat::JPEG);
        assert_eq!(ExportFormat::from_path(Path::new("a")), ExportFormat::PNG);
    }
}
