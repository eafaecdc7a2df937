//! Screenshot writer and image reader.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use ndarray::Array3;
use vplot_core::{PathHandler, PlotError, PlotResult};

/// Image formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Detect the format from a file extension (`jpg` is read as `jpeg`).
    pub fn from_path(path: &Path) -> PlotResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "bmp" => Ok(ImageFormat::Bmp),
            "tif" | "tiff" => Ok(ImageFormat::Tiff),
            _ => Err(PlotError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                format!(".{ext}")
            })),
        }
    }

    /// Screenshots are written as JPEG or PNG only.
    pub fn is_writable(&self) -> bool {
        matches!(self, ImageFormat::Jpeg | ImageFormat::Png)
    }

    fn codec(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}

/// Write `image` to `path`. JPEG output drops the alpha channel.
pub fn write_image(path: impl AsRef<Path>, image: &RgbaImage) -> PlotResult<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    if !format.is_writable() {
        return Err(PlotError::UnsupportedFormat(format!(
            "{format:?} is not a screenshot format, use .png or .jpg"
        )));
    }

    let handler = PathHandler::new(path)?;
    let result = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save_with_format(handler.path(), format.codec()),
        _ => image.save_with_format(handler.path(), format.codec()),
    };
    drop(handler);

    result.map_err(|e| PlotError::Image(e.to_string()))?;
    tracing::info!("Wrote {}x{} image to {:?}", image.width(), image.height(), path);
    Ok(())
}

/// Read an image as an `(H, W, C)` array with the origin at the top-left.
///
/// `C` is 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA), following the file.
pub fn read_image(path: impl AsRef<Path>) -> PlotResult<Array3<u8>> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    let handler = PathHandler::new(path)?;
    let decoded = image::ImageReader::open(handler.path())
        .map_err(PlotError::from)
        .and_then(|mut reader| {
            reader.set_format(format.codec());
            reader.decode().map_err(|e| PlotError::Image(e.to_string()))
        });
    drop(handler);
    let decoded = decoded?;

    let (width, height) = (decoded.width() as usize, decoded.height() as usize);
    let (channels, raw) = match decoded.color().channel_count() {
        1 => (1, decoded.into_luma8().into_raw()),
        2 => (2, decoded.into_luma_alpha8().into_raw()),
        3 => (3, decoded.into_rgb8().into_raw()),
        _ => (4, decoded.into_rgba8().into_raw()),
    };
    Array3::from_shape_vec((height, width, channels), raw).map_err(|e| PlotError::Image(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| image::Rgba([x as u8 * 10, y as u8 * 10, 0, 255]))
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_path(Path::new("a.JPG")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("a.tif")).unwrap(), ImageFormat::Tiff);
        assert!(matches!(
            ImageFormat::from_path(Path::new("a.gif")),
            Err(PlotError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_png_round_trip_keeps_orientation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        write_image(&path, &gradient(5, 3)).unwrap();

        let array = read_image(&path).unwrap();
        assert_eq!(array.shape(), &[3, 5, 4]);
        // Row index is y from the top.
        assert_eq!(array[[2, 4, 0]], 40);
        assert_eq!(array[[2, 4, 1]], 20);
    }

    #[test]
    fn test_jpeg_has_three_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.jpeg");
        write_image(&path, &gradient(8, 8)).unwrap();
        assert_eq!(read_image(&path).unwrap().shape(), &[8, 8, 3]);
    }

    #[test]
    fn test_bmp_is_not_a_screenshot_format() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_image(dir.path().join("shot.bmp"), &gradient(2, 2));
        assert!(matches!(result, Err(PlotError::UnsupportedFormat(_))));
    }
}
