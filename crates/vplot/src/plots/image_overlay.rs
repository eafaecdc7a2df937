//! Images pinned to the window.

use std::path::PathBuf;

use glam::DVec2;
use image::{Rgba, RgbaImage};
use ndarray::Array3;
use vplot_core::{PlotError, PlotResult};
use vplot_renderer::{Actor, ActorKind, ImageActor, read_image};

use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions};

/// Pixels for an image overlay
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// `(H, W, C)` with `C` in 1..=4, origin top-left
    Array(Array3<u8>),
    Image(RgbaImage),
    Path(PathBuf),
}

impl From<Array3<u8>> for ImageSource {
    fn from(array: Array3<u8>) -> Self {
        ImageSource::Array(array)
    }
}

impl From<RgbaImage> for ImageSource {
    fn from(image: RgbaImage) -> Self {
        ImageSource::Image(image)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        ImageSource::Path(PathBuf::from(path))
    }
}

impl ImageSource {
    fn into_rgba(self) -> PlotResult<RgbaImage> {
        match self {
            ImageSource::Image(image) => Ok(image),
            ImageSource::Array(array) => array_to_rgba(&array),
            ImageSource::Path(path) => array_to_rgba(&read_image(path)?),
        }
    }
}

fn array_to_rgba(array: &Array3<u8>) -> PlotResult<RgbaImage> {
    let (h, w, c) = array.dim();
    if !(1..=4).contains(&c) {
        return Err(PlotError::shape("image", array.shape(), "(H, W, 1..=4)"));
    }
    Ok(RgbaImage::from_fn(w as u32, h as u32, |x, y| {
        let px = |k: usize| array[[y as usize, x as usize, k]];
        match c {
            1 => Rgba([px(0), px(0), px(0), 255]),
            2 => Rgba([px(0), px(0), px(0), px(1)]),
            3 => Rgba([px(0), px(1), px(2), 255]),
            _ => Rgba([px(0), px(1), px(2), px(3)]),
        }
    }))
}

#[derive(Debug, Clone)]
pub struct ImageOverlay {
    plot: Plot,
}

plot_handle!(ImageOverlay);

impl ImageOverlay {
    /// `(width, height)` in pixels
    pub fn dimensions(&self) -> PlotResult<(u32, u32)> {
        self.with_actor(|a| match &a.kind {
            ActorKind::Image(image) => Ok(image.image.dimensions()),
            _ => Err(PlotError::PlotRemoved),
        })?
    }

    pub fn set_position(&self, position: impl Into<DVec2>) -> PlotResult<()> {
        let position = position.into();
        self.with_actor_mut(|a| {
            if let ActorKind::Image(image) = &mut a.kind {
                image.position = position;
            }
        })
    }
}

/// An image drawn over the scene, lower-left corner at `position` pixels
#[derive(Debug, Clone)]
pub struct ImageOverlayBuilder {
    source: ImageSource,
    position: DVec2,
    options: PlotOptions,
}

impl ImageOverlayBuilder {
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            source: source.into(),
            position: DVec2::ZERO,
            options: PlotOptions::default(),
        }
    }

    pub fn position(mut self, position: impl Into<DVec2>) -> Self {
        self.position = position.into();
        self
    }
}

impl PlotBuilder for ImageOverlayBuilder {
    type Output = ImageOverlay;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<ImageOverlay> {
        let image = self.source.into_rgba()?;
        let figure = self.options.figure()?;
        let mut actor = Actor::new(ActorKind::Image(ImageActor {
            image,
            position: self.position,
        }));
        if let Some(opacity) = self.options.opacity {
            actor = actor.with_opacity(opacity);
        }
        let plot = self.options.attach(&figure, actor, PlotKind::ImageOverlay)?;
        Ok(ImageOverlay { plot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureBuilder;

    #[test]
    fn test_grey_array_expands() {
        let array = Array3::from_elem((2, 3, 1), 7u8);
        let image = array_to_rgba(&array).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [7, 7, 7, 255]);
        assert!(array_to_rgba(&Array3::zeros((2, 2, 5))).is_err());
    }

    #[test]
    fn test_overlay_is_drawn() {
        let fig = FigureBuilder::new().headless().size(20, 20).build().unwrap();
        let red = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let overlay = ImageOverlayBuilder::new(red).position([0.0, 0.0]).fig(&fig).build().unwrap();
        assert_eq!(overlay.dimensions().unwrap(), (4, 4));
        let pixels = fig.screenshot(1).unwrap();
        // Lower-left corner of the window is the last row.
        assert_eq!(pixels[[19, 0, 0]], 255);
        assert_eq!(pixels[[19, 0, 1]], 0);
    }

    #[test]
    fn test_overlay_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        RgbaImage::from_pixel(5, 3, Rgba([0, 0, 255, 255])).save(&path).unwrap();
        let fig = FigureBuilder::new().headless().build().unwrap();
        let overlay = ImageOverlayBuilder::new(path).fig(&fig).build().unwrap();
        assert_eq!(overlay.dimensions().unwrap(), (5, 3));
    }
}
