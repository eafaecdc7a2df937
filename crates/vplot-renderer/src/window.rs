//! Render window: the surface a scene is drawn onto.

use image::RgbaImage;
use ndarray::Array3;
use vplot_core::{PlotError, PlotResult};

use crate::observer::{SharedObserver, default_observer};
use crate::overlay::{self, Label};
use crate::raster;
use crate::scene::Scene;

/// One rendered image plus the text to paint over it
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbaImage,
    labels: Vec<Label>,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Pixels as an `(H, W, 4)` array, origin top-left.
    pub fn to_array(&self) -> Array3<u8> {
        let (w, h) = self.image.dimensions();
        Array3::from_shape_vec((h as usize, w as usize, 4), self.image.as_raw().clone())
            .unwrap_or_else(|_| Array3::zeros((h as usize, w as usize, 4)))
    }
}

/// A render surface of a fixed pixel size
pub struct RenderWindow {
    width: u32,
    height: u32,
    title: String,
    finalized: bool,
    observer: SharedObserver,
    last_frame: Option<Frame>,
    render_count: u64,
}

impl RenderWindow {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            title: title.into(),
            finalized: false,
            observer: default_observer(),
            last_frame: None,
            render_count: 0,
        }
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_observer(&mut self, observer: SharedObserver) {
        self.observer = observer;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Release the surface. Idempotent.
    pub fn finalize(&mut self) {
        if !self.finalized {
            tracing::debug!("Finalizing render window '{}'", self.title);
            self.finalized = true;
            self.last_frame = None;
        }
    }

    /// Number of completed renders
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Draw the scene at window size and keep the result as the current frame.
    pub fn render(&mut self, scene: &mut Scene) -> PlotResult<&Frame> {
        let frame = self.draw(scene, 1)?;
        scene.mark_clean();
        self.render_count += 1;
        Ok(self.last_frame.insert(frame))
    }

    /// Draw the scene offscreen at `scale` times the window size.
    pub fn capture(&self, scene: &Scene, scale: u32) -> PlotResult<Frame> {
        self.draw(scene, scale.max(1))
    }

    fn draw(&self, scene: &Scene, scale: u32) -> PlotResult<Frame> {
        if self.finalized {
            let message = format!("render window '{}' has been finalized", self.title);
            self.observer.on_error("render window", &message);
            return Err(PlotError::Backend(message));
        }
        let (Some(width), Some(height)) =
            (self.width.checked_mul(scale), self.height.checked_mul(scale))
        else {
            return Err(PlotError::Backend(format!(
                "{}x{} window scaled by {} overflows the frame size",
                self.width, self.height, scale
            )));
        };
        let image = raster::rasterize(scene, width, height).into_image();
        let labels = overlay::labels(scene, width, height, scale as f64);
        Ok(Frame { image, labels })
    }
}

impl std::fmt::Debug for RenderWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWindow")
            .field("size", &self.size())
            .field("title", &self.title)
            .field("finalized", &self.finalized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_scales_pixels() {
        let window = RenderWindow::new(40, 30, "t");
        let frame = window.capture(&Scene::new(), 2).unwrap();
        assert_eq!((frame.width(), frame.height()), (80, 60));
        assert_eq!(frame.to_array().shape(), &[60, 80, 4]);
    }

    #[test]
    fn test_capture_scale_overflow_is_an_error() {
        let window = RenderWindow::new(70_000, 1, "t");
        assert!(matches!(
            window.capture(&Scene::new(), 70_000),
            Err(PlotError::Backend(_))
        ));
    }

    #[test]
    fn test_render_keeps_frame_and_cleans_scene() {
        let mut window = RenderWindow::new(4, 4, "t");
        let mut scene = Scene::new();
        assert!(scene.is_dirty());
        window.render(&mut scene).unwrap();
        assert!(!scene.is_dirty());
        assert_eq!(window.render_count(), 1);
        assert!(window.last_frame().is_some());
    }

    #[test]
    fn test_finalized_window_refuses_to_render() {
        let mut window = RenderWindow::new(4, 4, "t");
        window.finalize();
        window.finalize();
        assert!(matches!(
            window.render(&mut Scene::new()),
            Err(PlotError::Backend(_))
        ));
    }
}
