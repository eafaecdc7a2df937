//! Figures: a render window, a scene, an interactor and the plots drawn in it.

use std::path::Path;
use std::sync::{Arc, Weak};

use glam::DVec3;
use ndarray::Array3;
use parking_lot::{Mutex, MutexGuard};
use vplot_core::{ColorInput, PlotConfig, PlotError, PlotResult, process_color};
use vplot_renderer::{Actor, ActorId, Camera, Frame, ImageFormat, RenderWindow, Scene, write_image};

use crate::interactor::{Interactor, InteractorChoice};
use crate::plot::{Plot, PlotId, PlotKind};
use crate::registry;

/// Where a figure is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, never shown
    New,
    /// Shown at least once; an event loop may be running
    Started,
    /// A blocking `show` has returned
    Stopped,
    /// Closed; every further operation fails
    Closed,
}

/// A plot owned by a figure
#[derive(Debug, Clone)]
pub(crate) struct PlotEntry {
    pub id: PlotId,
    pub actor: ActorId,
    pub kind: PlotKind,
    pub name: Option<String>,
    pub label: Option<String>,
}

pub(crate) type RedrawHook = Arc<dyn Fn() + Send + Sync>;

pub(crate) struct FigureState {
    pub name: String,
    pub scene: Scene,
    pub window: RenderWindow,
    pub interactor: Option<Box<dyn Interactor>>,
    pub interactor_name: &'static str,
    pub plots: Vec<PlotEntry>,
    /// Plots removed from the scene, kept so they can be added back
    pub detached: Vec<(PlotEntry, Actor)>,
    pub lifecycle: Lifecycle,
    pub initialized: bool,
    /// The camera was placed by `view` or `reset_camera`
    pub camera_placed: bool,
    /// Set while an event loop that redraws on request is running
    pub redraw: Option<RedrawHook>,
}

impl FigureState {
    pub fn ensure_open(&self) -> PlotResult<()> {
        if self.lifecycle == Lifecycle::Closed {
            Err(PlotError::FigureClosed(self.name.clone()))
        } else {
            Ok(())
        }
    }

    pub fn render(&mut self) -> PlotResult<&Frame> {
        self.window.render(&mut self.scene)
    }

    pub fn entry(&self, id: PlotId) -> Option<&PlotEntry> {
        self.plots
            .iter()
            .chain(self.detached.iter().map(|(e, _)| e))
            .find(|e| e.id == id)
    }

    pub fn entry_mut(&mut self, id: PlotId) -> Option<&mut PlotEntry> {
        self.plots
            .iter_mut()
            .chain(self.detached.iter_mut().map(|(e, _)| e))
            .find(|e| e.id == id)
    }

    /// Find a plot's actor, attached or detached.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.scene.actor(id).or_else(|| {
            self.detached
                .iter()
                .map(|(_, a)| a)
                .find(|a| a.id() == id)
        })
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        if self.scene.contains(id) {
            return self.scene.actor_mut(id);
        }
        self.detached
            .iter_mut()
            .map(|(_, a)| a)
            .find(|a| a.id() == id)
    }

    pub fn request_redraw(&self) {
        if let Some(redraw) = &self.redraw {
            redraw();
        }
    }
}

pub(crate) type WeakFigureState = Weak<Mutex<FigureState>>;

/// Non-owning figure handle
#[derive(Clone)]
pub(crate) struct WeakFigure(WeakFigureState);

impl WeakFigure {
    pub fn upgrade(&self) -> Option<Figure> {
        self.0.upgrade().map(|inner| Figure { inner })
    }
}

/// Camera parameters to change in [`Figure::view`]; unset fields are kept
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct View {
    pub focal_point: Option<DVec3>,
    pub camera_position: Option<DVec3>,
    /// Direction the camera looks in; ignored when a position is given
    pub camera_direction: Option<DVec3>,
    pub up_view: Option<DVec3>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focal_point(mut self, p: impl Into<DVec3>) -> Self {
        self.focal_point = Some(p.into());
        self
    }

    pub fn camera_position(mut self, p: impl Into<DVec3>) -> Self {
        self.camera_position = Some(p.into());
        self
    }

    pub fn camera_direction(mut self, d: impl Into<DVec3>) -> Self {
        self.camera_direction = Some(d.into());
        self
    }

    pub fn up_view(mut self, up: impl Into<DVec3>) -> Self {
        self.up_view = Some(up.into());
        self
    }
}

/// The camera after [`Figure::view`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub focal_point: DVec3,
    pub camera_position: DVec3,
    pub up_view: DVec3,
}

/// Builder for figures
#[derive(Debug, Clone, Default)]
pub struct FigureBuilder {
    name: Option<String>,
    size: Option<[u32; 2]>,
    background: Option<ColorInput>,
    interactor: InteractorChoice,
}

impl FigureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some([width, height]);
        self
    }

    pub fn background(mut self, color: impl Into<ColorInput>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn interactor(mut self, choice: InteractorChoice) -> Self {
        self.interactor = choice;
        self
    }

    /// Never open a window; `show` renders once and returns.
    pub fn headless(self) -> Self {
        self.interactor(InteractorChoice::Headless)
    }

    /// Painted by a host widget instead of a window of its own.
    pub fn embedded(self) -> Self {
        self.interactor(InteractorChoice::Embedded)
    }

    /// Create the figure and record it in the figure history. It becomes
    /// the current figure if there is none.
    pub fn build(self) -> PlotResult<Figure> {
        let config = PlotConfig::global();
        let background = match &self.background {
            Some(color) => process_color(Some(color))?,
            None => process_color(Some(&ColorInput::from(config.window.background.as_str())))?,
        };
        let interactor = self.interactor.create()?;

        let name = self.name.unwrap_or_else(|| config.window.name.clone());
        let [width, height] = self.size.unwrap_or([config.window.width, config.window.height]);

        let mut scene = Scene::new();
        let (rgb, alpha) = background.or([1.0, 1.0, 1.0], 1.0);
        scene.set_background(rgb);
        scene.set_background_alpha(alpha);

        let figure = Figure {
            inner: Arc::new(Mutex::new(FigureState {
                window: RenderWindow::new(width, height, name.clone()),
                name,
                scene,
                interactor_name: interactor.name(),
                interactor: Some(interactor),
                plots: Vec::new(),
                detached: Vec::new(),
                lifecycle: Lifecycle::New,
                initialized: false,
                camera_placed: false,
                redraw: None,
            })),
        };
        tracing::debug!(
            "Created figure '{}' ({}x{}, {} interactor)",
            figure.name(),
            width,
            height,
            figure.lock().interactor_name
        );
        registry::register(&figure);
        Ok(figure)
    }
}

/// A figure: window, scene and the plots drawn in it.
///
/// `Figure` is a shared handle; clones refer to the same figure and compare
/// equal.
#[derive(Clone)]
pub struct Figure {
    inner: Arc<Mutex<FigureState>>,
}

impl PartialEq for Figure {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Figure {}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Figure")
            .field("name", &state.name)
            .field("lifecycle", &state.lifecycle)
            .field("plots", &state.plots.len())
            .finish()
    }
}

impl Figure {
    /// Create a figure with the configured defaults. See [`FigureBuilder::build`].
    pub fn new() -> PlotResult<Figure> {
        FigureBuilder::new().build()
    }

    pub fn builder() -> FigureBuilder {
        FigureBuilder::new()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, FigureState> {
        self.inner.lock()
    }

    pub(crate) fn downgrade(&self) -> WeakFigure {
        WeakFigure(Arc::downgrade(&self.inner))
    }

    pub(crate) fn weak_state(&self) -> WeakFigureState {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn from_state(inner: Arc<Mutex<FigureState>>) -> Figure {
        Figure { inner }
    }

    /// Lock an open figure.
    pub(crate) fn open(&self) -> PlotResult<MutexGuard<'_, FigureState>> {
        let state = self.lock();
        state.ensure_open()?;
        Ok(state)
    }

    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock().lifecycle
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle() == Lifecycle::Closed
    }

    /// Name of the interactor driving this figure
    pub fn interactor_name(&self) -> &'static str {
        self.lock().interactor_name
    }

    /// Plots in insertion order
    pub fn plots(&self) -> Vec<Plot> {
        let state = self.lock();
        state
            .plots
            .iter()
            .map(|e| Plot::from_entry(e, self.weak_state()))
            .collect()
    }

    /// Number of actors in the scene
    pub fn actor_count(&self) -> usize {
        self.lock().scene.len()
    }

    pub fn contains_actor(&self, id: ActorId) -> bool {
        self.lock().scene.contains(id)
    }

    /// Register a new actor as a plot of this figure.
    pub(crate) fn attach(
        &self,
        actor: Actor,
        kind: PlotKind,
        name: Option<String>,
        label: Option<String>,
    ) -> PlotResult<Plot> {
        let mut state = self.open()?;
        let entry = PlotEntry {
            id: PlotId::new(),
            actor: actor.id(),
            kind,
            name,
            label,
        };
        state.scene.add_actor(actor);
        state.plots.push(entry.clone());
        state.request_redraw();
        tracing::debug!("Attached {} plot to figure '{}'", kind.name(), state.name);
        Ok(Plot::from_entry(&entry, self.weak_state()))
    }

    /// Add a plot removed earlier back into this figure. Returns whether
    /// anything changed; plots of other figures are left alone.
    pub fn add_plot(&self, plot: &Plot) -> PlotResult<bool> {
        if plot.fig().as_ref() != Some(self) {
            tracing::warn!("add_plot: plot belongs to another figure");
            return Ok(false);
        }
        let mut state = self.open()?;
        let Some(index) = state.detached.iter().position(|(e, _)| e.id == plot.id()) else {
            return Ok(false);
        };
        let (entry, actor) = state.detached.remove(index);
        state.scene.add_actor(actor);
        state.plots.push(entry);
        state.request_redraw();
        Ok(true)
    }

    /// Remove a plot and its actor from the scene. Returns whether anything
    /// changed.
    pub fn remove_plot(&self, plot: &Plot) -> PlotResult<bool> {
        let mut state = self.open()?;
        let Some(index) = state.plots.iter().position(|e| e.id == plot.id()) else {
            return Ok(false);
        };
        let entry = state.plots.remove(index);
        match state.scene.remove_actor(entry.actor) {
            Some(actor) => state.detached.push((entry, actor)),
            None => state.scene.report_error("plot had no actor in the scene"),
        }
        state.request_redraw();
        tracing::debug!("Removed {} plot from figure '{}'", plot.kind().name(), state.name);
        Ok(true)
    }

    /// Request a redraw. Inside a running event loop the redraw is
    /// scheduled, otherwise the figure renders now.
    pub fn update(&self) -> PlotResult<()> {
        let mut state = self.open()?;
        match &state.redraw {
            Some(redraw) => redraw(),
            None => {
                state.render()?;
            }
        }
        Ok(())
    }

    /// Render once and, if `block`, run the event loop until the window is
    /// closed. A figure that was current stops being current when a
    /// blocking show returns.
    pub fn show(&self, block: bool) -> PlotResult<()> {
        let interactor = {
            let mut state = self.open()?;
            if !state.initialized {
                if let Some(interactor) = state.interactor.as_mut() {
                    interactor.initialize()?;
                }
                // The first show frames whatever was plotted before it,
                // unless the camera was placed explicitly.
                if !state.camera_placed && state.scene.len() > 0 {
                    state.scene.reset_camera();
                }
                state.initialized = true;
            }
            let title = state.name.clone();
            state.window.set_title(title);
            state.render()?;
            state.lifecycle = Lifecycle::Started;
            if !block {
                return Ok(());
            }
            state.interactor.take()
        };

        let Some(mut interactor) = interactor else {
            return Err(PlotError::Backend(format!(
                "figure '{}' is already running an event loop",
                self.name()
            )));
        };

        tracing::debug!("Starting {} event loop for '{}'", interactor.name(), self.name());
        let result = interactor.start(self);

        {
            let mut state = self.lock();
            if state.lifecycle == Lifecycle::Closed {
                interactor.terminate();
            } else {
                state.lifecycle = Lifecycle::Stopped;
                state.interactor = Some(interactor);
            }
        }
        registry::release_current(self);
        result
    }

    /// Frame every visible plot.
    pub fn reset_camera(&self) -> PlotResult<()> {
        let mut state = self.open()?;
        state.scene.reset_camera();
        state.camera_placed = true;
        state.request_redraw();
        Ok(())
    }

    /// Close the figure. Idempotent.
    ///
    /// Plots are detached first, then the interactor, the render window and
    /// the scene are released in that order.
    pub fn close(&self) {
        {
            let mut state = self.lock();
            if state.lifecycle == Lifecycle::Closed {
                return;
            }
            state.lifecycle = Lifecycle::Closed;
            state.plots.clear();
            state.detached.clear();
            if let Some(mut interactor) = state.interactor.take() {
                interactor.terminate();
            }
            state.window.finalize();
            state.scene.clear();
            // Wake a running loop so it notices the close.
            state.request_redraw();
            state.redraw = None;
            tracing::debug!("Closed figure '{}'", state.name);
        }
        registry::release_current(self);
    }

    pub fn background_color(&self) -> PlotResult<[f64; 3]> {
        Ok(self.open()?.scene.background())
    }

    /// Set the background from any color input; an RGBA value also sets the
    /// background alpha.
    pub fn set_background_color(&self, color: impl Into<ColorInput>) -> PlotResult<()> {
        let spec = process_color(Some(&color.into()))?;
        let mut state = self.open()?;
        if let Some(rgb) = spec.rgb {
            state.scene.set_background(rgb);
        }
        if let Some(alpha) = spec.alpha {
            state.scene.set_background_alpha(alpha);
        }
        state.request_redraw();
        Ok(())
    }

    /// A copy of the active camera
    pub fn camera(&self) -> PlotResult<Camera> {
        Ok(self.open()?.scene.camera().clone())
    }

    /// Change any subset of the camera parameters and return the result.
    ///
    /// A new focal point alone moves the camera with it. A direction alone
    /// keeps the current distance to the focal point.
    pub fn view(&self, view: View) -> PlotResult<ViewState> {
        let mut state = self.open()?;
        let camera = state.scene.camera_mut();
        let (old_focal, old_position) = (camera.focal_point(), camera.position());
        let focal = view.focal_point.unwrap_or(old_focal);

        let position = match (view.camera_position, view.camera_direction) {
            (Some(position), _) => position,
            (None, Some(direction)) => {
                let direction = vplot_core::normalise(direction)?;
                focal - direction * old_position.distance(old_focal).max(1e-9)
            }
            (None, None) => focal + (old_position - old_focal),
        };

        camera.set_focal_point(focal);
        camera.set_position(position);
        if let Some(up) = view.up_view {
            camera.set_view_up(up);
        }
        let result = ViewState {
            focal_point: camera.focal_point(),
            camera_position: camera.position(),
            up_view: camera.view_up(),
        };
        state.camera_placed = true;
        state.request_redraw();
        Ok(result)
    }

    pub(crate) fn with_camera_mut<R>(&self, f: impl FnOnce(&mut Camera) -> R) -> PlotResult<R> {
        let mut state = self.open()?;
        let result = f(state.scene.camera_mut());
        state.request_redraw();
        Ok(result)
    }

    /// Render surface size in pixels
    pub fn render_size(&self) -> [u32; 2] {
        self.lock().window.size()
    }

    pub fn set_render_size(&self, width: u32, height: u32) -> PlotResult<()> {
        let mut state = self.open()?;
        state.window.set_size(width, height);
        state.scene.mark_dirty();
        state.request_redraw();
        Ok(())
    }

    pub fn window_name(&self) -> String {
        self.name()
    }

    pub fn set_window_name(&self, name: impl Into<String>) -> PlotResult<()> {
        let mut state = self.open()?;
        let name = name.into();
        state.window.set_title(name.clone());
        state.name = name;
        Ok(())
    }

    /// Completed renders of the figure's window
    pub fn render_count(&self) -> u64 {
        self.lock().window.render_count()
    }

    /// Render offscreen at `scale` times the window size.
    pub fn capture(&self, scale: u32) -> PlotResult<Frame> {
        let state = self.open()?;
        state.window.capture(&state.scene, scale)
    }

    /// The rendered pixels as an `(H, W, 4)` array, origin top-left.
    pub fn screenshot(&self, scale: u32) -> PlotResult<Array3<u8>> {
        Ok(self.capture(scale)?.to_array())
    }

    /// Write a screenshot. `.png` and `.jpg`/`.jpeg` are supported.
    pub fn save(&self, path: impl AsRef<Path>, scale: u32) -> PlotResult<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        if !format.is_writable() {
            return Err(PlotError::UnsupportedFormat(format!("{format:?}")));
        }
        let frame = self.capture(scale)?;
        write_image(path, frame.image())
    }

    /// Pan the camera so the visible contents are centred, then shrink the
    /// render surface to their pixel extent plus `padding` on each side.
    /// Plots in `exclude` are ignored when measuring.
    pub fn zoom_to_contents(&self, padding: u32, exclude: &[&Plot]) -> PlotResult<()> {
        let mut state = self.open()?;
        let excluded: Vec<ActorId> = exclude.iter().map(|p| p.actor_id()).collect();
        let hidden: Vec<ActorId> = state
            .scene
            .actors()
            .filter(|a| a.visible && excluded.contains(&a.id()))
            .map(|a| a.id())
            .collect();
        for id in &hidden {
            if let Some(actor) = state.scene.actor_mut(*id) {
                actor.visible = false;
            }
        }
        let frame = state.window.capture(&state.scene, 1);
        for id in &hidden {
            if let Some(actor) = state.scene.actor_mut(*id) {
                actor.visible = true;
            }
        }
        let frame = frame?;

        let background = frame.image().get_pixel(0, 0).0;
        let Some([x0, y0, x1, y1]) = content_extent(&frame, background) else {
            tracing::warn!("zoom_to_contents: nothing visible to zoom to");
            return Ok(());
        };

        let [width, height] = state.window.size();
        let camera = state.scene.camera_mut();
        let (half_w, half_h) = camera.half_extent(width as f64 / height as f64);
        let centre_x = (x0 + x1) as f64 / 2.0 - width as f64 / 2.0;
        let centre_y = (y0 + y1) as f64 / 2.0 - height as f64 / 2.0;
        let offset = camera.right() * (centre_x / width as f64 * 2.0 * half_w)
            - camera.orthogonal_view_up() * (centre_y / height as f64 * 2.0 * half_h);
        camera.translate(offset);

        let new_width = (x1 - x0) + 2 * padding;
        let new_height = (y1 - y0) + 2 * padding;
        // The view angle spans the height, so keep the vertical scale.
        let scale = new_height as f64 / height as f64;
        let angle = camera.view_angle().to_radians();
        camera.set_view_angle((2.0 * ((angle / 2.0).tan() * scale).atan()).to_degrees());
        state.window.set_size(new_width, new_height);
        state.request_redraw();
        tracing::debug!("zoom_to_contents: render size now {}x{}", new_width, new_height);
        Ok(())
    }
}

/// Pixel bounds `[x0, y0, x1, y1)` of everything that differs from `background`.
fn content_extent(frame: &Frame, background: [u8; 4]) -> Option<[u32; 4]> {
    let mut extent: Option<[u32; 4]> = None;
    for (x, y, pixel) in frame.image().enumerate_pixels() {
        if pixel.0 == background {
            continue;
        }
        extent = Some(match extent {
            None => [x, y, x + 1, y + 1],
            Some([x0, y0, x1, y1]) => [x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)],
        });
    }
    extent
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::plot::PlotBuilder;

    fn headless() -> Figure {
        FigureBuilder::new().headless().size(64, 48).build().unwrap()
    }

    #[test]
    fn test_defaults_from_config() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let config = PlotConfig::global();
        assert_eq!(fig.render_size(), [config.window.width, config.window.height]);
        assert_eq!(fig.name(), config.window.name);
        assert_eq!(fig.lifecycle(), Lifecycle::New);
    }

    #[test]
    fn test_background_routes_through_color_resolver() {
        let fig = headless();
        fig.set_background_color("red").unwrap();
        assert_eq!(fig.background_color().unwrap(), [1.0, 0.0, 0.0]);
        assert!(matches!(
            fig.set_background_color("not a colour"),
            Err(PlotError::UnknownColor(_))
        ));
        assert_eq!(fig.background_color().unwrap(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_show_non_blocking_renders_once() {
        let fig = headless();
        fig.show(false).unwrap();
        assert_eq!(fig.render_count(), 1);
        assert_eq!(fig.lifecycle(), Lifecycle::Started);
    }

    #[test]
    fn test_first_show_keeps_explicit_view() {
        let fig = headless();
        crate::plots::SphereBuilder::new([0.0, 0.0, 0.0])
            .fig(&fig)
            .build()
            .unwrap();
        let placed = fig
            .view(View::new().camera_position(DVec3::new(0.0, -20.0, 3.0)))
            .unwrap();
        fig.show(false).unwrap();
        assert_eq!(fig.camera().unwrap().position(), placed.camera_position);
    }

    #[test]
    fn test_first_show_frames_plots() {
        let fig = headless();
        crate::plots::SphereBuilder::new([10.0, 0.0, 0.0])
            .fig(&fig)
            .build()
            .unwrap();
        fig.show(false).unwrap();
        let focal = fig.camera().unwrap().focal_point();
        assert_relative_eq!(focal.x, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_blocking_show_releases_current() {
        let fig = headless();
        assert_eq!(registry::current(), Some(fig.clone()));
        fig.show(true).unwrap();
        assert_eq!(fig.lifecycle(), Lifecycle::Stopped);
        assert!(registry::current().is_none());
        // Showing again re-enters on the same handles.
        fig.show(true).unwrap();
        assert_eq!(fig.render_count(), 2);
    }

    #[test]
    fn test_closed_figure_is_terminal() {
        let fig = headless();
        fig.close();
        fig.close();
        assert!(fig.is_closed());
        assert!(matches!(fig.show(false), Err(PlotError::FigureClosed(_))));
        assert!(matches!(fig.update(), Err(PlotError::FigureClosed(_))));
        assert!(matches!(fig.background_color(), Err(PlotError::FigureClosed(_))));
    }

    #[test]
    fn test_view_sets_subsets() {
        let fig = headless();
        let state = fig
            .view(View::new().focal_point([1.0, 0.0, 0.0]))
            .unwrap();
        // Camera moved with the focal point.
        assert_eq!(state.focal_point, DVec3::X);
        assert_eq!(state.camera_position, DVec3::new(1.0, 0.0, 1.0));

        let state = fig
            .view(View::new().camera_direction([0.0, -1.0, 0.0]).up_view([0.0, 0.0, 1.0]))
            .unwrap();
        assert_relative_eq!(state.camera_position.y, 1.0, epsilon = 1e-12);
        assert_eq!(state.up_view, DVec3::Z);

        assert!(fig.view(View::new().camera_direction([0.0, 0.0, 0.0])).is_err());
    }

    #[test]
    fn test_screenshot_shape_and_scale() {
        let fig = headless();
        let pixels = fig.screenshot(2).unwrap();
        assert_eq!(pixels.shape(), &[96, 128, 4]);
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let fig = headless();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            fig.save(dir.path().join("out.gif"), 1),
            Err(PlotError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            fig.save(dir.path().join("out.tiff"), 1),
            Err(PlotError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_window_name() {
        let fig = headless();
        fig.set_window_name("density").unwrap();
        assert_eq!(fig.window_name(), "density");
    }
}
