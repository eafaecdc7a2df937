//! matplotlib-style free functions.
//!
//! Figure functions act on the current figure of the calling thread. Plot
//! functions return builders; nothing is added until `build()` is called,
//! and the current figure is only resolved then.

use std::path::Path;

use ndarray::Array3;
use vplot_core::{ArrayArg, PlotResult};

use crate::figure::{Figure, FigureBuilder, View, ViewState};
use crate::plot::Plot;
use crate::plots::{
    AnnotateBuilder, ArrowBuilder, CursorBuilder, ImageOverlayBuilder, ImageSource, LegendBuilder,
    LinesBuilder, MeshInput, MeshPlotBuilder, PolygonBuilder, QuiverBuilder, ScalarBarBuilder,
    SphereBuilder, SurfaceBuilder, Text3DBuilder, TextBuilder,
};
use crate::registry;

pub use crate::registry::{auto_figure, figures, gcf, scf};

/// Create a figure with the configured defaults. It becomes the current
/// figure if there is none; use [`scf`] to switch explicitly.
pub fn figure() -> PlotResult<Figure> {
    FigureBuilder::new().build()
}

/// Show the current figure. See [`Figure::show`].
pub fn show(block: bool) -> PlotResult<()> {
    gcf()?.show(block)
}

/// Change the current figure's camera.
pub fn view(view: View) -> PlotResult<ViewState> {
    gcf()?.view(view)
}

pub fn reset_camera() -> PlotResult<()> {
    gcf()?.reset_camera()
}

/// Save a screenshot of the current figure.
pub fn save_fig(path: impl AsRef<Path>, scale: u32) -> PlotResult<()> {
    gcf()?.save(path, scale)
}

/// Screenshot of the current figure as an `(H, W, 4)` array.
pub fn screenshot_fig(scale: u32) -> PlotResult<Array3<u8>> {
    gcf()?.screenshot(scale)
}

/// Close `figure`, or the current figure.
pub fn close(figure: Option<&Figure>) {
    registry::close(figure);
}

pub fn zoom_to_contents(padding: u32, exclude: &[&Plot]) -> PlotResult<()> {
    gcf()?.zoom_to_contents(padding, exclude)
}

/// A polyline through `vertices`
pub fn plot(vertices: impl Into<ArrayArg>) -> LinesBuilder {
    LinesBuilder::new(vertices)
}

/// One sphere per point
pub fn scatter(points: impl Into<ArrayArg>) -> SphereBuilder {
    SphereBuilder::new(points)
}

/// One 3D crosshair per point
pub fn cursor(points: impl Into<ArrayArg>) -> CursorBuilder {
    CursorBuilder::new(points)
}

pub fn arrow(start: impl Into<ArrayArg>, end: impl Into<ArrayArg>) -> ArrowBuilder {
    ArrowBuilder::new(start, end)
}

pub fn quiver(points: impl Into<ArrayArg>, gradient: impl Into<ArrayArg>) -> QuiverBuilder {
    QuiverBuilder::new(points, gradient)
}

pub fn mesh_plot(mesh: impl Into<MeshInput>) -> MeshPlotBuilder {
    MeshPlotBuilder::new(mesh)
}

pub fn polygon(vertices: impl Into<ArrayArg>) -> PolygonBuilder {
    PolygonBuilder::new(vertices)
}

pub fn surface(points: impl Into<ArrayArg>) -> SurfaceBuilder {
    SurfaceBuilder::new(points)
}

/// Text at `position` pixels from the bottom-left of the window
pub fn text(text: impl Into<String>, position: impl Into<glam::DVec2>) -> TextBuilder {
    TextBuilder::new(text, position)
}

pub fn text3d(text: impl Into<String>, position: impl Into<glam::DVec3>) -> Text3DBuilder {
    Text3DBuilder::new(text, position)
}

pub fn scalar_bar(plot: impl AsRef<Plot>) -> ScalarBarBuilder {
    ScalarBarBuilder::new(plot)
}

/// Alias of [`scalar_bar`]
pub fn color_bar(plot: impl AsRef<Plot>) -> ScalarBarBuilder {
    ScalarBarBuilder::new(plot)
}

pub fn legend() -> LegendBuilder {
    LegendBuilder::new()
}

pub fn annotate(points: impl Into<ArrayArg>, text: impl Into<String>) -> AnnotateBuilder {
    AnnotateBuilder::new(points, text)
}

pub fn image_overlay(source: impl Into<ImageSource>) -> ImageOverlayBuilder {
    ImageOverlayBuilder::new(source)
}

/// Read an image file as `(H, W, C)`, origin top-left.
pub fn read_image(path: impl AsRef<Path>) -> PlotResult<Array3<u8>> {
    vplot_renderer::read_image(path)
}
