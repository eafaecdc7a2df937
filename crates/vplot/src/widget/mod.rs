//! Figures embedded in an egui host application.
//!
//! The host owns the event loop and calls [`FigureWidget::show`] every
//! frame. A vertical slot above the canvas takes toolbar items;
//! [`EnrichedFigure`] fills it with camera presets, a screenshot button and
//! a plot table.

pub(crate) mod canvas;
mod enriched;

pub use enriched::{EnrichedFigure, preset_view};

use std::sync::Arc;

use vplot_core::PlotResult;

use crate::figure::{Figure, FigureBuilder};
use canvas::Canvas;

/// Toolbar entry drawn above the canvas every frame
pub type ToolbarItem = Box<dyn FnMut(&mut egui::Ui, &Figure)>;

/// A figure painted inside a host `Ui`
pub struct FigureWidget {
    figure: Figure,
    toolbar: Vec<ToolbarItem>,
    canvas: Canvas,
    hooked: bool,
}

impl FigureWidget {
    /// A new embedded figure with the configured defaults.
    pub fn new() -> PlotResult<Self> {
        Ok(Self::from_figure(FigureBuilder::new().embedded().build()?))
    }

    /// Wrap an existing figure, usually one built with
    /// [`FigureBuilder::embedded`].
    pub fn from_figure(figure: Figure) -> Self {
        Self {
            figure,
            toolbar: Vec::new(),
            canvas: Canvas::default(),
            hooked: false,
        }
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// Append an item to the toolbar slot.
    pub fn add_to_toolbar(&mut self, item: impl FnMut(&mut egui::Ui, &Figure) + 'static) {
        self.toolbar.push(Box::new(item));
    }

    pub fn toolbar_len(&self) -> usize {
        self.toolbar.len()
    }

    /// Draw the toolbar and the figure into the remaining space of `ui`.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        if !self.hooked && !self.figure.is_closed() {
            // Plot changes from host code schedule a repaint of the host.
            let ctx = ui.ctx().clone();
            self.figure.lock().redraw = Some(Arc::new(move || ctx.request_repaint()));
            self.hooked = true;
        }

        ui.vertical(|ui| {
            if !self.toolbar.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for item in &mut self.toolbar {
                        item(ui, &self.figure);
                    }
                });
                ui.separator();
            }
            self.canvas.show(ui, &self.figure)
        })
        .inner
    }
}

impl Drop for FigureWidget {
    fn drop(&mut self) {
        if !self.figure.is_closed() {
            self.figure.lock().redraw = None;
        }
    }
}
