//! A native window driven by eframe.

use std::sync::Arc;

use vplot_core::{PlotError, PlotResult};

use super::Interactor;
use crate::figure::Figure;
use crate::widget::canvas::Canvas;

/// Opens an eframe window and blocks until it is closed
#[derive(Debug, Default)]
pub struct NativeInteractor {
    running: bool,
}

impl Interactor for NativeInteractor {
    fn name(&self) -> &'static str {
        "native"
    }

    fn start(&mut self, figure: &Figure) -> PlotResult<()> {
        let [width, height] = figure.render_size();
        let title = figure.window_name();
        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([width as f32, height as f32])
                .with_title(title.clone()),
            run_and_return: true,
            ..Default::default()
        };

        self.running = true;
        let app_figure = figure.clone();
        let result = eframe::run_native(
            &title,
            native_options,
            Box::new(move |cc| Ok(Box::new(FigureApp::new(cc, app_figure)))),
        );
        self.running = false;

        if !figure.is_closed() {
            figure.lock().redraw = None;
        }
        result.map_err(|e| PlotError::Backend(format!("event loop failed: {e}")))
    }

    fn terminate(&mut self) {
        if self.running {
            tracing::debug!("Native interactor terminated while running");
        }
        self.running = false;
    }
}

struct FigureApp {
    figure: Figure,
    canvas: Canvas,
}

impl FigureApp {
    fn new(cc: &eframe::CreationContext<'_>, figure: Figure) -> Self {
        let ctx = cc.egui_ctx.clone();
        figure.lock().redraw = Some(Arc::new(move || ctx.request_repaint()));
        Self {
            figure,
            canvas: Canvas::default(),
        }
    }
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.figure.is_closed() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.canvas.show(ui, &self.figure);
            });
    }
}
