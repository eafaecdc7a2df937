//! Paints a figure's frames into an egui `Ui` and maps mouse input to the
//! camera.

use egui::{Color32, ColorImage, FontId, Pos2, Rect, Sense, TextureHandle, TextureOptions};
use vplot_core::PlotResult;
use vplot_renderer::{Frame, Label};

use crate::figure::Figure;

/// Degrees of orbit per point of drag
const ORBIT_SPEED: f64 = 0.4;
/// Scroll points per doubling of the zoom
const SCROLL_PER_DOUBLING: f64 = 240.0;

#[derive(Default)]
pub(crate) struct Canvas {
    texture: Option<TextureHandle>,
}

impl Canvas {
    /// Fill the remaining space of `ui` with the figure.
    pub fn show(&mut self, ui: &mut egui::Ui, figure: &Figure) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if figure.is_closed() {
            return response;
        }

        self.handle_input(ui, &response, figure);

        let ppp = ui.ctx().pixels_per_point();
        let width = (rect.width() * ppp).round().max(1.0) as u32;
        let height = (rect.height() * ppp).round().max(1.0) as u32;
        if figure.render_size() != [width, height] {
            if let Err(e) = figure.set_render_size(width, height) {
                tracing::warn!("Failed to resize figure: {}", e);
            }
        }

        let labels = {
            let mut state = figure.lock();
            if state.scene.is_dirty() || state.window.last_frame().is_none() {
                if let Err(e) = state.render() {
                    tracing::error!("Render failed: {}", e);
                    return response;
                }
            }
            let Some(frame) = state.window.last_frame() else {
                return response;
            };
            self.upload(ui.ctx(), frame);
            frame.labels().to_vec()
        };

        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
        }
        paint_labels(ui, rect, ppp, &labels);
        response
    }

    fn handle_input(&self, ui: &egui::Ui, response: &egui::Response, figure: &Figure) {
        let drag = response.drag_delta();
        if drag != egui::Vec2::ZERO {
            let result = figure.with_camera_mut(|camera| {
                camera.azimuth(-drag.x as f64 * ORBIT_SPEED);
                camera.elevation(drag.y as f64 * ORBIT_SPEED);
            });
            log_ignored("orbit", result);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y) as f64;
            if scroll != 0.0 {
                let result = figure.with_camera_mut(|camera| {
                    camera.dolly(2f64.powf(scroll / SCROLL_PER_DOUBLING));
                });
                log_ignored("zoom", result);
            }
        }

        if response.double_clicked() {
            log_ignored("reset camera", figure.reset_camera());
        }
    }

    fn upload(&mut self, ctx: &egui::Context, frame: &Frame) {
        let size = [frame.width() as usize, frame.height() as usize];
        let image = ColorImage::from_rgba_unmultiplied(size, frame.image().as_raw());
        match &mut self.texture {
            Some(handle) => handle.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("vplot-figure", image, TextureOptions::LINEAR));
            }
        }
    }
}

/// Input on a figure closed under the pointer is dropped.
fn log_ignored(action: &str, result: PlotResult<()>) {
    if let Err(e) = result {
        tracing::debug!("Ignored {}: {}", action, e);
    }
}

/// Labels come in frame pixels; egui works in points.
fn paint_labels(ui: &egui::Ui, rect: Rect, ppp: f32, labels: &[Label]) {
    let painter = ui.painter_at(rect);
    for label in labels {
        let pos = rect.min + egui::vec2(label.position.x as f32, label.position.y as f32) / ppp;
        let [r, g, b] = label.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        painter.text(
            pos,
            egui::Align2::LEFT_TOP,
            &label.text,
            FontId::proportional(label.size as f32 / ppp),
            Color32::from_rgb(r, g, b),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureBuilder;

    #[test]
    fn test_input_on_closed_figure_is_dropped() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        fig.close();
        let result = fig.with_camera_mut(|camera| camera.azimuth(10.0));
        assert!(result.is_err());
        log_ignored("orbit", result);
    }
}
