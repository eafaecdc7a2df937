//! An embedded figure with a ready-made toolbar.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use glam::DVec3;
use vplot_core::PlotResult;

use super::FigureWidget;
use crate::capabilities::Capabilities;
use crate::figure::{Figure, View};
use crate::plot::{Plot, PlotId};

/// How often the plot table re-reads the figure's plots
const PLOT_TABLE_POLL: Duration = Duration::from_millis(500);

/// The six axis-aligned presets: label and viewing direction
const PRESETS: [(&str, DVec3); 6] = [
    ("+X", DVec3::X),
    ("-X", DVec3::NEG_X),
    ("+Y", DVec3::Y),
    ("-Y", DVec3::NEG_Y),
    ("+Z", DVec3::Z),
    ("-Z", DVec3::NEG_Z),
];

/// Camera looking along `forward`. Up is +Z when looking horizontally,
/// +Y when looking along Z.
pub fn preset_view(forward: DVec3) -> View {
    let up = if forward.z.abs() < 1e-9 { DVec3::Z } else { DVec3::Y };
    View::new().camera_direction(forward).up_view(up)
}

struct PlotRow {
    plot: Plot,
    name: String,
    visible: bool,
}

#[derive(Default)]
struct PlotTable {
    open: bool,
    rows: Vec<PlotRow>,
    last_poll: Option<Instant>,
}

impl PlotTable {
    /// Rebuild the rows if the figure's plots changed; refresh attributes.
    fn sync(&mut self, figure: &Figure) {
        let plots = figure.plots();
        let ids: Vec<PlotId> = plots.iter().map(Plot::id).collect();
        let current: Vec<PlotId> = self.rows.iter().map(|r| r.plot.id()).collect();
        if ids != current {
            self.rows = plots
                .into_iter()
                .map(|plot| PlotRow {
                    name: String::new(),
                    visible: true,
                    plot,
                })
                .collect();
        }
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.name = match row.plot.name() {
                Ok(Some(name)) => name,
                _ => format!("{} {}", row.plot.kind().name(), i),
            };
            row.visible = row.plot.visible().unwrap_or(false);
        }
        self.last_poll = Some(Instant::now());
    }

    fn due(&self) -> bool {
        self.last_poll.is_none_or(|t| t.elapsed() >= PLOT_TABLE_POLL)
    }

    fn show(&mut self, ctx: &egui::Context, figure: &Figure) {
        if !self.open {
            return;
        }
        if self.due() {
            self.sync(figure);
        }
        ctx.request_repaint_after(PLOT_TABLE_POLL);

        let mut open = self.open;
        egui::Window::new("Plots").open(&mut open).show(ctx, |ui| {
            egui::Grid::new("plot_table").striped(true).show(ui, |ui| {
                ui.strong("Name");
                ui.strong("Visible");
                ui.end_row();
                for row in &mut self.rows {
                    ui.label(row.name.as_str());
                    if ui.checkbox(&mut row.visible, "").changed() {
                        if let Err(e) = row.plot.set_visible(row.visible) {
                            tracing::warn!("Failed to toggle '{}': {}", row.name, e);
                        }
                    }
                    ui.end_row();
                }
            });
        });
        self.open = open;
    }
}

/// A [`FigureWidget`] with camera presets, a screenshot button and a plot
/// table
pub struct EnrichedFigure {
    widget: FigureWidget,
    plot_table: Rc<RefCell<PlotTable>>,
}

impl EnrichedFigure {
    /// A new embedded figure with an empty toolbar.
    pub fn new() -> PlotResult<Self> {
        Ok(Self::from_widget(FigureWidget::new()?))
    }

    pub fn from_widget(widget: FigureWidget) -> Self {
        Self {
            widget,
            plot_table: Rc::new(RefCell::new(PlotTable::default())),
        }
    }

    pub fn figure(&self) -> &Figure {
        self.widget.figure()
    }

    pub fn widget_mut(&mut self) -> &mut FigureWidget {
        &mut self.widget
    }

    /// Buttons viewing the scene along each axis.
    pub fn add_preset_views(&mut self) -> &mut Self {
        self.widget.add_to_toolbar(|ui, figure| {
            for (label, forward) in PRESETS {
                if ui.button(label).on_hover_text(format!("View along {label}")).clicked() {
                    let result = figure
                        .view(preset_view(forward))
                        .and_then(|_| figure.reset_camera());
                    if let Err(e) = result {
                        tracing::warn!("Preset view {} failed: {}", label, e);
                    }
                }
            }
        });
        self
    }

    /// A button saving a screenshot through a file dialog.
    pub fn add_screenshot_button(&mut self) -> &mut Self {
        self.widget.add_to_toolbar(|ui, figure| {
            let enabled = Capabilities::detect().file_dialogs;
            if ui.add_enabled(enabled, egui::Button::new("Screenshot")).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PNG image", &["png"])
                    .add_filter("JPEG image", &["jpg", "jpeg"])
                    .set_file_name("figure.png")
                    .save_file()
                {
                    match figure.save(&path, 1) {
                        Ok(()) => tracing::info!("Screenshot saved to {:?}", path),
                        Err(e) => tracing::error!("Failed to save screenshot: {}", e),
                    }
                }
            }
        });
        self
    }

    /// A button toggling a window that lists every plot with its visibility.
    pub fn add_show_plot_table_button(&mut self) -> &mut Self {
        let table = Rc::clone(&self.plot_table);
        self.widget.add_to_toolbar(move |ui, _figure| {
            let mut table = table.borrow_mut();
            if ui.selectable_label(table.open, "Plots").clicked() {
                table.open = !table.open;
                table.last_poll = None;
            }
        });
        self
    }

    /// Every toolbar item.
    pub fn add_all(&mut self) -> &mut Self {
        self.add_preset_views()
            .add_screenshot_button()
            .add_show_plot_table_button()
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let response = self.widget.show(ui);
        let figure = self.widget.figure().clone();
        self.plot_table.borrow_mut().show(ui.ctx(), &figure);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureBuilder;
    use crate::plot::PlotBuilder;
    use crate::plots::SphereBuilder;

    #[test]
    fn test_preset_up_vectors() {
        assert_eq!(preset_view(DVec3::X).up_view, Some(DVec3::Z));
        assert_eq!(preset_view(DVec3::NEG_Y).up_view, Some(DVec3::Z));
        assert_eq!(preset_view(DVec3::Z).up_view, Some(DVec3::Y));
        assert_eq!(preset_view(DVec3::NEG_Z).camera_direction, Some(DVec3::NEG_Z));
    }

    #[test]
    fn test_preset_view_applies() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let state = fig.view(preset_view(DVec3::NEG_Z)).unwrap();
        assert!(state.camera_position.z > 0.0);
    }

    #[test]
    fn test_plot_table_tracks_plots() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let mut table = PlotTable::default();
        assert!(table.due());
        table.sync(&fig);
        assert!(table.rows.is_empty());
        assert!(!table.due());

        let spheres = SphereBuilder::new(vec![[0.0; 3], [1.0; 3]])
            .name("ball")
            .fig(&fig)
            .build()
            .unwrap();
        spheres[1].set_visible(false).unwrap();
        table.sync(&fig);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].name, "ball");
        assert!(table.rows[0].visible);
        assert!(!table.rows[1].visible);

        spheres[0].remove().unwrap();
        table.sync(&fig);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_toolbar_items() {
        let widget = FigureWidget::from_figure(FigureBuilder::new().headless().build().unwrap());
        let mut enriched = EnrichedFigure::from_widget(widget);
        enriched.add_all();
        assert_eq!(enriched.widget_mut().toolbar_len(), 3);
    }
}
