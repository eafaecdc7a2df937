//! vplot demo: a few plots on a figure of their own window, or the same
//! scene inside an egui host with `--embedded`.
//!
//! `--save-config` writes the active configuration to the config file so it
//! can be edited; `--reset-config` overwrites it with the defaults.

use glam::DVec3;
use ndarray::Array2;
use vplot::prelude::*;
use vplot::{EnrichedFigure, LegendSymbol};
use vplot_core::{ConfigError, ConfigManager};

fn populate(fig: &Figure) -> PlotResult<()> {
    vplot::scatter(vec![[1.5, 0.0, 0.0], [-1.5, 0.0, 0.0]])
        .color(vec!["red", "blue"])
        .radius(0.3)
        .label("poles")
        .fig(fig)
        .build()?;

    let vertices = vec![
        DVec3::new(0.0, 0.0, 1.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(-0.5, 0.87, 0.0),
        DVec3::new(-0.5, -0.87, 0.0),
    ];
    let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
    let heights = Array2::from_shape_fn((faces.len(), 3), |(i, j)| vertices[faces[i][j]].z);
    let mesh = vplot::mesh_plot((vertices.clone(), faces))
        .scalars(heights)
        .label("tetrahedron")
        .fig(fig)
        .build()?;
    vplot::scalar_bar(&mesh).title("height").build()?;

    vplot::arrow([0.0, 0.0, 1.0], [0.0, 0.0, 2.0])
        .color("green")
        .label("up")
        .fig(fig)
        .build_one()?;
    vplot::annotate(vertices, "peak").fig(fig).build()?;
    vplot::text("vplot demo", [10.0, 10.0]).fig(fig).build()?;
    vplot::legend()
        .entry("origin", "black", LegendSymbol::Cross)
        .fig(fig)
        .build()?;
    Ok(())
}

/// Write the managed configuration, reset to defaults first if asked.
fn persist_config(manager: &mut ConfigManager, reset: bool) -> Result<(), ConfigError> {
    if reset {
        manager.reset_to_defaults();
    } else {
        // Mark dirty so an untouched config is still written out.
        manager.config_mut();
    }
    manager.save()?;
    tracing::info!("Configuration written to {:?}", manager.config_file_path());
    Ok(())
}

struct DemoApp {
    figure: EnrichedFigure,
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.figure.show(ui);
        });
    }
}

fn run_embedded() -> Result<(), Box<dyn std::error::Error>> {
    let mut figure = EnrichedFigure::new()?;
    figure.add_all();
    populate(figure.figure())?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_title("vplot embedded demo"),
        ..Default::default()
    };
    eframe::run_native(
        "vplot-demo",
        native_options,
        Box::new(|_cc| Ok(Box::new(DemoApp { figure }))),
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vplot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let has = |flag: &str| args.iter().any(|arg| arg == flag);

    if has("--save-config") || has("--reset-config") {
        let mut manager = ConfigManager::new();
        persist_config(&mut manager, has("--reset-config"))?;
        return Ok(());
    }

    if has("--embedded") {
        tracing::info!("Starting embedded demo");
        return run_embedded();
    }

    tracing::info!("Starting vplot demo");
    let fig = vplot::figure()?;
    populate(&fig)?;
    fig.show(true)?;
    vplot::close(Some(&fig));
    Ok(())
}
