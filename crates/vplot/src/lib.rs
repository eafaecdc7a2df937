//! vplot
//!
//! matplotlib-style 3D plotting. Plot calls add objects to an implicit
//! current figure, `show()` opens it, `close()` tears it down.
//!
//! ```ignore
//! use vplot::prelude::*;
//!
//! vplot::scatter(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]])
//!     .color("red")
//!     .radius(0.5)
//!     .build()?;
//! vplot::arrow([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]).length(2.0).build_one()?;
//! vplot::show(true)?;
//! ```
//!
//! # Modules
//!
//! - [`figure`] - figures and their lifecycle
//! - [`registry`] - the current figure and the figure history
//! - [`plot`] - the plot handle shared by every plot kind
//! - [`plots`] - concrete plot kinds and their builders
//! - [`interactor`] - how a figure runs its event loop
//! - [`widget`] - figures embedded in an egui host (feature `gui`)

pub mod api;
pub mod capabilities;
pub mod figure;
pub mod interactor;
pub mod plot;
pub mod plots;
pub mod registry;
#[cfg(feature = "gui")]
pub mod widget;

pub use api::*;
pub use capabilities::Capabilities;
pub use figure::{Figure, FigureBuilder, Lifecycle, View, ViewState};
pub use plot::{Plot, PlotBuilder, PlotId, PlotKind, PlotOptions, PlotVariant};
pub use plots::*;
#[cfg(feature = "gui")]
pub use widget::{EnrichedFigure, FigureWidget};

pub use vplot_core::{
    ArrayArg, ColorInput, LookupTable, MeshError, PlotConfig, PlotError, PlotResult, TriangleMesh,
};
pub use vplot_renderer::{Camera, LegendSymbol};

/// Commonly used items
pub mod prelude {
    pub use crate::plot::PlotBuilder;
    pub use crate::{ColorInput, Figure, PlotError, PlotResult, View};
}
