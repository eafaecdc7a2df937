//! Concrete plot kinds.
//!
//! Each kind has a builder implementing [`PlotBuilder`](crate::plot::PlotBuilder)
//! and a handle type that dereferences to [`Plot`]. Builders that accept
//! point arrays broadcast them and return one plot per element.

/// Implements `Deref<Target = Plot>` and `From<$kind> for Plot`.
macro_rules! plot_handle {
    ($kind:ident) => {
        impl std::ops::Deref for $kind {
            type Target = $crate::plot::Plot;

            fn deref(&self) -> &Self::Target {
                &self.plot
            }
        }

        impl From<$kind> for $crate::plot::Plot {
            fn from(value: $kind) -> Self {
                value.plot
            }
        }

        impl AsRef<$crate::plot::Plot> for $kind {
            fn as_ref(&self) -> &$crate::plot::Plot {
                &self.plot
            }
        }
    };
}

mod annotate;
mod arrow;
mod image_overlay;
mod legend;
mod lines;
mod mesh;
mod polygon;
mod scalar_bar;
mod scatter;
mod surface;
mod text;

pub use annotate::{AnnotateBuilder, Annotation};
pub use arrow::{Arrow, ArrowBuilder, QuiverBuilder};
pub use image_overlay::{ImageOverlay, ImageOverlayBuilder, ImageSource};
pub use legend::{Legend, LegendBuilder};
pub use lines::{Lines, LinesBuilder};
pub use mesh::{MeshInput, MeshPlot, MeshPlotBuilder};
pub use polygon::{Polygon, PolygonBuilder};
pub use scalar_bar::{ScalarBar, ScalarBarBuilder};
pub use scatter::{Cursor, CursorBuilder, Sphere, SphereBuilder};
pub use surface::{Surface, SurfaceBuilder};
pub use text::{Text, Text3D, Text3DBuilder, TextBuilder};

use vplot_core::{ArrayArg, PlotError, PlotResult};

/// Default color of geometry plots
pub(crate) const DEFAULT_COLOR: [f64; 3] = [1.0, 1.0, 1.0];
/// Default color of text plots
pub(crate) const DEFAULT_TEXT_COLOR: [f64; 3] = [0.0, 0.0, 0.0];

/// The broadcast shape of several point arguments: the longest leading
/// shape among them. Compatibility is checked when each is broadcast.
pub(crate) fn element_shape(args: &[(&ArrayArg, &str)]) -> PlotResult<Vec<usize>> {
    let mut shape: Vec<usize> = Vec::new();
    for (arg, what) in args {
        let lead = arg.points_shape(what)?;
        if lead.len() > shape.len() {
            shape = lead;
        }
    }
    Ok(shape)
}

/// A polyline or polygon vertex list: exactly `(N, 3)`.
pub(crate) fn vertex_list(arg: &ArrayArg, what: &str) -> PlotResult<Vec<glam::DVec3>> {
    match arg.shape() {
        [_, 3] => arg.to_points(what),
        shape => Err(PlotError::shape(what, shape, "(N, 3)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_shape_takes_longest() {
        let single: ArrayArg = [0.0, 0.0, 1.0].into();
        let many: ArrayArg = vec![[0.0; 3]; 4].into();
        let shape = element_shape(&[(&single, "start"), (&many, "end")]).unwrap();
        assert_eq!(shape, vec![4]);
        assert_eq!(element_shape(&[(&single, "start")]).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_vertex_list_shape() {
        let ok: ArrayArg = vec![[0.0; 3]; 2].into();
        assert_eq!(vertex_list(&ok, "vertices").unwrap().len(), 2);
        let bad: ArrayArg = [0.0, 1.0, 2.0].into();
        assert!(vertex_list(&bad, "vertices").is_err());
    }
}
