//! A filled polygon with its outline.

use vplot_core::{ArrayArg, CellArray, PlotResult, PolyData};
use vplot_renderer::{Actor, Mapper};

use super::{DEFAULT_COLOR, vertex_list};
use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions};

#[derive(Debug, Clone)]
pub struct Polygon {
    plot: Plot,
}

plot_handle!(Polygon);

/// One polygon cell over `vertices` plus a closed polyline around it
#[derive(Debug, Clone)]
pub struct PolygonBuilder {
    vertices: ArrayArg,
    options: PlotOptions,
}

impl PolygonBuilder {
    pub fn new(vertices: impl Into<ArrayArg>) -> Self {
        Self {
            vertices: vertices.into(),
            options: PlotOptions::default(),
        }
    }
}

impl PlotBuilder for PolygonBuilder {
    type Output = Polygon;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Polygon> {
        let vertices = vertex_list(&self.vertices, "vertices")?;
        let (rgb, alpha) = self.options.resolve_color(DEFAULT_COLOR)?;
        let figure = self.options.figure()?;

        let ids: Vec<usize> = (0..vertices.len()).collect();
        let mut outline = ids.clone();
        outline.extend(ids.first());

        let mut polydata = PolyData::with_points(vertices);
        polydata.polys = CellArray::from_cells([ids.as_slice()]);
        polydata.lines = CellArray::from_cells([outline.as_slice()]);

        let actor = Actor::geometry(Mapper::from_polydata(polydata))
            .with_color(rgb)
            .with_opacity(alpha);
        let plot = self.options.attach(&figure, actor, PlotKind::Polygon)?;
        Ok(Polygon { plot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureBuilder;

    #[test]
    fn test_polygon_cells() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let polygon = PolygonBuilder::new(vec![[0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]])
            .color("blue")
            .opacity(0.5)
            .fig(&fig)
            .build()
            .unwrap();
        let (polys, lines) = polygon
            .with_actor(|a| {
                let p = a.mapper().and_then(|m| m.polydata()).unwrap();
                (p.polys.raw().to_vec(), p.lines.raw().to_vec())
            })
            .unwrap();
        assert_eq!(polys, vec![4, 0, 1, 2, 3]);
        assert_eq!(lines, vec![5, 0, 1, 2, 3, 0]);
        assert_eq!(polygon.opacity().unwrap(), 0.5);
        assert_eq!(polygon.variant(), crate::plot::PlotVariant::Constructed);
    }
}
