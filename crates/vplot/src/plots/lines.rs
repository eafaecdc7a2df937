//! A single polyline.

use glam::DVec3;
use vplot_core::{ArrayArg, CellArray, PlotError, PlotResult, PolyData};
use vplot_renderer::{Actor, Mapper};

use super::{DEFAULT_COLOR, vertex_list};
use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions};

#[derive(Debug, Clone)]
pub struct Lines {
    plot: Plot,
}

plot_handle!(Lines);

fn polyline(vertices: Vec<DVec3>, join_ends: bool) -> PolyData {
    let mut ids: Vec<usize> = (0..vertices.len()).collect();
    if join_ends && !ids.is_empty() {
        ids.push(0);
    }
    let mut polydata = PolyData::with_points(vertices);
    polydata.lines = CellArray::from_cells([ids.as_slice()]);
    polydata
}

impl Lines {
    pub fn vertices(&self) -> PlotResult<Vec<DVec3>> {
        self.with_actor(|a| {
            a.mapper()
                .and_then(|m| m.polydata())
                .map(|p| p.points.clone())
                .unwrap_or_default()
        })
    }

    /// Replace the vertices, keeping whether the line is closed.
    pub fn set_vertices(&self, vertices: impl Into<ArrayArg>) -> PlotResult<()> {
        let vertices = vertex_list(&vertices.into(), "vertices")?;
        self.with_actor_mut(|a| {
            let polydata = a
                .mapper_mut()
                .and_then(|m| m.polydata_mut())
                .ok_or(PlotError::PlotRemoved)?;
            let joined = polydata
                .lines
                .iter()
                .next()
                .is_some_and(|ids| ids.len() > 1 && ids.first() == ids.last());
            *polydata = polyline(vertices, joined);
            Ok(())
        })?
    }

    pub fn line_width(&self) -> PlotResult<f64> {
        self.with_actor(|a| a.property.line_width)
    }

    pub fn set_line_width(&self, width: f64) -> PlotResult<()> {
        self.with_actor_mut(|a| a.property.line_width = width)
    }
}

/// A polyline through `vertices` in order
#[derive(Debug, Clone)]
pub struct LinesBuilder {
    vertices: ArrayArg,
    line_width: f64,
    join_ends: bool,
    options: PlotOptions,
}

impl LinesBuilder {
    pub fn new(vertices: impl Into<ArrayArg>) -> Self {
        Self {
            vertices: vertices.into(),
            line_width: 1.0,
            join_ends: false,
            options: PlotOptions::default(),
        }
    }

    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    /// Close the line back to its first vertex
    pub fn join_ends(mut self, join: bool) -> Self {
        self.join_ends = join;
        self
    }
}

impl PlotBuilder for LinesBuilder {
    type Output = Lines;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Lines> {
        let vertices = vertex_list(&self.vertices, "vertices")?;
        let (rgb, alpha) = self.options.resolve_color(DEFAULT_COLOR)?;
        let figure = self.options.figure()?;

        let mut actor = Actor::geometry(Mapper::from_polydata(polyline(vertices, self.join_ends)))
            .with_color(rgb)
            .with_opacity(alpha);
        actor.property.line_width = self.line_width;
        actor.property.lighting = false;

        let plot = self.options.attach(&figure, actor, PlotKind::Lines)?;
        Ok(Lines { plot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureBuilder;

    fn cell_ids(lines: &Lines) -> Vec<usize> {
        lines
            .with_actor(|a| {
                let polydata = a.mapper().and_then(|m| m.polydata()).unwrap();
                polydata.lines.iter().next().unwrap().to_vec()
            })
            .unwrap()
    }

    #[test]
    fn test_single_polyline_cell() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let lines = LinesBuilder::new(vec![[0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]])
            .fig(&fig)
            .build()
            .unwrap();
        assert_eq!(cell_ids(&lines), vec![0, 1, 2]);
        assert_eq!(lines.line_width().unwrap(), 1.0);
    }

    #[test]
    fn test_join_ends_survives_update() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let lines = LinesBuilder::new(vec![[0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]])
            .join_ends(true)
            .line_width(3.0)
            .fig(&fig)
            .build()
            .unwrap();
        assert_eq!(cell_ids(&lines), vec![0, 1, 2, 0]);

        lines.set_vertices(vec![[0.0; 3], [0.0, 2.0, 0.0]]).unwrap();
        assert_eq!(cell_ids(&lines), vec![0, 1, 0]);
        assert_eq!(lines.vertices().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_flat_vertices() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let result = LinesBuilder::new(vec![0.0, 1.0, 2.0]).fig(&fig).build();
        assert!(matches!(result, Err(PlotError::ShapeMismatch { .. })));
    }
}
