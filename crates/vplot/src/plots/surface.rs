//! Surfaces over a structured `(H, W, 3)` grid of points.

use vplot_core::{ArrayArg, CellArray, LookupTable, PlotError, PlotResult, PolyData, nan_range};
use vplot_renderer::{Actor, Mapper, shared_lookup_table};

use super::DEFAULT_COLOR;
use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions};

#[derive(Debug, Clone)]
pub struct Surface {
    plot: Plot,
}

plot_handle!(Surface);

impl Surface {
    pub fn num_triangles(&self) -> PlotResult<usize> {
        self.with_actor(|a| a.mapper().and_then(|m| m.polydata()).map(|p| p.polys.len()))?
            .ok_or(PlotError::PlotRemoved)
    }
}

/// Two triangles per grid quad
#[derive(Debug, Clone)]
pub struct SurfaceBuilder {
    points: ArrayArg,
    scalars: Option<ArrayArg>,
    cmap: Option<LookupTable>,
    options: PlotOptions,
}

impl SurfaceBuilder {
    pub fn new(points: impl Into<ArrayArg>) -> Self {
        Self {
            points: points.into(),
            scalars: None,
            cmap: None,
            options: PlotOptions::default(),
        }
    }

    /// One scalar per grid point, shape `(H, W)`
    pub fn scalars(mut self, scalars: impl Into<ArrayArg>) -> Self {
        self.scalars = Some(scalars.into());
        self
    }

    pub fn cmap(mut self, table: LookupTable) -> Self {
        self.cmap = Some(table);
        self
    }
}

impl PlotBuilder for SurfaceBuilder {
    type Output = Surface;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Surface> {
        let [h, w] = match self.points.shape() {
            [h, w, 3] if *h >= 2 && *w >= 2 => [*h, *w],
            shape => return Err(PlotError::shape("surface points", shape, "(H, W, 3), H, W >= 2")),
        };
        let mut polydata = PolyData::with_points(self.points.to_points("surface points")?);

        let mut polys = CellArray::new();
        for i in 0..h - 1 {
            for j in 0..w - 1 {
                let a = i * w + j;
                let b = a + w;
                polys.push_cell(&[a, b, b + 1]);
                polys.push_cell(&[a, b + 1, a + 1]);
            }
        }
        polydata.polys = polys;

        let mut range = None;
        if let Some(scalars) = &self.scalars {
            if scalars.shape() != [h, w] {
                return Err(PlotError::shape("scalars", scalars.shape(), format!("({h}, {w})")));
            }
            range = nan_range(scalars.as_slice());
            polydata.set_scalars(scalars.as_slice().to_vec())?;
        }

        let (rgb, alpha) = self.options.resolve_color(DEFAULT_COLOR)?;
        let mut mapper = Mapper::from_polydata(polydata);
        if let Some(cmap) = self.cmap.clone() {
            mapper.set_lookup_table(shared_lookup_table(cmap));
        }
        if let Some(range) = range {
            mapper.set_scalar_range(range);
        }

        let figure = self.options.figure()?;
        let actor = Actor::geometry(mapper).with_color(rgb).with_opacity(alpha);
        let plot = self.options.attach(&figure, actor, PlotKind::Surface)?;
        Ok(Surface { plot })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, Array3};

    use super::*;
    use crate::figure::FigureBuilder;

    fn grid(h: usize, w: usize) -> Array3<f64> {
        Array3::from_shape_fn((h, w, 3), |(i, j, k)| match k {
            0 => j as f64,
            1 => i as f64,
            _ => 0.0,
        })
    }

    #[test]
    fn test_two_triangles_per_quad() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let surface = SurfaceBuilder::new(grid(3, 4)).fig(&fig).build().unwrap();
        let (cells, points) = surface
            .with_actor(|a| {
                let p = a.mapper().and_then(|m| m.polydata()).unwrap();
                (p.polys.len(), p.num_points())
            })
            .unwrap();
        assert_eq!(points, 12);
        assert_eq!(cells, 2 * 2 * 3);
        assert_eq!(surface.num_triangles().unwrap(), 12);
    }

    #[test]
    fn test_scalars_set_range() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let scalars = Array2::from_shape_fn((2, 2), |(i, j)| (i * 2 + j) as f64);
        let surface = SurfaceBuilder::new(grid(2, 2))
            .scalars(scalars)
            .cmap(LookupTable::grayscale(16))
            .fig(&fig)
            .build()
            .unwrap();
        let range = surface
            .with_actor(|a| a.mapper().map(|m| m.scalar_range()))
            .unwrap();
        assert_eq!(range, Some([0.0, 3.0]));
    }

    #[test]
    fn test_bad_grid_shape() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        assert!(SurfaceBuilder::new(grid(1, 4)).fig(&fig).build().is_err());
        assert!(
            SurfaceBuilder::new(grid(2, 2))
                .scalars(Array2::<f64>::zeros((3, 3)))
                .fig(&fig)
                .build()
                .is_err()
        );
    }
}
