//! Triangle mesh plots.
//!
//! A mesh is drawn as a triangle soup: `N` triangles become `3N` vertices and
//! `N` cells `(3, 3i, 3i + 1, 3i + 2)`. Corners are never shared, so
//! per-corner scalars and colors need no interpolation rules.

use std::path::PathBuf;

use glam::DVec3;
use vplot_core::{
    ArrayArg, CellArray, ColorInput, LookupTable, PlotError, PlotResult, PolyData, TriangleMesh,
    broadcast_colors, load_mesh, nan_range,
};
use vplot_renderer::{Actor, Mapper, shared_lookup_table};

use super::DEFAULT_COLOR;
use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions};

/// Anything that can be read as a triangle mesh
#[derive(Debug, Clone)]
pub enum MeshInput {
    Mesh(TriangleMesh),
    /// An `(N, 3, 3)` array of triangle corners
    Array(ArrayArg),
    /// Shared vertices and triangle indices
    Indexed {
        vertices: Vec<DVec3>,
        faces: Vec<[usize; 3]>,
    },
    /// An STL or OBJ file
    Path(PathBuf),
}

impl MeshInput {
    fn load(self) -> PlotResult<TriangleMesh> {
        match self {
            MeshInput::Mesh(mesh) => Ok(mesh),
            MeshInput::Array(array) => TriangleMesh::from_array(&array),
            MeshInput::Indexed { vertices, faces } => TriangleMesh::from_indexed(&vertices, &faces),
            MeshInput::Path(path) => Ok(load_mesh(path)?),
        }
    }
}

impl From<TriangleMesh> for MeshInput {
    fn from(mesh: TriangleMesh) -> Self {
        MeshInput::Mesh(mesh)
    }
}

impl From<&TriangleMesh> for MeshInput {
    fn from(mesh: &TriangleMesh) -> Self {
        MeshInput::Mesh(mesh.clone())
    }
}

impl From<ArrayArg> for MeshInput {
    fn from(array: ArrayArg) -> Self {
        MeshInput::Array(array)
    }
}

impl From<ndarray::Array3<f64>> for MeshInput {
    fn from(array: ndarray::Array3<f64>) -> Self {
        MeshInput::Array(array.into())
    }
}

impl From<(Vec<DVec3>, Vec<[usize; 3]>)> for MeshInput {
    fn from((vertices, faces): (Vec<DVec3>, Vec<[usize; 3]>)) -> Self {
        MeshInput::Indexed { vertices, faces }
    }
}

impl From<PathBuf> for MeshInput {
    fn from(path: PathBuf) -> Self {
        MeshInput::Path(path)
    }
}

impl From<&std::path::Path> for MeshInput {
    fn from(path: &std::path::Path) -> Self {
        MeshInput::Path(path.to_path_buf())
    }
}

#[derive(Debug, Clone)]
pub struct MeshPlot {
    plot: Plot,
}

plot_handle!(MeshPlot);

impl MeshPlot {
    fn with_polydata<R>(&self, f: impl FnOnce(&PolyData) -> R) -> PlotResult<R> {
        self.with_actor(|a| a.mapper().and_then(|m| m.polydata()).map(f))?
            .ok_or(PlotError::PlotRemoved)
    }

    pub fn num_vertices(&self) -> PlotResult<usize> {
        self.with_polydata(|p| p.num_points())
    }

    pub fn num_triangles(&self) -> PlotResult<usize> {
        self.with_polydata(|p| p.polys.len())
    }

    /// The `[min, max]` of the scalars mapped to the lookup table
    pub fn scalar_range(&self) -> PlotResult<[f64; 2]> {
        self.with_actor(|a| a.mapper().map(|m| m.scalar_range()))?
            .ok_or(PlotError::PlotRemoved)
    }

    pub fn set_scalar_range(&self, range: [f64; 2]) -> PlotResult<()> {
        self.with_actor_mut(|a| {
            if let Some(mapper) = a.mapper() {
                mapper.set_scalar_range(range);
            }
        })
    }

    /// Replace the per-corner scalars, shape `(N, 3)`.
    pub fn set_scalars(&self, scalars: impl Into<ArrayArg>) -> PlotResult<()> {
        let scalars = scalars.into();
        self.with_actor_mut(|a| {
            let mapper = a.mapper_mut().ok_or(PlotError::PlotRemoved)?;
            let polydata = mapper.polydata_mut().ok_or(PlotError::PlotRemoved)?;
            let n = polydata.num_points() / 3;
            let values = corner_scalars(&scalars, n)?;
            let range = nan_range(&values);
            polydata.set_scalars(values)?;
            if let Some(range) = range {
                mapper.set_scalar_range(range);
            }
            Ok(())
        })?
    }
}

/// `(N, 3)` per-corner scalars, flattened.
fn corner_scalars(scalars: &ArrayArg, n: usize) -> PlotResult<Vec<f64>> {
    if scalars.shape() != [n, 3] {
        return Err(PlotError::shape("scalars", scalars.shape(), format!("({n}, 3)")));
    }
    Ok(scalars.as_slice().to_vec())
}

/// `(N,)` per-triangle scalars, repeated for each corner.
fn triangle_scalars(tri_scalars: &ArrayArg, n: usize) -> PlotResult<Vec<f64>> {
    if tri_scalars.shape() != [n] {
        return Err(PlotError::shape("tri_scalars", tri_scalars.shape(), format!("({n},)")));
    }
    Ok(tri_scalars
        .as_slice()
        .iter()
        .flat_map(|&s| [s; 3])
        .collect())
}

/// Plot a triangle mesh
#[derive(Debug, Clone)]
pub struct MeshPlotBuilder {
    mesh: MeshInput,
    scalars: Option<ArrayArg>,
    tri_scalars: Option<ArrayArg>,
    scalar_range: Option<[f64; 2]>,
    cmap: Option<LookupTable>,
    options: PlotOptions,
}

impl MeshPlotBuilder {
    pub fn new(mesh: impl Into<MeshInput>) -> Self {
        Self {
            mesh: mesh.into(),
            scalars: None,
            tri_scalars: None,
            scalar_range: None,
            cmap: None,
            options: PlotOptions::default(),
        }
    }

    /// Per-corner scalars, shape `(N, 3)`
    pub fn scalars(mut self, scalars: impl Into<ArrayArg>) -> Self {
        self.scalars = Some(scalars.into());
        self
    }

    /// Per-triangle scalars, shape `(N,)`
    pub fn tri_scalars(mut self, tri_scalars: impl Into<ArrayArg>) -> Self {
        self.tri_scalars = Some(tri_scalars.into());
        self
    }

    /// Scalar range mapped onto the colormap; the scalars' range by default
    pub fn scalar_range(mut self, range: [f64; 2]) -> Self {
        self.scalar_range = Some(range);
        self
    }

    pub fn cmap(mut self, table: LookupTable) -> Self {
        self.cmap = Some(table);
        self
    }
}

/// Per-vertex RGBA from a per-corner `(N, 3, 3|4)` or per-triangle `(N, 3|4)`
/// color array. `None` for a single color.
fn vertex_colors(options: &PlotOptions, n: usize) -> PlotResult<Option<Vec<[f64; 4]>>> {
    let Some(ColorInput::Array(array)) = &options.color else {
        return Ok(None);
    };
    let (specs, repeat) = match array.ndim() {
        3 => (broadcast_colors(options.color.as_ref(), &[n, 3])?, 1),
        2 => (broadcast_colors(options.color.as_ref(), &[n])?, 3),
        _ => return Ok(None),
    };
    Ok(Some(
        specs
            .into_iter()
            .flat_map(|spec| {
                let ([r, g, b], a) = spec.with_opacity(options.opacity).or(DEFAULT_COLOR, 1.0);
                std::iter::repeat_n([r, g, b, a], repeat)
            })
            .collect(),
    ))
}

impl PlotBuilder for MeshPlotBuilder {
    type Output = MeshPlot;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<MeshPlot> {
        let MeshPlotBuilder {
            mesh,
            scalars,
            tri_scalars,
            scalar_range,
            cmap,
            options,
        } = self;
        let mesh = mesh.load()?;
        let n = mesh.num_triangles();

        let scalars = match (&scalars, &tri_scalars) {
            (Some(scalars), _) => Some(corner_scalars(scalars, n)?),
            (None, Some(tri_scalars)) => Some(triangle_scalars(tri_scalars, n)?),
            (None, None) => None,
        };
        let colors = vertex_colors(&options, n)?;
        let (rgb, alpha) = match colors {
            Some(_) => (DEFAULT_COLOR, options.opacity.unwrap_or(1.0)),
            None => options.resolve_color(DEFAULT_COLOR)?,
        };

        let mut polydata = PolyData::with_points(mesh.corners().collect());
        let mut polys = CellArray::new();
        for i in 0..n {
            polys.push_cell(&[3 * i, 3 * i + 1, 3 * i + 2]);
        }
        polydata.polys = polys;

        let range = match &scalars {
            Some(scalars) => scalar_range.or_else(|| nan_range(scalars)),
            None => None,
        };
        if let Some(scalars) = scalars {
            polydata.set_scalars(scalars)?;
        } else if let Some(colors) = colors {
            polydata.set_colors(colors)?;
        }

        let mut mapper = Mapper::from_polydata(polydata);
        if let Some(cmap) = cmap {
            mapper.set_lookup_table(shared_lookup_table(cmap));
        }
        if let Some(range) = range {
            mapper.set_scalar_range(range);
        }

        let figure = options.figure()?;
        let actor = Actor::geometry(mapper).with_color(rgb).with_opacity(alpha);
        let plot = options.attach(&figure, actor, PlotKind::Mesh)?;
        tracing::debug!("Mesh plot with {} triangles", n);
        Ok(MeshPlot { plot })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{Array2, Array3};

    use super::*;
    use crate::figure::FigureBuilder;

    fn tetrahedron() -> TriangleMesh {
        let v = [
            DVec3::ZERO,
            DVec3::X,
            DVec3::Y,
            DVec3::Z,
        ];
        TriangleMesh::new(vec![
            [v[0], v[2], v[1]],
            [v[0], v[1], v[3]],
            [v[0], v[3], v[2]],
            [v[1], v[2], v[3]],
        ])
    }

    #[test]
    fn test_triangle_soup_topology() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let plot = MeshPlotBuilder::new(tetrahedron()).fig(&fig).build().unwrap();
        assert_eq!(plot.num_vertices().unwrap(), 12);
        assert_eq!(plot.num_triangles().unwrap(), 4);
        let cells: Vec<Vec<usize>> = plot
            .with_polydata(|p| p.polys.iter().map(<[usize]>::to_vec).collect())
            .unwrap();
        assert_eq!(cells[1], vec![3, 4, 5]);
        assert!(cells.iter().flatten().all(|&i| i < 12));
    }

    #[test]
    fn test_tri_scalars_expand_per_corner() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let plot = MeshPlotBuilder::new(tetrahedron())
            .tri_scalars(vec![1.0, 2.0, f64::NAN, 4.0])
            .fig(&fig)
            .build()
            .unwrap();
        let scalars = plot
            .with_polydata(|p| match &p.point_data {
                vplot_core::PointData::Scalars(s) => s.clone(),
                _ => Vec::new(),
            })
            .unwrap();
        assert_eq!(scalars.len(), 12);
        assert_eq!(&scalars[3..6], &[2.0, 2.0, 2.0]);
        assert!(scalars[6].is_nan());
        assert_eq!(plot.scalar_range().unwrap(), [1.0, 4.0]);
    }

    #[test]
    fn test_scalar_shape_checked() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let result = MeshPlotBuilder::new(tetrahedron())
            .scalars(Array2::<f64>::zeros((3, 3)))
            .fig(&fig)
            .build();
        assert!(matches!(result, Err(PlotError::ShapeMismatch { .. })));
        assert!(fig.plots().is_empty());
    }

    #[test]
    fn test_explicit_range_and_update() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let plot = MeshPlotBuilder::new(tetrahedron())
            .scalars(Array2::<f64>::from_elem((4, 3), 0.5))
            .scalar_range([0.0, 10.0])
            .fig(&fig)
            .build()
            .unwrap();
        assert_eq!(plot.scalar_range().unwrap(), [0.0, 10.0]);
        let mut values = Array2::<f64>::zeros((4, 3));
        values[[3, 2]] = 7.0;
        plot.set_scalars(values).unwrap();
        assert_eq!(plot.scalar_range().unwrap(), [0.0, 7.0]);
    }

    #[test]
    fn test_per_triangle_colors() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let mut colors = Array2::<f64>::zeros((4, 4));
        colors[[2, 1]] = 1.0;
        colors.column_mut(3).fill(0.5);
        let plot = MeshPlotBuilder::new(tetrahedron())
            .color(colors)
            .fig(&fig)
            .build()
            .unwrap();
        let vertex_colors = plot
            .with_polydata(|p| match &p.point_data {
                vplot_core::PointData::Colors(c) => c.clone(),
                _ => Vec::new(),
            })
            .unwrap();
        assert_eq!(vertex_colors.len(), 12);
        assert_eq!(vertex_colors[7], [0.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_from_array_and_indexed() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let array = Array3::<f64>::zeros((2, 3, 3));
        let plot = MeshPlotBuilder::new(array).fig(&fig).build().unwrap();
        assert_eq!(plot.num_triangles().unwrap(), 2);

        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let plot = MeshPlotBuilder::new((vertices, vec![[0, 1, 2]]))
            .fig(&fig)
            .build()
            .unwrap();
        assert_eq!(plot.num_vertices().unwrap(), 3);
        assert_relative_eq!(plot.opacity().unwrap(), 1.0);
    }

    #[test]
    fn test_missing_file_is_mesh_error() {
        let fig = FigureBuilder::new().headless().build().unwrap();
        let result = MeshPlotBuilder::new(PathBuf::from("/nonexistent/model.stl"))
            .fig(&fig)
            .build();
        assert!(matches!(result, Err(PlotError::Mesh(_))));
    }
}
