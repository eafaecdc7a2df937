//! Triangle mesh ingestion (STL, OBJ formats)

use std::io::BufReader;
use std::path::Path;

use glam::DVec3;

use crate::broadcast::ArrayArg;
use crate::error::{PlotError, PlotResult};
use crate::geometry::BoundingBox;

/// A triangle soup: `N` triangles of three corners each.
///
/// This is the `(N, 3, 3)` "vectors" layout; corners are not shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vectors: Vec<[DVec3; 3]>,
}

impl TriangleMesh {
    pub fn new(vectors: Vec<[DVec3; 3]>) -> Self {
        Self { vectors }
    }

    /// Build from shared vertices and triangle indices.
    pub fn from_indexed(vertices: &[DVec3], faces: &[[usize; 3]]) -> PlotResult<Self> {
        let vectors = faces
            .iter()
            .map(|face| {
                let corner = |i: usize| {
                    vertices.get(i).copied().ok_or_else(|| {
                        PlotError::shape("faces", &[i], format!("indices below {}", vertices.len()))
                    })
                };
                Ok([corner(face[0])?, corner(face[1])?, corner(face[2])?])
            })
            .collect::<PlotResult<Vec<_>>>()?;
        Ok(Self { vectors })
    }

    /// Build from an `(N, 3, 3)` array.
    pub fn from_array(array: &ArrayArg) -> PlotResult<Self> {
        if !matches!(array.shape(), [_, 3, 3]) {
            return Err(PlotError::shape("mesh vectors", array.shape(), "(N, 3, 3)"));
        }
        let vectors = array
            .as_slice()
            .chunks(9)
            .map(|t| {
                [
                    DVec3::new(t[0], t[1], t[2]),
                    DVec3::new(t[3], t[4], t[5]),
                    DVec3::new(t[6], t[7], t[8]),
                ]
            })
            .collect();
        Ok(Self { vectors })
    }

    pub fn num_triangles(&self) -> usize {
        self.vectors.len()
    }

    /// All corners, flattened to `3N` points.
    pub fn corners(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.vectors.iter().flat_map(|t| t.iter().copied())
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        let corners: Vec<DVec3> = self.corners().collect();
        BoundingBox::from_points(&corners)
    }

    /// Unit normal of each triangle (zero for degenerate triangles).
    pub fn normals(&self) -> Vec<DVec3> {
        self.vectors
            .iter()
            .map(|[a, b, c]| (*b - *a).cross(*c - *a).normalize_or_zero())
            .collect()
    }
}

impl From<&TriangleMesh> for ArrayArg {
    /// The `(N, 3, 3)` vectors array.
    fn from(mesh: &TriangleMesh) -> Self {
        let data = mesh.corners().flat_map(|p| p.to_array()).collect();
        ArrayArg::from_parts(vec![mesh.num_triangles(), 3, 3], data)
    }
}

/// Detect mesh format from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
    Unknown,
}

impl MeshFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => MeshFormat::Stl,
            Some("obj") => MeshFormat::Obj,
            _ => MeshFormat::Unknown,
        }
    }

    /// Check if the format is supported
    pub fn is_supported(&self) -> bool {
        matches!(self, MeshFormat::Stl | MeshFormat::Obj)
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "STL",
            MeshFormat::Obj => "OBJ",
            MeshFormat::Unknown => "Unknown",
        }
    }
}

/// Load any supported mesh format
pub fn load_mesh(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshError> {
    let path = path.as_ref();
    let mesh = match MeshFormat::from_path(path) {
        MeshFormat::Stl => load_stl(path)?,
        MeshFormat::Obj => load_obj(path)?,
        MeshFormat::Unknown => {
            return Err(MeshError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            ));
        }
    };

    if mesh.vectors.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    tracing::debug!(
        "Loaded {} triangles from {:?}",
        mesh.num_triangles(),
        path
    );
    Ok(mesh)
}

/// Load an STL file (ASCII or binary)
pub fn load_stl(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshError> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let mesh = stl_io::read_stl(&mut reader).map_err(|e| MeshError::Parse(e.to_string()))?;

    let vertex = |i: usize| -> Result<DVec3, MeshError> {
        let v = mesh
            .vertices
            .get(i)
            .ok_or_else(|| MeshError::Parse(format!("vertex index {i} out of range")))?;
        Ok(DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64))
    };

    let vectors = mesh
        .faces
        .iter()
        .map(|face| {
            Ok([
                vertex(face.vertices[0])?,
                vertex(face.vertices[1])?,
                vertex(face.vertices[2])?,
            ])
        })
        .collect::<Result<Vec<_>, MeshError>>()?;

    Ok(TriangleMesh { vectors })
}

/// Load a Wavefront OBJ file, triangulating polygons
pub fn load_obj(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj(path.as_ref(), &options).map_err(|e| MeshError::Parse(e.to_string()))?;

    let mut vectors = Vec::new();
    for model in &models {
        let positions = &model.mesh.positions;
        let vertex = |i: u32| -> Result<DVec3, MeshError> {
            let i = i as usize * 3;
            match positions.get(i..i + 3) {
                Some(p) => Ok(DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
                None => Err(MeshError::Parse(format!("vertex index {} out of range", i / 3))),
            }
        };
        for tri in model.mesh.indices.chunks_exact(3) {
            vectors.push([vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?]);
        }
    }

    Ok(TriangleMesh { vectors })
}

/// Save a mesh as a binary STL file
pub fn save_stl(mesh: &TriangleMesh, path: impl AsRef<Path>) -> Result<(), MeshError> {
    let triangles: Vec<stl_io::Triangle> = mesh
        .vectors
        .iter()
        .zip(mesh.normals())
        .map(|(corners, normal)| {
            let v = |p: DVec3| stl_io::Vertex::new(p.as_vec3().to_array());
            stl_io::Triangle {
                normal: stl_io::Normal::new(normal.as_vec3().to_array()),
                vertices: [v(corners[0]), v(corners[1]), v(corners[2])],
            }
        })
        .collect();

    let mut file = std::fs::File::create(path.as_ref()).map_err(|e| MeshError::Io(e.to_string()))?;
    stl_io::write_stl(&mut file, triangles.iter()).map_err(|e| MeshError::Write(e.to_string()))?;
    Ok(())
}

/// Mesh-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Write error: {0}")]
    Write(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> TriangleMesh {
        let v = [
            DVec3::ZERO,
            DVec3::X,
            DVec3::Y,
            DVec3::Z,
        ];
        TriangleMesh::from_indexed(&v, &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(MeshFormat::from_path(Path::new("a/b.STL")), MeshFormat::Stl);
        assert_eq!(MeshFormat::from_path(Path::new("b.obj")), MeshFormat::Obj);
        assert!(!MeshFormat::from_path(Path::new("b.ply")).is_supported());
    }

    #[test]
    fn test_from_indexed_bad_index() {
        assert!(TriangleMesh::from_indexed(&[DVec3::ZERO], &[[0, 0, 1]]).is_err());
    }

    #[test]
    fn test_stl_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tetra.stl");
        let mesh = tetrahedron();
        save_stl(&mesh, &path).unwrap();

        let loaded = load_mesh(&path).unwrap();
        assert_eq!(loaded.num_triangles(), 4);
        let bounds = loaded.bounds().unwrap();
        assert_eq!(bounds.min, DVec3::ZERO);
        assert_eq!(bounds.max, DVec3::ONE);
    }

    #[test]
    fn test_obj_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        let mesh = load_mesh(&path).unwrap();
        assert_eq!(mesh.num_triangles(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        assert_eq!(
            load_mesh("model.ply"),
            Err(MeshError::UnsupportedFormat("ply".to_string()))
        );
    }

    #[test]
    fn test_array_conversion() {
        let mesh = tetrahedron();
        let arg = ArrayArg::from(&mesh);
        assert_eq!(arg.shape(), &[4, 3, 3]);
        assert_eq!(TriangleMesh::from_array(&arg).unwrap(), mesh);
    }
}
