//! vplot Core Data Structures
//!
//! This crate contains the backend-independent parts of vplot:
//! - PlotError: the error kinds every plotting call can raise
//! - Colors: the named color table, the color resolver and lookup tables
//! - Broadcasting: turning array-shaped arguments into per-element values
//! - Geometry: orthonormal bases, highest points, bounding boxes
//! - PolyData: explicit vertex + cell geometry
//! - Mesh: triangle mesh ingestion (STL, OBJ)
//! - Config: user preferences stored as RON

pub mod broadcast;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod path;
pub mod polydata;

pub use broadcast::*;
pub use color::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
pub use mesh::*;
pub use path::*;
pub use polydata::*;
