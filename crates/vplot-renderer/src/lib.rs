//! vplot Renderer
//!
//! The scene graph behind a vplot figure, rendered in software.
//!
//! # Architecture
//!
//! - [`source::Source`] - procedural geometry (sphere, arrow, cursor, vector text)
//! - [`mapper::Mapper`] - turns a source or explicit [`PolyData`] into drawable geometry
//! - [`actor::Actor`] - a renderable unit with a property and a transform
//! - [`scene::Scene`] - the ordered actor list, background and active camera
//! - [`window::RenderWindow`] - the render surface producing RGBA frames
//! - [`raster`] - the CPU rasterizer used by the render window
//! - [`overlay`] - text labels painted over rendered frames
//! - [`image_io`] - screenshot writer and image reader
//!
//! # Example
//!
//! ```ignore
//! use vplot_renderer::{Actor, Mapper, RenderWindow, Scene, Source, SphereSource};
//!
//! let mut scene = Scene::new();
//! let mapper = Mapper::from_source(Source::Sphere(SphereSource::default()));
//! scene.add_actor(Actor::geometry(mapper));
//! scene.reset_camera();
//!
//! let mut window = RenderWindow::new(400, 300, "example");
//! let frame = window.render(&mut scene)?;
//! ```
//!
//! [`PolyData`]: vplot_core::PolyData

pub mod actor;
pub mod camera;
pub mod font;
pub mod image_io;
pub mod mapper;
pub mod observer;
pub mod overlay;
pub mod raster;
pub mod scene;
pub mod source;
pub mod window;

pub use actor::*;
pub use camera::Camera;
pub use image_io::{ImageFormat, read_image, write_image};
pub use mapper::{Mapper, MapperInput, SharedLookupTable, shared_lookup_table};
pub use observer::{ErrorObserver, SharedObserver, TracingObserver};
pub use overlay::Label;
pub use scene::Scene;
pub use source::*;
pub use window::{Frame, RenderWindow};
