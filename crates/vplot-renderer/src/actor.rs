//! Actors: the renderable units of a scene.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{DMat4, DVec2, DVec3};
use image::RgbaImage;
use vplot_core::BoundingBox;

use crate::camera::Camera;
use crate::mapper::{Mapper, SharedLookupTable};

/// Identity of an actor within a process.
///
/// Handles are lightweight and can be copied freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

impl ActorId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Surface appearance of an actor
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub color: [f64; 3],
    pub opacity: f64,
    pub line_width: f64,
    pub point_size: f64,
    /// Shade by surface normal; flat color when off
    pub lighting: bool,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            line_width: 1.0,
            point_size: 1.0,
            lighting: true,
        }
    }
}

impl Property {
    pub fn rgba(&self) -> [f64; 4] {
        let [r, g, b] = self.color;
        [r, g, b, self.opacity]
    }
}

/// World-space geometry that turns to face the camera
#[derive(Debug, Clone)]
pub struct Follower {
    pub mapper: Mapper,
    pub position: DVec3,
    pub scale: f64,
    /// Face the active camera; when off the geometry keeps the XY orientation
    pub follow_camera: bool,
}

impl Follower {
    /// Model matrix for the given camera.
    pub fn matrix(&self, camera: &Camera) -> DMat4 {
        let rotation = if self.follow_camera {
            let forward = (camera.position() - self.position).normalize_or_zero();
            let up = camera.orthogonal_view_up();
            let right = up.cross(forward).normalize_or_zero();
            if right == DVec3::ZERO || forward == DVec3::ZERO {
                DMat4::IDENTITY
            } else {
                let up = forward.cross(right);
                DMat4::from_cols(
                    right.extend(0.0),
                    up.extend(0.0),
                    forward.extend(0.0),
                    glam::DVec4::W,
                )
            }
        } else {
            DMat4::IDENTITY
        };
        DMat4::from_translation(self.position) * rotation * DMat4::from_scale(DVec3::splat(self.scale))
    }
}

/// Text anchored in display pixels, origin bottom-left
#[derive(Debug, Clone, PartialEq)]
pub struct TextActor {
    pub text: String,
    pub position: DVec2,
    pub font_size: f64,
}

/// Color ramp annotating a lookup table
#[derive(Debug, Clone)]
pub struct ScalarBarActor {
    pub lookup_table: SharedLookupTable,
    pub title: String,
    pub label_count: usize,
}

/// Marker drawn beside a legend label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendSymbol {
    #[default]
    Square,
    Circle,
    Line,
    Arrow,
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: [f64; 3],
    pub symbol: LegendSymbol,
}

/// Legend box in normalized viewport coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LegendActor {
    pub entries: Vec<LegendEntry>,
    /// Lower-left corner, `0..1` of the viewport
    pub position: DVec2,
    /// Width and height, `0..1` of the viewport
    pub size: DVec2,
}

impl Default for LegendActor {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            position: DVec2::new(0.7, 0.7),
            size: DVec2::new(0.25, 0.25),
        }
    }
}

/// Image pinned to the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ImageActor {
    pub image: RgbaImage,
    /// Lower-left corner in display pixels
    pub position: DVec2,
}

/// What an actor draws
#[derive(Debug, Clone)]
pub enum ActorKind {
    Geometry(Mapper),
    Follower(Follower),
    Text(TextActor),
    ScalarBar(ScalarBarActor),
    Legend(LegendActor),
    Image(ImageActor),
}

/// A renderable unit holding a transform, a property and what to draw
#[derive(Debug, Clone)]
pub struct Actor {
    id: ActorId,
    pub kind: ActorKind,
    pub property: Property,
    /// Applied to geometry actors on top of their mapper output
    pub user_matrix: DMat4,
    pub visible: bool,
}

impl Actor {
    pub fn new(kind: ActorKind) -> Self {
        Self {
            id: ActorId::next(),
            kind,
            property: Property::default(),
            user_matrix: DMat4::IDENTITY,
            visible: true,
        }
    }

    pub fn geometry(mapper: Mapper) -> Self {
        Self::new(ActorKind::Geometry(mapper))
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Sets the color.
    pub fn with_color(mut self, color: [f64; 3]) -> Self {
        self.property.color = color;
        self
    }

    /// Sets the opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.property.opacity = opacity;
        self
    }

    /// Sets the user transform.
    pub fn with_matrix(mut self, matrix: DMat4) -> Self {
        self.user_matrix = matrix;
        self
    }

    pub fn mapper(&self) -> Option<&Mapper> {
        match &self.kind {
            ActorKind::Geometry(m) => Some(m),
            ActorKind::Follower(f) => Some(&f.mapper),
            _ => None,
        }
    }

    pub fn mapper_mut(&mut self) -> Option<&mut Mapper> {
        match &mut self.kind {
            ActorKind::Geometry(m) => Some(m),
            ActorKind::Follower(f) => Some(&mut f.mapper),
            _ => None,
        }
    }

    /// Model matrix for the given camera, `None` for screen-space actors.
    pub fn model_matrix(&self, camera: &Camera) -> Option<DMat4> {
        match &self.kind {
            ActorKind::Geometry(_) => Some(self.user_matrix),
            ActorKind::Follower(f) => Some(self.user_matrix * f.matrix(camera)),
            _ => None,
        }
    }

    /// World-space bounds, `None` for screen-space actors and empty geometry.
    pub fn world_bounds(&self, camera: &Camera) -> Option<BoundingBox> {
        let matrix = self.model_matrix(camera)?;
        let bounds = self.mapper()?.bounds()?;
        Some(bounds.transform(&matrix))
    }
}
