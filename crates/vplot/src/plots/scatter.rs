//! Scatter plots: one sphere or 3D cursor per point.

use glam::DVec3;
use vplot_core::{ArrayArg, BoundingBox, PlotConfig, PlotError, PlotResult, broadcast_points, broadcast_scalars};
use vplot_renderer::{Actor, CursorSource, Mapper, Source, SphereSource};

use super::{DEFAULT_COLOR, element_shape};
use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions, single};

#[derive(Debug, Clone)]
pub struct Sphere {
    plot: Plot,
}

plot_handle!(Sphere);

impl Sphere {
    fn with_source<R>(&self, f: impl FnOnce(&mut SphereSource) -> R) -> PlotResult<R> {
        self.with_actor_mut(|a| match a.mapper_mut().and_then(|m| m.source_mut()) {
            Some(Source::Sphere(sphere)) => Ok(f(sphere)),
            _ => Err(PlotError::PlotRemoved),
        })?
    }

    pub fn center(&self) -> PlotResult<DVec3> {
        self.with_source(|s| s.center)
    }

    pub fn set_center(&self, center: DVec3) -> PlotResult<()> {
        self.with_source(|s| s.center = center)
    }

    pub fn radius(&self) -> PlotResult<f64> {
        self.with_source(|s| s.radius)
    }

    pub fn set_radius(&self, radius: f64) -> PlotResult<()> {
        self.with_source(|s| s.radius = radius)
    }
}

/// One sphere per point
#[derive(Debug, Clone)]
pub struct SphereBuilder {
    points: ArrayArg,
    radius: ArrayArg,
    options: PlotOptions,
}

impl SphereBuilder {
    pub fn new(points: impl Into<ArrayArg>) -> Self {
        Self {
            points: points.into(),
            radius: ArrayArg::scalar(1.0),
            options: PlotOptions::default(),
        }
    }

    /// Sphere radius, scalar or one per point
    pub fn radius(mut self, radius: impl Into<ArrayArg>) -> Self {
        self.radius = radius.into();
        self
    }

    pub fn build_one(self) -> PlotResult<Sphere> {
        single(self.build()?, "scatter")
    }
}

impl PlotBuilder for SphereBuilder {
    type Output = Vec<Sphere>;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Vec<Sphere>> {
        let shape = element_shape(&[(&self.points, "points")])?;
        let centers = broadcast_points(&self.points, &shape, "points")?;
        let radii = broadcast_scalars(&self.radius, &shape, "radius")?;
        let colors = self.options.broadcast_colors(&shape, DEFAULT_COLOR)?;
        let quality = &PlotConfig::global().quality;

        let actors: Vec<Actor> = centers
            .zip(radii)
            .zip(colors)
            .map(|((center, radius), (rgb, alpha))| {
                let source = SphereSource::new(center, radius).with_resolution(
                    quality.sphere_theta_resolution,
                    quality.sphere_phi_resolution,
                );
                Actor::geometry(Mapper::from_source(Source::Sphere(source)))
                    .with_color(rgb)
                    .with_opacity(alpha)
            })
            .collect();

        let figure = self.options.figure()?;
        actors
            .into_iter()
            .map(|actor| {
                let plot = self.options.attach(&figure, actor, PlotKind::Sphere)?;
                Ok(Sphere { plot })
            })
            .collect()
    }
}

/// A 3D crosshair that moves with its focal point
#[derive(Debug, Clone)]
pub struct Cursor {
    plot: Plot,
}

plot_handle!(Cursor);

impl Cursor {
    fn with_source<R>(&self, f: impl FnOnce(&mut CursorSource) -> R) -> PlotResult<R> {
        self.with_actor_mut(|a| match a.mapper_mut().and_then(|m| m.source_mut()) {
            Some(Source::Cursor(cursor)) => Ok(f(cursor)),
            _ => Err(PlotError::PlotRemoved),
        })?
    }

    pub fn focal_point(&self) -> PlotResult<DVec3> {
        self.with_source(|s| s.focal_point)
    }

    pub fn set_focal_point(&self, point: DVec3) -> PlotResult<()> {
        self.with_source(|s| s.focal_point = point)
    }
}

/// One cursor per point
#[derive(Debug, Clone)]
pub struct CursorBuilder {
    points: ArrayArg,
    radius: ArrayArg,
    line_width: f64,
    options: PlotOptions,
}

impl CursorBuilder {
    pub fn new(points: impl Into<ArrayArg>) -> Self {
        Self {
            points: points.into(),
            radius: ArrayArg::scalar(1.0),
            line_width: 1.0,
            options: PlotOptions::default(),
        }
    }

    /// Half-length of each crosshair arm
    pub fn radius(mut self, radius: impl Into<ArrayArg>) -> Self {
        self.radius = radius.into();
        self
    }

    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    pub fn build_one(self) -> PlotResult<Cursor> {
        single(self.build()?, "cursor")
    }
}

impl PlotBuilder for CursorBuilder {
    type Output = Vec<Cursor>;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Vec<Cursor>> {
        let shape = element_shape(&[(&self.points, "points")])?;
        let centers = broadcast_points(&self.points, &shape, "points")?;
        let radii = broadcast_scalars(&self.radius, &shape, "radius")?;
        let colors = self.options.broadcast_colors(&shape, DEFAULT_COLOR)?;

        let actors: Vec<Actor> = centers
            .zip(radii)
            .zip(colors)
            .map(|((center, radius), (rgb, alpha))| {
                let half = DVec3::splat(radius);
                let source = CursorSource {
                    focal_point: center,
                    model_bounds: BoundingBox::new(center - half, center + half),
                    outline: false,
                    translation_mode: true,
                    ..Default::default()
                };
                let mut actor = Actor::geometry(Mapper::from_source(Source::Cursor(source)))
                    .with_color(rgb)
                    .with_opacity(alpha);
                actor.property.line_width = self.line_width;
                actor.property.lighting = false;
                actor
            })
            .collect();

        let figure = self.options.figure()?;
        actors
            .into_iter()
            .map(|actor| {
                let plot = self.options.attach(&figure, actor, PlotKind::Cursor)?;
                Ok(Cursor { plot })
            })
            .collect()
    }
}
