//! Arrows and quiver plots.

use glam::{DMat4, DVec3};
use vplot_core::{ArrayArg, PlotConfig, PlotResult, arrow_transform, broadcast_points, broadcast_scalars};
use vplot_renderer::{Actor, ArrowSource, Mapper, Source};

use super::{DEFAULT_COLOR, element_shape};
use crate::plot::{Plot, PlotBuilder, PlotKind, PlotOptions, single};

/// A unit arrow moved into place by its actor transform
#[derive(Debug, Clone)]
pub struct Arrow {
    plot: Plot,
}

plot_handle!(Arrow);

impl Arrow {
    /// The transform taking the unit arrow to its place
    pub fn transform(&self) -> PlotResult<DMat4> {
        self.with_actor(|a| a.user_matrix)
    }

    /// Move the arrow. `length` defaults to `|end - start|`.
    pub fn set_ends(&self, start: DVec3, end: DVec3, length: Option<f64>) -> PlotResult<()> {
        let direction = end - start;
        let matrix = arrow_transform(start, direction, length.unwrap_or(direction.length()))?;
        self.with_actor_mut(|a| a.user_matrix = matrix)
    }
}

/// Arrows from `start` to `end`, one per broadcast element
#[derive(Debug, Clone)]
pub struct ArrowBuilder {
    start: ArrayArg,
    end: ArrayArg,
    length: Option<ArrayArg>,
    options: PlotOptions,
}

impl ArrowBuilder {
    pub fn new(start: impl Into<ArrayArg>, end: impl Into<ArrayArg>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            length: None,
            options: PlotOptions::default(),
        }
    }

    /// Arrow length, scalar or one per element
    pub fn length(mut self, length: impl Into<ArrayArg>) -> Self {
        self.length = Some(length.into());
        self
    }

    pub fn build_one(self) -> PlotResult<Arrow> {
        single(self.build()?, "arrow")
    }
}

impl PlotBuilder for ArrowBuilder {
    type Output = Vec<Arrow>;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Vec<Arrow>> {
        let shape = element_shape(&[(&self.start, "start"), (&self.end, "end")])?;
        let starts: Vec<DVec3> = broadcast_points(&self.start, &shape, "start")?.collect();
        let ends = broadcast_points(&self.end, &shape, "end")?;
        let directions: Vec<DVec3> = starts.iter().zip(ends).map(|(s, e)| e - *s).collect();
        let lengths: Vec<f64> = match &self.length {
            Some(length) => broadcast_scalars(length, &shape, "length")?.collect(),
            None => directions.iter().map(|d| d.length()).collect(),
        };
        build_arrows(&shape, &starts, &directions, &lengths, &self.options)
    }
}

/// Arrows at `points` along `gradient`, sized by the gradient magnitude
#[derive(Debug, Clone)]
pub struct QuiverBuilder {
    points: ArrayArg,
    gradient: ArrayArg,
    length: Option<ArrayArg>,
    length_scale: f64,
    options: PlotOptions,
}

impl QuiverBuilder {
    pub fn new(points: impl Into<ArrayArg>, gradient: impl Into<ArrayArg>) -> Self {
        Self {
            points: points.into(),
            gradient: gradient.into(),
            length: None,
            length_scale: 1.0,
            options: PlotOptions::default(),
        }
    }

    /// Override the arrow length; defaults to `|gradient|`
    pub fn length(mut self, length: impl Into<ArrayArg>) -> Self {
        self.length = Some(length.into());
        self
    }

    /// Multiplies every length
    pub fn length_scale(mut self, scale: f64) -> Self {
        self.length_scale = scale;
        self
    }

    pub fn build_one(self) -> PlotResult<Arrow> {
        single(self.build()?, "quiver")
    }
}

impl PlotBuilder for QuiverBuilder {
    type Output = Vec<Arrow>;

    fn options_mut(&mut self) -> &mut PlotOptions {
        &mut self.options
    }

    fn build(self) -> PlotResult<Vec<Arrow>> {
        let shape = element_shape(&[(&self.points, "points"), (&self.gradient, "gradient")])?;
        let starts: Vec<DVec3> = broadcast_points(&self.points, &shape, "points")?.collect();
        let gradients: Vec<DVec3> = broadcast_points(&self.gradient, &shape, "gradient")?.collect();
        let lengths: Vec<f64> = match &self.length {
            Some(length) => broadcast_scalars(length, &shape, "length")?.collect(),
            None => gradients.iter().map(|g| g.length()).collect(),
        };
        let lengths: Vec<f64> = lengths.iter().map(|l| l * self.length_scale).collect();
        build_arrows(&shape, &starts, &gradients, &lengths, &self.options)
    }
}

/// Every transform is computed before the first arrow is attached, so a bad
/// direction leaves the figure untouched.
fn build_arrows(
    shape: &[usize],
    starts: &[DVec3],
    directions: &[DVec3],
    lengths: &[f64],
    options: &PlotOptions,
) -> PlotResult<Vec<Arrow>> {
    let colors = options.broadcast_colors(shape, DEFAULT_COLOR)?;
    let resolution = PlotConfig::global().quality.arrow_resolution;

    let actors = starts
        .iter()
        .zip(directions)
        .zip(lengths)
        .zip(colors)
        .map(|(((start, direction), length), (rgb, alpha))| {
            let matrix = arrow_transform(*start, *direction, *length)?;
            let source = ArrowSource::default().with_resolution(resolution);
            Ok(Actor::geometry(Mapper::from_source(Source::Arrow(source)))
                .with_color(rgb)
                .with_opacity(alpha)
                .with_matrix(matrix))
        })
        .collect::<PlotResult<Vec<_>>>()?;

    let figure = options.figure()?;
    actors
        .into_iter()
        .map(|actor| {
            let plot = options.attach(&figure, actor, PlotKind::Arrow)?;
            Ok(Arrow { plot })
        })
        .collect()
}
