//! Procedural geometry sources.
//!
//! Every source generates a fresh [`PolyData`] from its parameters, so plots
//! can change a parameter and the next render picks it up.

use std::f64::consts::PI;

use glam::DVec3;
use vplot_core::{BoundingBox, CellArray, PolyData};

use crate::font::{GRID_ROWS, strokes};

/// A procedural source feeding a mapper
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Sphere(SphereSource),
    Arrow(ArrowSource),
    Cursor(CursorSource),
    VectorText(VectorTextSource),
}

impl Source {
    pub fn output(&self) -> PolyData {
        match self {
            Source::Sphere(s) => s.output(),
            Source::Arrow(s) => s.output(),
            Source::Cursor(s) => s.output(),
            Source::VectorText(s) => s.output(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Source::Sphere(_) => "sphere",
            Source::Arrow(_) => "arrow",
            Source::Cursor(_) => "cursor",
            Source::VectorText(_) => "vector text",
        }
    }
}

/// Tessellated sphere with poles on the Z axis
#[derive(Debug, Clone, PartialEq)]
pub struct SphereSource {
    pub center: DVec3,
    pub radius: f64,
    /// Segments around the Z axis
    pub theta_resolution: u32,
    /// Rings from pole to pole
    pub phi_resolution: u32,
}

impl Default for SphereSource {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            radius: 0.5,
            theta_resolution: 16,
            phi_resolution: 16,
        }
    }
}

impl SphereSource {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            ..Default::default()
        }
    }

    pub fn with_resolution(mut self, theta: u32, phi: u32) -> Self {
        self.theta_resolution = theta.max(3);
        self.phi_resolution = phi.max(2);
        self
    }

    pub fn output(&self) -> PolyData {
        let segments = self.theta_resolution.max(3) as usize;
        let rings = self.phi_resolution.max(2) as usize;
        let mut points = Vec::with_capacity((rings + 1) * (segments + 1));

        for ring in 0..=rings {
            let phi = PI * ring as f64 / rings as f64;
            let z = phi.cos();
            let ring_radius = phi.sin();
            for seg in 0..=segments {
                let theta = 2.0 * PI * seg as f64 / segments as f64;
                let unit = DVec3::new(ring_radius * theta.cos(), ring_radius * theta.sin(), z);
                points.push(self.center + unit * self.radius);
            }
        }

        let mut polys = CellArray::new();
        for ring in 0..rings {
            for seg in 0..segments {
                let current = ring * (segments + 1) + seg;
                let next = current + segments + 1;
                // Degenerate triangles at the poles are skipped.
                if ring != 0 {
                    polys.push_cell(&[current, next, current + 1]);
                }
                if ring != rings - 1 {
                    polys.push_cell(&[current + 1, next, next + 1]);
                }
            }
        }

        let mut output = PolyData::with_points(points);
        output.polys = polys;
        output
    }
}

/// Unit arrow from the origin to `(1, 0, 0)`: a cylindrical shaft and a conical tip
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowSource {
    pub tip_length: f64,
    pub tip_radius: f64,
    pub shaft_radius: f64,
    pub resolution: u32,
}

impl Default for ArrowSource {
    fn default() -> Self {
        Self {
            tip_length: 0.35,
            tip_radius: 0.1,
            shaft_radius: 0.03,
            resolution: 12,
        }
    }
}

impl ArrowSource {
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution.max(3);
        self
    }

    pub fn output(&self) -> PolyData {
        let segments = self.resolution.max(3) as usize;
        let shaft_end = 1.0 - self.tip_length;
        let ring = |x: f64, radius: f64| -> Vec<DVec3> {
            (0..segments)
                .map(|seg| {
                    let theta = 2.0 * PI * seg as f64 / segments as f64;
                    DVec3::new(x, radius * theta.cos(), radius * theta.sin())
                })
                .collect()
        };

        let mut points = Vec::new();
        let mut polys = CellArray::new();

        // Shaft: back cap center, back ring, front ring
        let back_center = points.len();
        points.push(DVec3::ZERO);
        let back = points.len();
        points.extend(ring(0.0, self.shaft_radius));
        let front = points.len();
        points.extend(ring(shaft_end, self.shaft_radius));

        // Tip: base center, base ring, apex
        let base_center = points.len();
        points.push(DVec3::new(shaft_end, 0.0, 0.0));
        let base = points.len();
        points.extend(ring(shaft_end, self.tip_radius));
        let apex = points.len();
        points.push(DVec3::X);

        for seg in 0..segments {
            let next = (seg + 1) % segments;
            polys.push_cell(&[back_center, back + next, back + seg]);
            polys.push_cell(&[back + seg, back + next, front + next]);
            polys.push_cell(&[back + seg, front + next, front + seg]);
            polys.push_cell(&[base_center, base + next, base + seg]);
            polys.push_cell(&[base + seg, base + next, apex]);
        }

        let mut output = PolyData::with_points(points);
        output.polys = polys;
        output
    }
}

/// 3D crosshair: three axis lines through a focal point, optionally boxed
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSource {
    pub focal_point: DVec3,
    pub model_bounds: BoundingBox,
    pub axes: bool,
    pub outline: bool,
    /// Move the model bounds with the focal point instead of clamping the
    /// focal point to them.
    pub translation_mode: bool,
}

impl Default for CursorSource {
    fn default() -> Self {
        Self {
            focal_point: DVec3::ZERO,
            model_bounds: BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0)),
            axes: true,
            outline: true,
            translation_mode: false,
        }
    }
}

impl CursorSource {
    /// The bounds actually drawn.
    pub fn effective_bounds(&self) -> BoundingBox {
        if self.translation_mode {
            let half = self.model_bounds.size() * 0.5;
            BoundingBox::new(self.focal_point - half, self.focal_point + half)
        } else {
            self.model_bounds
        }
    }

    pub fn output(&self) -> PolyData {
        let bounds = self.effective_bounds();
        let focal = if self.translation_mode {
            self.focal_point
        } else {
            self.focal_point.clamp(bounds.min, bounds.max)
        };

        let mut points = Vec::new();
        let mut lines = CellArray::new();

        if self.axes {
            for axis in 0..3 {
                let mut start = focal;
                let mut end = focal;
                start[axis] = bounds.min[axis];
                end[axis] = bounds.max[axis];
                let i = points.len();
                points.push(start);
                points.push(end);
                lines.push_cell(&[i, i + 1]);
            }
        }

        if self.outline {
            let offset = points.len();
            points.extend(bounds.corners());
            // corners() orders x fastest, then y, then z
            #[rustfmt::skip]
            const EDGES: [[usize; 2]; 12] = [
                [0, 1], [2, 3], [4, 5], [6, 7],
                [0, 2], [1, 3], [4, 6], [5, 7],
                [0, 4], [1, 5], [2, 6], [3, 7],
            ];
            for [a, b] in EDGES {
                lines.push_cell(&[offset + a, offset + b]);
            }
        }

        let mut output = PolyData::with_points(points);
        output.lines = lines;
        output
    }
}

/// Text laid out in the XY plane as stroke glyphs, one unit per line of text
///
/// The first line sits on top; the text box spans `(0, 0)` to
/// [`extent`](Self::extent).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorTextSource {
    pub text: String,
}

/// Advance per character relative to the line height
pub const GLYPH_ASPECT: f64 = 0.6;
/// Glyph cap height relative to the line height
const GLYPH_HEIGHT: f64 = 0.7;
/// Gap below the baseline of each line
const GLYPH_DESCENT: f64 = 0.15;

impl VectorTextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Width and height of the text box in model units
    pub fn extent(&self) -> (f64, f64) {
        let lines = self.text.lines().count().max(1);
        let longest = self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        (longest as f64 * GLYPH_ASPECT, lines as f64)
    }

    /// One line cell per glyph stroke.
    pub fn output(&self) -> PolyData {
        let rows = self.text.lines().count().max(1);
        let unit = GLYPH_HEIGHT / GRID_ROWS;
        let cell = DVec3::new(unit, unit, 0.0);
        let mut points = Vec::new();
        let mut lines = CellArray::new();
        for (row, line) in self.text.lines().enumerate() {
            let baseline = (rows - 1 - row) as f64 + GLYPH_DESCENT;
            for (col, ch) in line.chars().enumerate() {
                let origin = DVec3::new(col as f64 * GLYPH_ASPECT + 0.05, baseline, 0.0);
                for stroke in strokes(ch) {
                    let first = points.len();
                    points.extend(stroke.iter().map(|p| origin + DVec3::new(p.x, p.y, 0.0) * cell));
                    let ids: Vec<usize> = (first..points.len()).collect();
                    lines.push_cell(&ids);
                }
            }
        }
        let mut output = PolyData::with_points(points);
        output.lines = lines;
        output
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_sphere_is_on_radius() {
        let sphere = SphereSource::new(DVec3::new(1.0, 2.0, 3.0), 2.0).with_resolution(8, 6);
        let output = sphere.output();
        output.validate().unwrap();
        for p in &output.points {
            assert_relative_eq!(p.distance(sphere.center), 2.0, epsilon = 1e-12);
        }
        // Two triangles per quad minus one per segment at each pole.
        assert_eq!(output.polys.len(), 2 * 8 * 6 - 2 * 8);
    }

    #[test]
    fn test_arrow_spans_unit_x() {
        let output = ArrowSource::default().output();
        output.validate().unwrap();
        let bounds = output.bounds().unwrap();
        assert_relative_eq!(bounds.min.x, 0.0);
        assert_relative_eq!(bounds.max.x, 1.0);
        assert_relative_eq!(bounds.max.y, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_cursor_translation_mode_centres_on_focal_point() {
        let cursor = CursorSource {
            focal_point: DVec3::new(10.0, 0.0, 0.0),
            outline: false,
            translation_mode: true,
            ..Default::default()
        };
        let output = cursor.output();
        assert_eq!(output.lines.len(), 3);
        assert!(output.verts.is_empty());
        let bounds = output.bounds().unwrap();
        assert_eq!(bounds.center(), DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(bounds.size(), DVec3::splat(2.0));
    }

    #[test]
    fn test_cursor_outline() {
        let output = CursorSource::default().output();
        assert_eq!(output.lines.len(), 3 + 12);
        output.validate().unwrap();
    }

    #[test]
    fn test_vector_text_extent() {
        let text = VectorTextSource::new("ab\nlonger");
        let (w, h) = text.extent();
        assert_relative_eq!(w, 6.0 * GLYPH_ASPECT);
        assert_relative_eq!(h, 2.0);
        assert!(text.output().polys.is_empty());
    }

    #[test]
    fn test_vector_text_strokes_inside_box() {
        let text = VectorTextSource::new("Hi\n1");
        let output = text.output();
        output.validate().unwrap();
        // H has three strokes, I three, 1 two.
        assert_eq!(output.lines.len(), 8);
        let (w, h) = text.extent();
        let bounds = output.bounds().unwrap();
        assert!(bounds.min.x >= 0.0 && bounds.min.y >= 0.0);
        assert!(bounds.max.x <= w && bounds.max.y <= h);
        // The first line is drawn above the second.
        assert!(bounds.max.y > 1.0);
    }

    #[test]
    fn test_vector_text_blank() {
        assert_eq!(VectorTextSource::new("  ").output().num_points(), 0);
    }
}
