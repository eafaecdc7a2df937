//! Small vector helpers used by the plot kinds.

use glam::{DMat3, DMat4, DVec3};

use crate::error::{PlotError, PlotResult};

/// Tolerance for treating a vector as zero or two directions as colinear.
const EPSILON: f64 = 1e-9;

/// Reference "up" vectors, in order of preference, for [`orthogonal_bases`].
const UP_CANDIDATES: [DVec3; 2] = [DVec3::Z, DVec3::Y];

/// Euclidean distance between two points.
pub fn distance(a: DVec3, b: DVec3) -> f64 {
    a.distance(b)
}

/// Normalize a vector, failing on zero length.
pub fn normalise(v: DVec3) -> PlotResult<DVec3> {
    let length = v.length();
    if length < EPSILON || !length.is_finite() {
        return Err(PlotError::shape(
            "direction",
            &[3],
            "a finite non-zero vector",
        ));
    }
    Ok(v / length)
}

/// A right-handed orthonormal basis `(eX, eY, eZ)` with `eX = v / |v|`.
///
/// `eZ` is the first of `[+Z, +Y]` that is not colinear with `v`, made
/// orthogonal to `eX`; `eY = eZ x eX`.
pub fn orthogonal_bases(v: DVec3) -> PlotResult<[DVec3; 3]> {
    let e_x = normalise(v)?;

    let up = UP_CANDIDATES
        .iter()
        .copied()
        .find(|up| e_x.cross(*up).length() > EPSILON)
        .unwrap_or(DVec3::Y);

    let e_z = (up - up.dot(e_x) * e_x).normalize();
    let e_y = e_z.cross(e_x);
    Ok([e_x, e_y, e_z])
}

/// The rotation matrix whose columns are the basis from [`orthogonal_bases`].
pub fn rotation_to(direction: DVec3) -> PlotResult<DMat3> {
    let [e_x, e_y, e_z] = orthogonal_bases(direction)?;
    Ok(DMat3::from_cols(e_x, e_y, e_z))
}

/// The transform `translate(start) * rotate(+X -> direction) * scale(length)`.
pub fn arrow_transform(start: DVec3, direction: DVec3, length: f64) -> PlotResult<DMat4> {
    let rotation = rotation_to(direction)?;
    Ok(DMat4::from_translation(start)
        * DMat4::from_mat3(rotation)
        * DMat4::from_scale(DVec3::splat(length)))
}

/// The index and value of the point furthest along `direction`.
///
/// Ties go to the lowest index. Returns `None` for an empty slice.
pub fn highest(points: &[DVec3], direction: DVec3) -> Option<(usize, DVec3)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let height = p.dot(direction);
        if best.is_none_or(|(_, h)| height > h) {
            best = Some((i, height));
        }
    }
    best.map(|(i, _)| (i, points[i]))
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// The bounds of a set of points, ignoring non-finite ones.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<Self> {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<BoundingBox>, p| match acc {
                None => Some(BoundingBox::new(*p, *p)),
                Some(b) => Some(BoundingBox::new(b.min.min(*p), b.max.max(*p))),
            })
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    /// The bounds of this box after a transform.
    pub fn transform(&self, matrix: &DMat4) -> BoundingBox {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        BoundingBox::from_points(&corners).unwrap_or(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthonormal(v: DVec3) {
        let [x, y, z] = orthogonal_bases(v).unwrap();
        for e in [x, y, z] {
            assert_relative_eq!(e.length(), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(x.dot(y), 0.0, epsilon = 1e-12);
        assert_relative_eq!(y.dot(z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.dot(x), 0.0, epsilon = 1e-12);
        assert!((x.cross(y) - z).length() < 1e-12, "not right-handed for {v}");
        assert!((x - v.normalize()).length() < 1e-12);
    }

    #[test]
    fn test_orthogonal_bases() {
        for v in [
            DVec3::X,
            DVec3::Y,
            DVec3::Z,
            DVec3::NEG_Z,
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-0.3, 0.0, 1e-3),
        ] {
            assert_orthonormal(v);
        }
    }

    #[test]
    fn test_orthogonal_bases_up_tie_break() {
        // Parallel to +Z: the reference up falls back to +Y.
        let [_, _, z] = orthogonal_bases(DVec3::Z).unwrap();
        assert_eq!(z, DVec3::Y);
        let [_, _, z] = orthogonal_bases(DVec3::X).unwrap();
        assert_eq!(z, DVec3::Z);
    }

    #[test]
    fn test_zero_direction_is_error() {
        assert!(orthogonal_bases(DVec3::ZERO).is_err());
    }

    #[test]
    fn test_arrow_transform_maps_unit_x() {
        let m = arrow_transform(DVec3::ZERO, DVec3::Z, 2.0).unwrap();
        let tip = m.transform_point3(DVec3::X);
        assert!((tip - DVec3::new(0.0, 0.0, 2.0)).length() < 1e-12);
    }

    #[test]
    fn test_highest_ties_lowest_index() {
        let points = [
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(5.0, 0.0, 2.0),
            DVec3::new(-5.0, 0.0, 2.0),
        ];
        assert_eq!(highest(&points, DVec3::Z), Some((1, points[1])));
        assert_eq!(highest(&points, DVec3::NEG_X), Some((2, points[2])));
        assert_eq!(highest(&[], DVec3::Z), None);
    }

    #[test]
    fn test_bounding_box_transform() {
        let b = BoundingBox::new(DVec3::ZERO, DVec3::ONE);
        let moved = b.transform(&DMat4::from_translation(DVec3::new(1.0, 0.0, 0.0)));
        assert_eq!(moved.min, DVec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(b.diagonal(), 3f64.sqrt());
    }
}
