//! Perspective camera orbiting a focal point.

use glam::{DMat4, DQuat, DVec3};
use vplot_core::BoundingBox;

/// A perspective camera described by position, focal point and view-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: DVec3,
    focal_point: DVec3,
    view_up: DVec3,
    /// Vertical field of view in degrees
    view_angle: f64,
    /// Near and far clip distances
    clipping_range: [f64; 2],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::Z,
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            view_angle: 30.0,
            clipping_range: [0.01, 1000.01],
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    pub fn focal_point(&self) -> DVec3 {
        self.focal_point
    }

    pub fn set_focal_point(&mut self, focal_point: DVec3) {
        self.focal_point = focal_point;
    }

    pub fn view_up(&self) -> DVec3 {
        self.view_up
    }

    pub fn set_view_up(&mut self, view_up: DVec3) {
        if view_up.length_squared() > 0.0 {
            self.view_up = view_up.normalize();
        }
    }

    pub fn view_angle(&self) -> f64 {
        self.view_angle
    }

    pub fn set_view_angle(&mut self, degrees: f64) {
        self.view_angle = degrees.clamp(0.01, 179.0);
    }

    pub fn clipping_range(&self) -> [f64; 2] {
        self.clipping_range
    }

    pub fn distance(&self) -> f64 {
        self.position.distance(self.focal_point)
    }

    /// Unit vector from the position towards the focal point
    pub fn direction_of_projection(&self) -> DVec3 {
        (self.focal_point - self.position).normalize_or(DVec3::NEG_Z)
    }

    /// View-up made perpendicular to the direction of projection
    pub fn orthogonal_view_up(&self) -> DVec3 {
        let dop = self.direction_of_projection();
        let up = self.view_up - dop * self.view_up.dot(dop);
        match up.try_normalize() {
            Some(up) => up,
            None => fallback_up(dop),
        }
    }

    /// Screen-right direction in world space
    pub fn right(&self) -> DVec3 {
        self.direction_of_projection()
            .cross(self.orthogonal_view_up())
            .normalize_or_zero()
    }

    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.focal_point, self.orthogonal_view_up())
    }

    pub fn projection_matrix(&self, aspect: f64) -> DMat4 {
        let [near, far] = self.clipping_range;
        DMat4::perspective_rh_gl(self.view_angle.to_radians(), aspect.max(1e-6), near, far)
    }

    pub fn view_projection(&self, aspect: f64) -> DMat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Frame `bounds`: keep the viewing direction, aim at the center and back
    /// off until a sphere around the bounds fits the view angle.
    pub fn reset(&mut self, bounds: &BoundingBox) {
        let center = bounds.center();
        let mut radius = bounds.diagonal() * 0.5;
        if radius <= 0.0 {
            radius = 0.5;
        }
        let distance = radius / (self.view_angle.to_radians() * 0.5).sin();
        let dop = self.direction_of_projection();

        self.view_up = self.orthogonal_view_up();
        self.focal_point = center;
        self.position = center - dop * distance;
        self.reset_clipping_range(bounds);
    }

    /// Fit near/far planes around `bounds`.
    pub fn reset_clipping_range(&mut self, bounds: &BoundingBox) {
        let dop = self.direction_of_projection();
        let depths = bounds.corners().map(|c| (c - self.position).dot(dop));
        let nearest = depths.iter().copied().fold(f64::INFINITY, f64::min);
        let farthest = depths.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let far = (farthest * 1.01).max(1e-3);
        let near = (nearest * 0.99).max(far * 1e-3);
        self.clipping_range = [near, far];
    }

    /// Rotate the position about the view-up through the focal point.
    pub fn azimuth(&mut self, degrees: f64) {
        let axis = self.orthogonal_view_up();
        self.orbit(DQuat::from_axis_angle(axis, degrees.to_radians()));
    }

    /// Rotate the position about the screen-right axis through the focal point.
    pub fn elevation(&mut self, degrees: f64) {
        let axis = self.right();
        if axis == DVec3::ZERO {
            return;
        }
        let rotation = DQuat::from_axis_angle(axis, -degrees.to_radians());
        self.orbit(rotation);
        self.view_up = rotation * self.orthogonal_view_up();
    }

    fn orbit(&mut self, rotation: DQuat) {
        let offset = self.position - self.focal_point;
        self.position = self.focal_point + rotation * offset;
    }

    /// Move towards the focal point by `factor` (> 1 moves closer).
    pub fn dolly(&mut self, factor: f64) {
        if factor <= 0.0 {
            return;
        }
        let offset = self.position - self.focal_point;
        self.position = self.focal_point + offset / factor;
        let [near, far] = self.clipping_range;
        self.clipping_range = [near / factor, far / factor];
    }

    /// Move position and focal point together.
    pub fn translate(&mut self, offset: DVec3) {
        self.position += offset;
        self.focal_point += offset;
    }

    /// Half-extent of the view frustum at the focal plane, `(horizontal, vertical)`
    pub fn half_extent(&self, aspect: f64) -> (f64, f64) {
        let half_v = self.distance() * (self.view_angle.to_radians() * 0.5).tan();
        (half_v * aspect, half_v)
    }
}

fn fallback_up(dop: DVec3) -> DVec3 {
    for candidate in [DVec3::Z, DVec3::Y, DVec3::X] {
        let up = candidate - dop * candidate.dot(dop);
        if let Some(up) = up.try_normalize() {
            return up;
        }
    }
    DVec3::Y
}
