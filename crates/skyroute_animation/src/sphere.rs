//! Globe-space positions and stylized flight arcs
//!
//! Arcs interpolate latitude and longitude linearly and add a sinusoidal
//! latitude bump. This is not a great-circle path; long routes bend
//! visibly, which is the intended look.

use std::f32::consts::PI;

use skyroute_core::{Basis, Vec3};

use crate::geo::Route;

const DEG_TO_RAD: f32 = PI / 180.0;

/// Parameter step used to sample the direction of travel
pub const ORIENTATION_EPSILON: f32 = 0.01;

/// Point on a sphere of `radius` for a longitude/latitude in degrees.
///
/// `phi = (90 - lat)` and `theta = (lng + 180)` in radians;
/// `x = -r sin(phi) cos(theta)`, `y = r cos(phi)`, `z = r sin(phi) sin(theta)`.
pub fn sphere_position(lng: f32, lat: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat) * DEG_TO_RAD;
    let theta = (lng + 180.0) * DEG_TO_RAD;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -(radius * sin_phi * cos_theta),
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Outward normal of a sphere centered at the origin
pub fn surface_normal(position: Vec3) -> Vec3 {
    position.normalize()
}

/// Position plus orientation of something placed on the globe
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPose {
    pub position: Vec3,
    pub basis: Basis,
}

impl MarkerPose {
    /// A pose standing upright on the surface at a geographic location
    pub fn anchored(lng: f32, lat: f32, radius: f32) -> Self {
        let position = sphere_position(lng, lat, radius);
        Self {
            position,
            basis: Basis::from_up(surface_normal(position)),
        }
    }
}

/// A lifted arc between two coordinates on a sphere
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereArc {
    /// `(lat, lng)` in degrees
    pub start: (f32, f32),
    /// `(lat, lng)` in degrees
    pub end: (f32, f32),
    /// Peak latitude offset at the middle of the arc, in degrees
    pub lift_deg: f32,
    pub radius: f32,
}

impl SphereArc {
    pub fn new(start: (f32, f32), end: (f32, f32), lift_deg: f32, radius: f32) -> Self {
        Self {
            start,
            end,
            lift_deg,
            radius,
        }
    }

    /// Arc for a route; invalid endpoints are repaired the same way the
    /// flat map repairs them.
    pub fn from_route(route: &Route, lift_deg: f32, radius: f32) -> Self {
        let (start, end) = route.endpoints();
        Self::new(start, end, lift_deg, radius)
    }

    /// Same arc at a different radius (trails hover slightly lower than
    /// the vehicle that follows them)
    pub fn at_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// `(lat, lng)` at parameter `t`.
    ///
    /// `t` is not clamped so orientation sampling can look slightly past
    /// the end of the arc.
    pub fn geo_at(&self, t: f32) -> (f32, f32) {
        let (slat, slng) = self.start;
        let (elat, elng) = self.end;
        let lng = slng + (elng - slng) * t;
        let lat = slat + (elat - slat) * t + (t * PI).sin() * self.lift_deg;
        (lat, lng)
    }

    pub fn position_at(&self, t: f32) -> Vec3 {
        let (lat, lng) = self.geo_at(t);
        sphere_position(lng, lat, self.radius)
    }

    /// Orientation at `t`: forward along the direction of travel sampled
    /// between `t` and `t + ε`, up along the surface normal.
    pub fn orientation_at(&self, t: f32) -> Basis {
        let position = self.position_at(t);
        let ahead = self.position_at(t + ORIENTATION_EPSILON);
        Basis::from_tangent(ahead - position, surface_normal(position))
    }

    pub fn pose_at(&self, t: f32) -> MarkerPose {
        MarkerPose {
            position: self.position_at(t),
            basis: self.orientation_at(t),
        }
    }

    /// Static trail polyline with `segments + 1` points
    pub fn trail(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.position_at(i as f32 / segments as f32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_sphere_position_axes() {
        let north = sphere_position(0.0, 90.0, 2.0);
        assert!(approx(north.y, 2.0, 1e-5));
        assert!(approx(north.x, 0.0, 1e-5) && approx(north.z, 0.0, 1e-5));

        // lng 0 on the equator: theta = pi, so x = -r * cos(pi) = r
        let prime = sphere_position(0.0, 0.0, 1.0);
        assert!(approx(prime.x, 1.0, 1e-5));
        assert!(approx(prime.y, 0.0, 1e-5));
    }

    #[test]
    fn test_positions_stay_on_sphere() {
        let arc = SphereArc::new((40.0, -100.0), (50.0, 15.0), 8.0, 2.65);
        for i in 0..=20 {
            let p = arc.position_at(i as f32 / 20.0);
            assert!(approx(p.length(), 2.65, 1e-4));
        }
    }

    #[test]
    fn test_arc_lift_peaks_midway() {
        let arc = SphereArc::new((40.0, -100.0), (50.0, 15.0), 8.0, 2.65);
        let (lat, lng) = arc.geo_at(0.5);
        assert!(approx(lat, 45.0 + 8.0, 1e-4));
        assert!(approx(lng, -42.5, 1e-4));
        assert_eq!(arc.geo_at(0.0), (40.0, -100.0));
    }

    #[test]
    fn test_orientation_points_along_travel() {
        let arc = SphereArc::new((0.0, 0.0), (0.0, 90.0), 0.0, 1.0);
        let pose = arc.pose_at(0.0);
        let ahead = arc.position_at(0.1) - pose.position;
        assert!(pose.basis.forward.dot(ahead) > 0.0);
        assert!(approx(pose.basis.up.dot(pose.position.normalize()), 1.0, 1e-5));
        assert!(approx(pose.basis.forward.dot(pose.basis.up), 0.0, 1e-5));
    }

    #[test]
    fn test_degenerate_arc_orientation_is_finite() {
        let arc = SphereArc::new((10.0, 10.0), (10.0, 10.0), 0.0, 2.5);
        let basis = arc.orientation_at(0.5);
        assert!(basis.right.is_finite() && basis.forward.is_finite());
        assert!(approx(basis.right.length(), 1.0, 1e-5));
    }

    #[test]
    fn test_anchor_stands_on_surface() {
        let pose = MarkerPose::anchored(15.0, 50.0, 2.5);
        assert!(approx(pose.position.length(), 2.5, 1e-4));
        assert!(approx(pose.basis.up.dot(pose.position.normalize()), 1.0, 1e-5));
    }

    #[test]
    fn test_trail_endpoints() {
        let arc = SphereArc::new((50.0, 15.0), (-15.0, -60.0), 10.0, 2.58);
        let trail = arc.trail(50);
        assert_eq!(trail.len(), 51);
        assert_eq!(trail[0], arc.position_at(0.0));
        assert_eq!(trail[50], arc.position_at(1.0));
    }
}
