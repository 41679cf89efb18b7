//! Geometry primitives
//!
//! Plain value types used by both the flat world map (canvas coordinates)
//! and the globe scene (model space). No rendering backend is assumed.

use std::ops::{Add, Mul, Neg, Sub};

// ─────────────────────────────────────────────────────────────────────────────
// 2D Types
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point in canvas coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 3D Types
// ─────────────────────────────────────────────────────────────────────────────

/// 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length vector
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Orthonormal right/up/forward frame used to orient a marker.
///
/// Columns of the equivalent rotation matrix are `right`, `up`, `forward`
/// in that order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Default for Basis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Basis {
    pub const IDENTITY: Basis = Basis {
        right: Vec3::X,
        up: Vec3::UP,
        forward: Vec3::Z,
    };

    /// Build a frame whose `up` is the surface normal and whose `forward`
    /// follows the direction of travel projected onto the tangent plane.
    ///
    /// `right = up × direction`, then `forward = right × up`. When the
    /// direction is zero or parallel to the normal a world axis stands in
    /// for it so the result stays orthonormal.
    pub fn from_tangent(direction: Vec3, normal: Vec3) -> Basis {
        let up = normal.normalize();
        if up == Vec3::ZERO {
            return Basis::IDENTITY;
        }

        let mut right = up.cross(direction.normalize());
        if right.length() < 1e-6 {
            let fallback = if up.y.abs() < 0.99 { Vec3::UP } else { Vec3::Z };
            right = up.cross(fallback);
        }
        let right = right.normalize();
        let forward = right.cross(up).normalize();

        Basis { right, up, forward }
    }

    /// Smallest rotation that carries the world `UP` axis onto `normal`.
    ///
    /// Used for objects that stand on a surface without a direction of
    /// travel (buildings, pins).
    pub fn from_up(normal: Vec3) -> Basis {
        let n = normal.normalize();
        if n == Vec3::ZERO {
            return Basis::IDENTITY;
        }

        let cos = Vec3::UP.dot(n).clamp(-1.0, 1.0);
        if cos > 1.0 - 1e-6 {
            return Basis::IDENTITY;
        }
        if cos < -1.0 + 1e-6 {
            // Half turn about X
            return Basis {
                right: Vec3::X,
                up: -Vec3::UP,
                forward: -Vec3::Z,
            };
        }

        let axis = Vec3::UP.cross(n).normalize();
        let sin = (1.0 - cos * cos).sqrt();
        // Rodrigues rotation
        let rotate = |v: Vec3| v * cos + axis.cross(v) * sin + axis * (axis.dot(v) * (1.0 - cos));

        Basis {
            right: rotate(Vec3::X).normalize(),
            up: n,
            forward: rotate(Vec3::Z).normalize(),
        }
    }

    /// Rotate the frame about its own `up` axis (local yaw)
    pub fn yawed(&self, angle: f32) -> Basis {
        let (sin, cos) = angle.sin_cos();
        Basis {
            right: self.right * cos - self.forward * sin,
            up: self.up,
            forward: self.right * sin + self.forward * cos,
        }
    }

    /// Map a local-space vector into the frame's parent space
    pub fn transform(&self, local: Vec3) -> Vec3 {
        self.right * local.x + self.up * local.y + self.forward * local.z
    }

    /// Column-major 3x3 rotation matrix `[right, up, forward]`
    pub fn to_cols(&self) -> [[f32; 3]; 3] {
        [
            self.right.to_array(),
            self.up.to_array(),
            self.forward.to_array(),
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::from_hex),
            8 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                Some(Self::from_hex(value >> 8).with_alpha((value & 0xFF) as f32 / 255.0))
            }
            _ => None,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let normal = Vec3::new(0.3, 0.8, -0.5);
        let direction = Vec3::new(1.0, 0.2, 0.4);
        let basis = Basis::from_tangent(direction, normal);

        assert!(approx(basis.right.length(), 1.0));
        assert!(approx(basis.up.length(), 1.0));
        assert!(approx(basis.forward.length(), 1.0));
        assert!(approx(basis.right.dot(basis.up), 0.0));
        assert!(approx(basis.right.dot(basis.forward), 0.0));
        assert!(approx(basis.up.dot(basis.forward), 0.0));
    }

    #[test]
    fn test_basis_forward_follows_tangent() {
        // Travelling along +X on top of a sphere
        let basis = Basis::from_tangent(Vec3::X, Vec3::UP);
        assert!(approx(basis.forward.x, 1.0));
        assert!(approx(basis.up.y, 1.0));

        // Vertical component of the direction is projected away
        let basis = Basis::from_tangent(Vec3::new(1.0, 5.0, 0.0), Vec3::UP);
        assert!(approx(basis.forward.y, 0.0));
        assert!(basis.forward.x > 0.99);
    }

    #[test]
    fn test_basis_degenerate_direction() {
        let zero = Basis::from_tangent(Vec3::ZERO, Vec3::UP);
        assert!(approx(zero.right.length(), 1.0));
        assert!(approx(zero.forward.dot(zero.up), 0.0));

        let parallel = Basis::from_tangent(Vec3::UP, Vec3::UP);
        assert!(approx(parallel.right.length(), 1.0));

        assert_eq!(Basis::from_tangent(Vec3::X, Vec3::ZERO), Basis::IDENTITY);
    }

    #[test]
    fn test_from_up_aligns_with_normal() {
        assert_eq!(Basis::from_up(Vec3::UP), Basis::IDENTITY);

        let flipped = Basis::from_up(-Vec3::UP);
        assert!(approx(flipped.up.y, -1.0));
        assert!(approx(flipped.right.cross(flipped.up).dot(flipped.forward), 1.0));

        let normal = Vec3::new(0.4, 0.5, -0.7).normalize();
        let basis = Basis::from_up(normal);
        assert!(approx(basis.up.dot(normal), 1.0));
        assert!(approx(basis.right.dot(basis.up), 0.0));
        assert!(approx(basis.forward.dot(basis.up), 0.0));
        assert!(approx(basis.right.dot(basis.forward), 0.0));
        // Right-handed: right x up = forward
        assert!(approx(basis.right.cross(basis.up).dot(basis.forward), 1.0));
    }

    #[test]
    fn test_yaw_quarter_turn() {
        let yawed = Basis::IDENTITY.yawed(std::f32::consts::FRAC_PI_2);
        assert!(approx(yawed.right.z, -1.0));
        assert!(approx(yawed.forward.x, 1.0));
        assert_eq!(yawed.up, Vec3::UP);
    }

    #[test]
    fn test_basis_columns_and_transform() {
        let east = Basis::from_tangent(Vec3::X, Vec3::UP);
        let cols = east.to_cols();
        for (col, expected) in cols.iter().zip([[0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]) {
            assert!(col.iter().zip(expected).all(|(a, b)| approx(*a, b)), "{cols:?}");
        }
        // A model's nose (+Z) points along the direction of travel
        let nose = east.transform(Vec3::Z);
        assert!(approx(nose.x, 1.0) && approx(nose.y, 0.0) && approx(nose.z, 0.0));

        // transform is the column-major matrix applied to the vector
        let basis = Basis::from_tangent(Vec3::new(1.0, 0.2, 0.4), Vec3::new(0.3, 0.8, -0.5));
        let m = basis.to_cols();
        let v = Vec3::new(0.5, -2.0, 1.5);
        let out = basis.transform(v).to_array();
        for row in 0..3 {
            let expected = m[0][row] * v.x + m[1][row] * v.y + m[2][row] * v.z;
            assert!(approx(out[row], expected));
        }
        assert!((basis.transform(v).length() - v.length()).abs() < 1e-4);
    }

    #[test]
    fn test_color_parse_hex() {
        let blue = Color::parse_hex("#3b82f6").unwrap();
        assert!(approx(blue.r, 0x3b as f32 / 255.0));
        assert!(approx(blue.b, 0xf6 as f32 / 255.0));
        assert_eq!(blue.a, 1.0);

        let translucent = Color::parse_hex("00000040").unwrap();
        assert!(approx(translucent.a, 0x40 as f32 / 255.0));

        assert!(Color::parse_hex("#12").is_none());
        assert!(Color::parse_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_point_lerp_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(1.5, 2.0));
        assert_eq!(a.distance(b), 5.0);
    }
}
