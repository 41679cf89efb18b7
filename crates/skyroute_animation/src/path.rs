//! Curved 2D route paths on the world map

use std::fmt::Write as _;

use skyroute_core::Point;
use smallvec::SmallVec;

use crate::geo::{Projection, Route};

/// Default arc lift in canvas units for the 800x400 map
pub const DEFAULT_ARC_LIFT: f32 = 50.0;

/// Path command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, end: Point },
}

/// A 2D path composed of commands, ready for a vector backend
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 4]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Quadratic bezier from `start` to `end` bent through `control`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadCurve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

/// Arc between two projected points.
///
/// The control point sits at the horizontal midpoint, `lift` units above the
/// higher of the two endpoints (canvas y grows downward).
pub fn curved_path(start: Point, end: Point, lift: f32) -> QuadCurve {
    let control = Point::new((start.x + end.x) / 2.0, start.y.min(end.y) - lift);
    QuadCurve {
        start,
        control,
        end,
    }
}

impl QuadCurve {
    /// Curve for a route under `projection`.
    ///
    /// A route whose endpoints coincide yields a zero-length curve with the
    /// control point pinned to the endpoint, so every sample is that point.
    pub fn for_route(route: &Route, projection: &Projection, lift: f32) -> QuadCurve {
        let (start, end) = projection.project_route(route);
        if route.is_degenerate() {
            return QuadCurve {
                start,
                control: start,
                end: start,
            };
        }
        curved_path(start, end, lift)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end && self.control == self.start
    }

    /// Position at parameter `t` (clamped to `[0, 1]`).
    ///
    /// A degenerate curve always answers its single point; the weighted sum
    /// below does not round back to it exactly.
    pub fn point_at(&self, t: f32) -> Point {
        if self.is_degenerate() {
            return self.start;
        }
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    /// Derivative at parameter `t`; zero for a degenerate curve
    pub fn tangent_at(&self, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        Point::new(
            2.0 * u * (self.control.x - self.start.x) + 2.0 * t * (self.end.x - self.control.x),
            2.0 * u * (self.control.y - self.start.y) + 2.0 * t * (self.end.y - self.control.y),
        )
    }

    /// Heading in radians at parameter `t`, measured from +x towards +y
    pub fn heading_at(&self, t: f32) -> f32 {
        let tangent = self.tangent_at(t);
        if tangent == Point::ZERO {
            0.0
        } else {
            tangent.y.atan2(tangent.x)
        }
    }

    /// Evenly spaced parameter samples, `segments + 1` points
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    /// Polyline length over 32 segments
    pub fn approx_length(&self) -> f32 {
        self.sample(32)
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }

    /// The visible portion `[0, fraction]` of the curve as its own quadratic,
    /// used to draw a trail that grows behind the marker.
    pub fn split_at(&self, fraction: f32) -> QuadCurve {
        let t = fraction.clamp(0.0, 1.0);
        QuadCurve {
            start: self.start,
            control: self.start.lerp(self.control, t),
            end: self.point_at(t),
        }
    }

    pub fn to_path(&self) -> Path {
        let mut path = Path::new();
        path.push(PathCommand::MoveTo(self.start));
        path.push(PathCommand::QuadTo {
            control: self.control,
            end: self.end,
        });
        path
    }

    /// SVG path data: `M sx sy Q cx cy ex ey`
    pub fn to_svg(&self) -> String {
        let mut d = String::with_capacity(48);
        let _ = write!(
            d,
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        );
        d
    }
}
