//! Geographic inputs and the flat-map projection

use serde::{Deserialize, Serialize};
use skyroute_core::{Color, Point, Size};

/// A latitude/longitude pair in degrees
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f32,
    pub lng: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GeoPoint {
    pub fn new(lat: f32, lng: f32) -> Self {
        Self {
            lat,
            lng,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Both coordinates are finite numbers
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// An animated start/end pair
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub color: Option<Color>,
}

impl Route {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            start,
            end,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Start and end as `(lat, lng)`, repaired so both are finite.
    ///
    /// An invalid endpoint collapses onto the valid one, which yields a
    /// zero-length route. With neither valid both collapse onto (0, 0).
    pub fn endpoints(&self) -> ((f32, f32), (f32, f32)) {
        let start = (self.start.lat, self.start.lng);
        let end = (self.end.lat, self.end.lng);
        match (self.start.is_valid(), self.end.is_valid()) {
            (true, true) => (start, end),
            (true, false) => {
                tracing::debug!(?start, "route end is not finite, collapsing onto start");
                (start, start)
            }
            (false, true) => {
                tracing::debug!(?end, "route start is not finite, collapsing onto end");
                (end, end)
            }
            (false, false) => {
                tracing::debug!("route has no finite endpoint");
                ((0.0, 0.0), (0.0, 0.0))
            }
        }
    }

    /// Start and end coincide after repair
    pub fn is_degenerate(&self) -> bool {
        let (start, end) = self.endpoints();
        start == end
    }
}

/// Equirectangular projection onto a fixed-size canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub size: Size,
}

impl Default for Projection {
    /// The 800x400 view box the world map is authored against
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

impl Projection {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
        }
    }

    /// `x = (lng + 180) * width / 360`, `y = (90 - lat) * height / 180`
    pub fn project(&self, lat: f32, lng: f32) -> Point {
        Point::new(
            (lng + 180.0) * self.size.width / 360.0,
            (90.0 - lat) * self.size.height / 180.0,
        )
    }

    pub fn project_geo(&self, point: &GeoPoint) -> Point {
        self.project(point.lat, point.lng)
    }

    /// Projected start and end of a route, after endpoint repair
    pub fn project_route(&self, route: &Route) -> (Point, Point) {
        let ((slat, slng), (elat, elng)) = route.endpoints();
        (self.project(slat, slng), self.project(elat, elng))
    }
}
