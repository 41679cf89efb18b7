//! Route animator
//!
//! Owns the route list and every active marker, and advances them together
//! each frame.

use std::time::Instant;

use skyroute_core::Point;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::geo::{Projection, Route};
use crate::marker::AnimatedMarker;
use crate::path::QuadCurve;

new_key_type! {
    pub struct MarkerId;
}

/// Called once when a non-looping marker reaches the end of its route
pub type CompletionCallback = Box<dyn FnMut(MarkerId, &AnimatedMarker)>;

/// Where a marker should be drawn this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerFrame {
    pub id: MarkerId,
    pub route: usize,
    pub progress: f32,
    pub position: Point,
    /// Heading in radians along the curve
    pub heading: f32,
}

/// Drives every marker with one shared delta time per tick
pub struct RouteAnimator {
    routes: Vec<Route>,
    markers: SlotMap<MarkerId, AnimatedMarker>,
    on_complete: Option<CompletionCallback>,
    last_frame: Option<Instant>,
}

impl RouteAnimator {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            markers: SlotMap::with_key(),
            on_complete: None,
            last_frame: None,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Register the completion callback, replacing any previous one
    pub fn on_complete<F: FnMut(MarkerId, &AnimatedMarker) + 'static>(&mut self, callback: F) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Start animating a marker. Returns `None` if its route index is unknown.
    pub fn spawn(&mut self, marker: AnimatedMarker) -> Option<MarkerId> {
        if marker.route() >= self.routes.len() {
            tracing::debug!(route = marker.route(), "marker references unknown route");
            return None;
        }
        let id = self.markers.insert(marker);
        tracing::trace!(?id, route = marker.route(), "marker spawned");
        Some(id)
    }

    /// One marker per route, each crossing its route in `duration_secs`
    pub fn spawn_all(&mut self, duration_secs: f32, looping: bool) -> Vec<MarkerId> {
        (0..self.routes.len())
            .filter_map(|route| {
                self.spawn(AnimatedMarker::with_duration(route, duration_secs).looping(looping))
            })
            .collect()
    }

    pub fn remove(&mut self, id: MarkerId) -> Option<AnimatedMarker> {
        self.markers.remove(id)
    }

    pub fn marker(&self, id: MarkerId) -> Option<&AnimatedMarker> {
        self.markers.get(id)
    }

    pub fn progress(&self, id: MarkerId) -> Option<f32> {
        self.markers.get(id).map(AnimatedMarker::progress)
    }

    pub fn markers_iter(&self) -> impl Iterator<Item = (MarkerId, &AnimatedMarker)> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Advance every marker by `dt` seconds.
    ///
    /// Non-looping markers that reach the end are removed; their ids are
    /// returned and passed to the completion callback exactly once.
    pub fn step(&mut self, dt: f32) -> SmallVec<[MarkerId; 4]> {
        let mut completed = SmallVec::new();

        for (id, marker) in self.markers.iter_mut() {
            *marker = marker.advance(dt);
            if marker.is_complete() {
                completed.push(id);
            }
        }

        for &id in &completed {
            if let Some(marker) = self.markers.remove(id) {
                tracing::debug!(?id, route = marker.route(), "marker reached destination");
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(id, &marker);
                }
            }
        }

        completed
    }

    /// Advance by the wall time elapsed since the previous call.
    ///
    /// The first call only records the frame time.
    pub fn tick(&mut self) -> SmallVec<[MarkerId; 4]> {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.step(dt)
    }

    /// Marker positions along their projected curves
    pub fn frame(&self, projection: &Projection, lift: f32) -> Vec<MarkerFrame> {
        self.markers
            .iter()
            .filter_map(|(id, marker)| {
                let route = self.routes.get(marker.route())?;
                let curve = QuadCurve::for_route(route, projection, lift);
                Some(MarkerFrame {
                    id,
                    route: marker.route(),
                    progress: marker.progress(),
                    position: curve.point_at(marker.progress()),
                    heading: curve.heading_at(marker.progress()),
                })
            })
            .collect()
    }

    /// Whether any marker is still moving
    pub fn has_active_animations(&self) -> bool {
        self.markers.values().any(|m| m.speed() > 0.0)
    }

    /// Drop every marker and forget the last frame time
    pub fn clear(&mut self) {
        self.markers.clear();
        self.last_frame = None;
    }
}
