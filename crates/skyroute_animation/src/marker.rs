//! Progress of a single marker along its route

/// A marker moving along one route.
///
/// `progress` is always within `[0, 1]`. Non-looping markers stop at 1;
/// looping markers wrap back to 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedMarker {
    route: usize,
    progress: f32,
    /// Progress gained per second
    speed: f32,
    looping: bool,
}

impl AnimatedMarker {
    /// A marker at the start of `route` advancing `speed` per second.
    ///
    /// Negative or non-finite speeds produce a marker that never moves.
    pub fn new(route: usize, speed: f32) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            0.0
        };
        Self {
            route,
            progress: 0.0,
            speed,
            looping: false,
        }
    }

    /// A marker that crosses the whole route in `secs` seconds
    pub fn with_duration(route: usize, secs: f32) -> Self {
        let speed = if secs.is_finite() && secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        };
        Self::new(route, speed)
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Start from a given progress, clamped into `[0, 1]`
    pub fn at_progress(mut self, progress: f32) -> Self {
        self.progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn route(&self) -> usize {
        self.route
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// A non-looping marker that reached the end of its route
    pub fn is_complete(&self) -> bool {
        !self.looping && self.progress >= 1.0
    }

    /// The marker after `dt` seconds.
    ///
    /// Non-looping: `min(p + speed * dt, 1)`. Looping: `(p + speed * dt) mod 1`.
    /// A negative or non-finite `dt` leaves the marker where it is.
    #[must_use]
    pub fn advance(&self, dt: f32) -> AnimatedMarker {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let next = self.progress + self.speed * dt;

        let progress = if self.looping {
            next.rem_euclid(1.0)
        } else {
            next.min(1.0)
        };

        AnimatedMarker {
            progress: progress.clamp(0.0, 1.0),
            ..*self
        }
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
    }
}
