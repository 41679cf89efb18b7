//! Staggered draw cycle for the world map routes
//!
//! Every route draws its arc one after another with a fixed stagger, the
//! whole set holds, pauses, then retracts and the cycle repeats. Each route
//! is described by a five-stop keyframe track over the normalized cycle.

use crate::easing::Easing;

/// Timing knobs for the route cycle, in seconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteTiming {
    /// Delay between the start of consecutive routes
    pub stagger_secs: f32,
    /// Time for one route to draw fully
    pub duration_secs: f32,
    /// Hold after the last route finished before the cycle restarts
    pub pause_secs: f32,
    pub looping: bool,
}

impl Default for RouteTiming {
    fn default() -> Self {
        Self {
            stagger_secs: 0.3,
            duration_secs: 2.0,
            pause_secs: 2.0,
            looping: true,
        }
    }
}

/// Keyframe values over normalized time, eased segment by segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyframeTrack {
    pub times: [f32; 5],
    pub values: [f32; 5],
    pub easing: Easing,
}

impl KeyframeTrack {
    /// Interpolated value at normalized time `t`
    pub fn value_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        let mut prev = 0;
        let mut next = 0;
        for (i, &time) in self.times.iter().enumerate() {
            if time <= t {
                prev = i;
            }
            if time >= t {
                next = i;
                break;
            }
            next = i;
        }

        let span = self.times[next] - self.times[prev];
        if span.abs() < f32::EPSILON {
            return self.values[next];
        }

        let local = (t - self.times[prev]) / span;
        let eased = self.easing.apply(local);
        self.values[prev] + (self.values[next] - self.values[prev]) * eased
    }
}

/// What to draw for one route at the current cycle time
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RouteFrame {
    /// Visible fraction of the arc
    pub path_length: f32,
    /// Particle position along the arc
    pub particle_offset: f32,
    pub particle_opacity: f32,
}

/// Clock for the staggered draw cycle of `route_count` routes
#[derive(Clone, Debug)]
pub struct RouteCycle {
    timing: RouteTiming,
    route_count: usize,
    elapsed: f32,
}

impl RouteCycle {
    pub fn new(route_count: usize, timing: RouteTiming) -> Self {
        Self {
            timing,
            route_count,
            elapsed: 0.0,
        }
    }

    pub fn timing(&self) -> &RouteTiming {
        &self.timing
    }

    pub fn route_count(&self) -> usize {
        self.route_count
    }

    /// Time until the last route finished drawing
    pub fn total_secs(&self) -> f32 {
        self.route_count as f32 * self.timing.stagger_secs + self.timing.duration_secs
    }

    /// Full cycle including the trailing pause
    pub fn cycle_secs(&self) -> f32 {
        self.total_secs() + self.timing.pause_secs
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `dt` seconds, wrapping around the cycle when looping
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;

        let cycle = self.cycle_secs();
        if self.timing.looping && cycle > 0.0 && self.elapsed >= cycle {
            self.elapsed = self.elapsed.rem_euclid(cycle);
            tracing::trace!(elapsed = self.elapsed, "route cycle restarted");
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Elapsed time as a fraction of the cycle
    pub fn cycle_progress(&self) -> f32 {
        let cycle = self.cycle_secs();
        if cycle <= 0.0 {
            return 0.0;
        }
        (self.elapsed / cycle).clamp(0.0, 1.0)
    }

    /// Normalized `[0, start, end, reset, 1]` stops for route `index`
    pub fn key_times(&self, index: usize) -> [f32; 5] {
        let cycle = self.cycle_secs();
        if cycle <= 0.0 {
            return [0.0; 5];
        }
        let offset = index as f32 * self.timing.stagger_secs;
        let start = offset / cycle;
        let end = (offset + self.timing.duration_secs) / cycle;
        let reset = self.total_secs() / cycle;
        [0.0, start, end.min(1.0), reset.min(1.0), 1.0]
    }

    fn track(&self, index: usize, values: [f32; 5]) -> KeyframeTrack {
        KeyframeTrack {
            times: self.key_times(index),
            values,
            easing: Easing::EaseInOut,
        }
    }

    /// Visible arc fraction for route `index`
    pub fn path_length(&self, index: usize) -> f32 {
        if self.timing.looping {
            return self
                .track(index, [0.0, 0.0, 1.0, 1.0, 0.0])
                .value_at(self.cycle_progress());
        }

        // One-shot: draw after the stagger delay, then stay drawn
        let offset = index as f32 * self.timing.stagger_secs;
        if self.timing.duration_secs <= 0.0 {
            return if self.elapsed >= offset { 1.0 } else { 0.0 };
        }
        let local = (self.elapsed - offset) / self.timing.duration_secs;
        Easing::EaseInOut.apply(local)
    }

    /// Particle position along the arc; particles only exist when looping
    pub fn particle_offset(&self, index: usize) -> f32 {
        if !self.timing.looping {
            return 0.0;
        }
        self.track(index, [0.0, 0.0, 1.0, 1.0, 1.0])
            .value_at(self.cycle_progress())
    }

    pub fn particle_opacity(&self, index: usize) -> f32 {
        if !self.timing.looping {
            return 0.0;
        }
        self.track(index, [0.0, 0.0, 1.0, 0.0, 0.0])
            .value_at(self.cycle_progress())
    }

    pub fn route_frame(&self, index: usize) -> RouteFrame {
        RouteFrame {
            path_length: self.path_length(index),
            particle_offset: self.particle_offset(index),
            particle_opacity: self.particle_opacity(index),
        }
    }

    /// Frames for every route, in route order
    pub fn frames(&self) -> Vec<RouteFrame> {
        (0..self.route_count).map(|i| self.route_frame(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_cycle_lengths() {
        let cycle = RouteCycle::new(5, RouteTiming::default());
        assert!(approx(cycle.total_secs(), 3.5));
        assert!(approx(cycle.cycle_secs(), 5.5));
    }

    #[test]
    fn test_first_route_draws_then_retracts() {
        let mut cycle = RouteCycle::new(5, RouteTiming::default());
        assert_eq!(cycle.path_length(0), 0.0);

        cycle.tick(1.0);
        let halfway = cycle.path_length(0);
        assert!(approx(halfway, 0.5), "got {halfway}");

        cycle.tick(1.5); // 2.5s: fully drawn, holding
        assert!(approx(cycle.path_length(0), 1.0));

        cycle.tick(2.0); // 4.5s: inside the retract segment [3.5, 5.5]
        let retracting = cycle.path_length(0);
        assert!(retracting > 0.0 && retracting < 1.0);
    }

    #[test]
    fn test_later_routes_wait_for_stagger() {
        let mut cycle = RouteCycle::new(5, RouteTiming::default());
        cycle.tick(1.0);
        // Route 4 starts at 1.2s
        assert_eq!(cycle.path_length(4), 0.0);
        assert!(cycle.path_length(1) > 0.0);
    }

    #[test]
    fn test_cycle_wraps() {
        let mut cycle = RouteCycle::new(5, RouteTiming::default());
        cycle.tick(5.5 + 0.25);
        assert!(approx(cycle.elapsed(), 0.25));
    }

    #[test]
    fn test_particle_fades_after_arrival() {
        let mut cycle = RouteCycle::new(1, RouteTiming::default());
        // total = 2.3, cycle = 4.3; route 0 arrives at 2.0
        cycle.tick(2.0);
        assert!(approx(cycle.particle_opacity(0), 1.0));
        assert!(approx(cycle.particle_offset(0), 1.0));
        cycle.tick(0.3);
        assert!(approx(cycle.particle_opacity(0), 0.0));
        assert!(approx(cycle.particle_offset(0), 1.0));
    }

    #[test]
    fn test_one_shot_mode() {
        let timing = RouteTiming {
            looping: false,
            ..RouteTiming::default()
        };
        let mut cycle = RouteCycle::new(2, timing);
        cycle.tick(100.0);
        assert_eq!(cycle.path_length(0), 1.0);
        assert_eq!(cycle.path_length(1), 1.0);
        assert_eq!(cycle.particle_opacity(0), 0.0);
        assert!(approx(cycle.elapsed(), 100.0));
    }

    #[test]
    fn test_keyframe_track_holds_between_equal_stops() {
        let track = KeyframeTrack {
            times: [0.0, 0.2, 0.6, 0.8, 1.0],
            values: [0.0, 0.0, 1.0, 1.0, 0.0],
            easing: Easing::Linear,
        };
        assert_eq!(track.value_at(0.1), 0.0);
        assert!(approx(track.value_at(0.4), 0.5));
        assert_eq!(track.value_at(0.7), 1.0);
        assert!(approx(track.value_at(0.9), 0.5));
        assert_eq!(track.value_at(1.0), 0.0);
    }
}
