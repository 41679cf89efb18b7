//! Globe delivery sequence
//!
//! A plane flies from North America to a European warehouse, the warehouse
//! pops up, then a truck drives on to a house in South America. Phases are
//! switched on a fixed timeline; vehicles advance on every frame.

use std::f32::consts::FRAC_PI_2;

use skyroute_core::Vec3;
use smallvec::SmallVec;

use crate::marker::AnimatedMarker;
use crate::sphere::{MarkerPose, SphereArc};

/// Globe radius; surface objects sit exactly on it
pub const GLOBE_RADIUS: f32 = 2.5;

/// Trail resolution used by the globe scene
pub const TRAIL_SEGMENTS: usize = 50;

/// Scene layout and pacing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeliveryConfig {
    pub flight: SphereArc,
    pub flight_speed: f32,
    /// Radius both trails are drawn at, just under the vehicles
    pub trail_radius: f32,
    pub truck: SphereArc,
    pub truck_speed: f32,
    /// Seconds from start at which each phase begins
    pub warehouse_at: f32,
    pub handoff_at: f32,
    pub truck_at: f32,
    pub reset_at: f32,
    pub looping: bool,
    /// Per-frame lerp factor for building scale
    pub scale_lerp: f32,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            flight: SphereArc::new((40.0, -100.0), (50.0, 15.0), 8.0, 2.65),
            flight_speed: 0.08,
            trail_radius: 2.58,
            truck: SphereArc::new((50.0, 15.0), (-15.0, -60.0), 10.0, 2.58),
            truck_speed: 0.12,
            warehouse_at: 8.0,
            handoff_at: 9.0,
            truck_at: 12.0,
            reset_at: 20.0,
            looping: true,
            scale_lerp: 0.1,
        }
    }
}

/// Camera/scene phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryPhase {
    /// Plane in the air
    Flight,
    /// Warehouse revealed
    Warehouse,
    /// Truck leaves the warehouse
    Handoff,
    /// Truck on the road
    Truck,
}

/// Something the host may want to react to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryEvent {
    PhaseChanged(DeliveryPhase),
    /// The plane reached its destination (fires once per loop)
    PlaneLanded,
    /// The timeline wrapped back to the start
    Restarted,
}

/// State of the globe scene
#[derive(Clone, Debug)]
pub struct DeliverySequence {
    config: DeliveryConfig,
    elapsed: f32,
    phase: DeliveryPhase,
    plane: AnimatedMarker,
    plane_landed: bool,
    truck: AnimatedMarker,
    warehouse_visible: bool,
    truck_active: bool,
    house_visible: bool,
    warehouse_scale: f32,
    house_scale: f32,
}

impl DeliverySequence {
    pub fn new(config: DeliveryConfig) -> Self {
        Self {
            plane: AnimatedMarker::new(0, config.flight_speed),
            truck: AnimatedMarker::new(1, config.truck_speed),
            config,
            elapsed: 0.0,
            phase: DeliveryPhase::Flight,
            plane_landed: false,
            warehouse_visible: false,
            truck_active: false,
            house_visible: true,
            warehouse_scale: 0.0,
            house_scale: 0.3,
        }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    pub fn phase(&self) -> DeliveryPhase {
        self.phase
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn warehouse_visible(&self) -> bool {
        self.warehouse_visible
    }

    pub fn truck_active(&self) -> bool {
        self.truck_active
    }

    pub fn warehouse_scale(&self) -> f32 {
        self.warehouse_scale
    }

    pub fn house_scale(&self) -> f32 {
        self.house_scale
    }

    pub fn plane_progress(&self) -> f32 {
        self.plane.progress()
    }

    pub fn truck_progress(&self) -> f32 {
        self.truck.progress()
    }

    /// Advance one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32) -> SmallVec<[DeliveryEvent; 2]> {
        let mut events = SmallVec::new();
        if !dt.is_finite() || dt <= 0.0 {
            return events;
        }

        self.elapsed += dt;
        if self.config.looping && self.elapsed >= self.config.reset_at {
            self.restart();
            events.push(DeliveryEvent::Restarted);
        }

        let phase = self.phase_at(self.elapsed);
        if phase != self.phase {
            self.enter(phase);
            events.push(DeliveryEvent::PhaseChanged(phase));
        }

        if self.phase == DeliveryPhase::Flight && !self.plane_landed {
            self.plane = self.plane.advance(dt);
            if self.plane.is_complete() {
                self.plane_landed = true;
                self.warehouse_visible = true;
                tracing::debug!(elapsed = self.elapsed, "plane landed");
                events.push(DeliveryEvent::PlaneLanded);
            }
        }

        if self.truck_active {
            self.truck = self.truck.advance(dt);
        } else {
            self.truck.reset();
        }

        let lerp = self.config.scale_lerp;
        let warehouse_target = if self.warehouse_visible { 1.0 } else { 0.0 };
        let house_target = if self.house_visible { 1.0 } else { 0.3 };
        self.warehouse_scale += (warehouse_target - self.warehouse_scale) * lerp;
        self.house_scale += (house_target - self.house_scale) * lerp;

        events
    }

    fn phase_at(&self, elapsed: f32) -> DeliveryPhase {
        let c = &self.config;
        if elapsed >= c.truck_at {
            DeliveryPhase::Truck
        } else if elapsed >= c.handoff_at {
            DeliveryPhase::Handoff
        } else if elapsed >= c.warehouse_at {
            DeliveryPhase::Warehouse
        } else {
            DeliveryPhase::Flight
        }
    }

    fn enter(&mut self, phase: DeliveryPhase) {
        tracing::debug!(?phase, elapsed = self.elapsed, "delivery phase");
        match phase {
            DeliveryPhase::Flight => {}
            DeliveryPhase::Warehouse => self.warehouse_visible = true,
            DeliveryPhase::Handoff | DeliveryPhase::Truck => {
                self.warehouse_visible = true;
                self.truck_active = true;
            }
        }
        self.phase = phase;
    }

    fn restart(&mut self) {
        self.elapsed = self.elapsed.rem_euclid(self.config.reset_at.max(f32::EPSILON));
        self.phase = DeliveryPhase::Flight;
        self.warehouse_visible = false;
        self.truck_active = false;
        self.plane_landed = false;
        self.plane.reset();
        self.truck.reset();
    }

    /// Plane pose while it is on screen
    pub fn plane_pose(&self) -> Option<MarkerPose> {
        if self.phase != DeliveryPhase::Flight || self.plane_landed {
            return None;
        }
        Some(self.config.flight.pose_at(self.plane.progress()))
    }

    /// Truck pose while it is driving; the model faces sideways, hence the
    /// quarter-turn yaw
    pub fn truck_pose(&self) -> Option<MarkerPose> {
        if !self.truck_active || self.truck.is_complete() {
            return None;
        }
        let pose = self.config.truck.pose_at(self.truck.progress());
        Some(MarkerPose {
            position: pose.position,
            basis: pose.basis.yawed(FRAC_PI_2),
        })
    }

    /// Static flight trail, always drawn
    pub fn flight_trail(&self, segments: usize) -> Vec<Vec3> {
        self.config
            .flight
            .at_radius(self.config.trail_radius)
            .trail(segments)
    }

    /// Road trail, drawn only once the truck has left the warehouse
    pub fn truck_trail(&self, segments: usize) -> Option<Vec<Vec3>> {
        if !self.truck_active {
            return None;
        }
        Some(
            self.config
                .truck
                .at_radius(self.config.trail_radius)
                .trail(segments),
        )
    }

    pub fn warehouse_anchor(&self) -> MarkerPose {
        let (lat, lng) = self.config.truck.start;
        MarkerPose::anchored(lng, lat, GLOBE_RADIUS)
    }

    pub fn house_anchor(&self) -> MarkerPose {
        let (lat, lng) = self.config.truck.end;
        MarkerPose::anchored(lng, lat, GLOBE_RADIUS)
    }
}

impl Default for DeliverySequence {
    fn default() -> Self {
        Self::new(DeliveryConfig::default())
    }
}
