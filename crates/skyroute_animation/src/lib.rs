//! skyroute Route Animation
//!
//! Decorative shipping-route animation for a flat world map and a 3D globe.
//!
//! # Features
//!
//! - **Projection**: Equirectangular lat/lng to canvas mapping
//! - **Curved Paths**: Lifted quadratic arcs between projected endpoints
//! - **Globe Arcs**: Stylized lat/lng arcs on a sphere with tangent-aligned
//!   marker orientation
//! - **Markers**: Looping or one-shot progress driven by a shared delta time
//! - **Timelines**: Staggered draw cycle for the world map, phased globe
//!   delivery sequence

pub mod config;
pub mod delivery;
pub mod easing;
pub mod error;
pub mod geo;
pub mod marker;
pub mod path;
pub mod scheduler;
pub mod sphere;
pub mod timeline;

pub use config::{MapLabel, SceneConfig};
pub use delivery::{
    DeliveryConfig, DeliveryEvent, DeliveryPhase, DeliverySequence, GLOBE_RADIUS, TRAIL_SEGMENTS,
};
pub use easing::Easing;
pub use error::ConfigError;
pub use geo::{GeoPoint, Projection, Route};
pub use marker::AnimatedMarker;
pub use path::{curved_path, Path, PathCommand, QuadCurve};
pub use scheduler::{MarkerFrame, MarkerId, RouteAnimator};
pub use sphere::{sphere_position, surface_normal, MarkerPose, SphereArc};
pub use timeline::{RouteCycle, RouteFrame, RouteTiming};
