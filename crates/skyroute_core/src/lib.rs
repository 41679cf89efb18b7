//! skyroute Core Runtime
//!
//! Foundational primitives shared by the route animation engine and the
//! toast scheduler:
//!
//! - **Geometry**: 2D points, 3D vectors, orientation bases and colors
//! - **Clocks**: Millisecond timestamps with a real and a manual time source
//! - **Timers**: A per-instance cooperative one-shot timer queue
//!
//! Everything here is single-threaded and tick driven. Nothing spawns
//! threads or installs global callbacks; owners advance the clock and poll
//! their own [`TimerQueue`].
//!
//! # Example
//!
//! ```rust
//! use skyroute_core::{Clock, ManualClock, TimerQueue};
//! use std::time::Duration;
//!
//! let clock = ManualClock::at_hour(12);
//! let mut timers = TimerQueue::new();
//! timers.arm_after(clock.now(), Duration::from_millis(500), "ping");
//!
//! clock.advance(Duration::from_millis(500));
//! let fired: Vec<_> = timers.drain_due(clock.now()).into_iter().map(|(_, p)| p).collect();
//! assert_eq!(fired, vec!["ping"]);
//! ```

pub mod clock;
pub mod geometry;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use geometry::{Basis, Color, Point, Size, Vec3};
pub use timer::{TimerId, TimerQueue};
