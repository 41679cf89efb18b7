//! Time sources
//!
//! Schedulers never read the system time directly. They ask a [`Clock`],
//! which is either the real wall clock or a [`ManualClock`] that tests and
//! headless hosts advance by hand.

use std::cell::Cell;
use std::fmt;
use std::num::ParseIntError;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use chrono::{Local, TimeZone, Timelike, Utc};

const MILLIS_PER_HOUR: u64 = 3_600_000;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Milliseconds since the Unix epoch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, duration: Duration) -> Timestamp {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(millis))
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// Hour of day (0-23) in UTC
    pub fn utc_hour(&self) -> u32 {
        ((self.0 % MILLIS_PER_DAY) / MILLIS_PER_HOUR) as u32
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Timestamp {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Timestamp)
    }
}

/// A source of "now" and of the viewer's local hour
pub trait Clock {
    fn now(&self) -> Timestamp;

    /// Local hour of day (0-23) at `at`, used for quiet-hour checks
    fn hour_at(&self, at: Timestamp) -> u32;

    fn local_hour(&self) -> u32 {
        self.hour_at(self.now())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn hour_at(&self, at: Timestamp) -> u32 {
        (**self).hour_at(at)
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn hour_at(&self, at: Timestamp) -> u32 {
        (**self).hour_at(at)
    }
}

/// Real wall clock in the host's timezone
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = Utc::now().timestamp_millis();
        Timestamp(u64::try_from(millis).unwrap_or(0))
    }

    fn hour_at(&self, at: Timestamp) -> u32 {
        let millis = i64::try_from(at.as_millis()).unwrap_or(i64::MAX);
        Local
            .timestamp_millis_opt(millis)
            .earliest()
            .map_or_else(|| Local::now().hour(), |t| t.hour())
    }
}

/// Hand-advanced clock.
///
/// The local hour is derived from the timestamp (UTC), so moving the clock
/// forward past an hour boundary changes [`Clock::local_hour`].
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Midnight UTC, 2023-11-14
    const BASE_DAY: u64 = 19_675 * MILLIS_PER_DAY;

    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start.0),
        }
    }

    /// A clock positioned at the top of `hour` on a fixed reference day
    pub fn at_hour(hour: u32) -> Self {
        Self::new(Timestamp(
            Self::BASE_DAY + u64::from(hour % 24) * MILLIS_PER_HOUR,
        ))
    }

    pub fn advance(&self, by: Duration) {
        self.set(Timestamp(self.now.get()).saturating_add(by));
    }

    pub fn set(&self, to: Timestamp) {
        self.now.set(to.0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.get())
    }

    fn hour_at(&self, at: Timestamp) -> u32 {
        at.utc_hour()
    }
}
