//! Toast scheduling
//!
//! ```text
//! Idle ──timer fires, not quiet, not suppressed──▶ Showing
//! Showing ──display duration elapses──▶ Idle
//! (any) ──dismiss──▶ Suppressed(now + cooldown)
//! Suppressed ──cooldown elapses──▶ Idle
//! ```
//!
//! Show attempts during quiet hours change nothing; the recurring timer
//! simply re-arms. All timers live in the scheduler's own [`TimerQueue`] and
//! only fire from [`ToastScheduler::poll`]. Timers that are late fire once,
//! at the time of the poll that notices them.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyroute_core::{Clock, TimerId, TimerQueue, Timestamp};
use smallvec::SmallVec;

use crate::catalog::ToastCatalog;
use crate::config::ToastConfig;
use crate::error::{StorageError, ToastError};
use crate::message::{compose_message, ToastMessage};
use crate::storage::{load_timestamp, save_timestamp, DismissalStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToastState {
    Idle,
    Suppressed {
        until: Timestamp,
    },
    Showing {
        message: ToastMessage,
        expires_at: Timestamp,
    },
}

impl ToastState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ToastState::Idle)
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, ToastState::Suppressed { .. })
    }

    pub fn is_showing(&self) -> bool {
        matches!(self, ToastState::Showing { .. })
    }
}

/// Transitions reported to the host, in the order they happened
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToastEvent {
    Shown(ToastMessage),
    Expired,
    Dismissed { until: Timestamp },
    SuppressionLifted,
}

pub type ToastEvents = SmallVec<[ToastEvent; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ToastTimer {
    InitialShow,
    RecurringShow,
    Expire,
    CooldownEnd,
}

/// Single-slot social-proof toast scheduler
pub struct ToastScheduler<C, S, R = StdRng> {
    config: ToastConfig,
    catalog: ToastCatalog,
    clock: C,
    store: S,
    rng: R,
    state: ToastState,
    timers: TimerQueue<ToastTimer>,
    initial: Option<TimerId>,
    recurring: Option<TimerId>,
    display: Option<TimerId>,
    cooldown: Option<TimerId>,
    pending: ToastEvents,
    dismissed_at: Option<Timestamp>,
    storage_degraded: bool,
    started: bool,
}

impl<C, S, R> ToastScheduler<C, S, R> {
    pub fn state(&self) -> &ToastState {
        &self.state
    }

    /// The toast currently on screen
    pub fn current_message(&self) -> Option<&ToastMessage> {
        match &self.state {
            ToastState::Showing { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn suppressed_until(&self) -> Option<Timestamp> {
        match self.state {
            ToastState::Suppressed { until } => Some(until),
            _ => None,
        }
    }

    /// Last manual dismissal known to this scheduler, stored or not
    pub fn dismissed_at(&self) -> Option<Timestamp> {
        self.dismissed_at
    }

    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ToastCatalog {
        &self.catalog
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Storage failed at some point; dismissals are only kept in memory
    pub fn storage_degraded(&self) -> bool {
        self.storage_degraded
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// When the host should next call [`ToastScheduler::poll`]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.next_deadline()
    }

    fn cancel_all(&mut self) {
        self.timers.clear();
        self.initial = None;
        self.recurring = None;
        self.display = None;
        self.cooldown = None;
    }
}

impl<C: Clock, S: DismissalStore> ToastScheduler<C, S, StdRng> {
    /// Scheduler seeded from OS entropy
    pub fn from_entropy(
        config: ToastConfig,
        catalog: ToastCatalog,
        clock: C,
        store: S,
    ) -> Result<Self, ToastError> {
        Self::new(config, catalog, clock, store, StdRng::from_entropy())
    }
}

impl<C: Clock, S: DismissalStore, R: Rng> ToastScheduler<C, S, R> {
    /// Validate the configuration and build an idle scheduler.
    ///
    /// Nothing is armed until [`ToastScheduler::start`].
    pub fn new(
        config: ToastConfig,
        catalog: ToastCatalog,
        clock: C,
        store: S,
        rng: R,
    ) -> Result<Self, ToastError> {
        config.validate()?;
        catalog.validate()?;

        Ok(Self {
            config,
            catalog,
            clock,
            store,
            rng,
            state: ToastState::Idle,
            timers: TimerQueue::new(),
            initial: None,
            recurring: None,
            display: None,
            cooldown: None,
            pending: SmallVec::new(),
            dismissed_at: None,
            storage_degraded: false,
            started: false,
        })
    }

    /// Resume a stored cooldown or arm the first show and the recurring chain.
    ///
    /// With reduced motion nothing is ever armed. Calling twice is a no-op.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let now = self.clock.now();

        if let Some(until) = self.stored_suppression(now) {
            tracing::debug!(%until, "resuming dismissal cooldown");
            self.state = ToastState::Suppressed { until };
            if !self.config.reduced_motion {
                self.cooldown = Some(self.timers.arm(until, ToastTimer::CooldownEnd));
            }
            return;
        }

        if self.config.reduced_motion {
            tracing::debug!("reduced motion, toasts disabled");
            return;
        }
        self.arm_show_chain(now);
    }

    /// Re-arm the recurring show timer with a fresh random interval.
    ///
    /// Returns the chosen delay, or `None` under reduced motion.
    pub fn schedule_next(&mut self) -> Option<Duration> {
        let now = self.clock.now();
        self.schedule_next_from(now)
    }

    /// Show a toast now if nothing is visible, the cooldown is over and the
    /// local hour is not quiet. Returns whether a toast was shown.
    pub fn maybe_show(&mut self) -> bool {
        let now = self.clock.now();
        self.show_now(now).is_some()
    }

    /// Hide any toast and suppress new ones for the cooldown.
    ///
    /// The dismissal time is persisted so a later scheduler on the same
    /// store resumes the cooldown.
    pub fn dismiss(&mut self) -> Timestamp {
        let now = self.clock.now();
        let until = now.saturating_add(self.config.cooldown());

        self.cancel_all();
        self.state = ToastState::Suppressed { until };
        self.dismissed_at = Some(now);
        self.persist_dismissal(now);

        if !self.config.reduced_motion {
            self.cooldown = Some(self.timers.arm(until, ToastTimer::CooldownEnd));
        }

        tracing::debug!(%until, "toast dismissed");
        self.pending.push(ToastEvent::Dismissed { until });
        until
    }

    /// Fire every timer that is due and return all transitions since the
    /// last poll, including those caused by direct calls.
    ///
    /// Overdue timers are coalesced: they all fire at the current time, and
    /// any number of overdue show timers makes a single show attempt. After a
    /// long sleep the host sees at most one toast, created now.
    pub fn poll(&mut self) -> ToastEvents {
        let now = self.clock.now();
        let mut show_due = false;

        for (id, timer) in self.timers.drain_due(now) {
            match timer {
                ToastTimer::InitialShow => {
                    if self.initial == Some(id) {
                        self.initial = None;
                    }
                    show_due = true;
                }
                ToastTimer::RecurringShow => {
                    if self.recurring == Some(id) {
                        self.recurring = None;
                    }
                    show_due = true;
                }
                ToastTimer::Expire => {
                    if self.display == Some(id) {
                        self.display = None;
                    }
                    if self.state.is_showing() {
                        tracing::debug!(%now, "toast expired");
                        self.state = ToastState::Idle;
                        self.pending.push(ToastEvent::Expired);
                    }
                }
                ToastTimer::CooldownEnd => {
                    if self.cooldown == Some(id) {
                        self.cooldown = None;
                    }
                    if self.state.is_suppressed() {
                        self.lift_suppression(now);
                    }
                }
            }
        }

        if show_due {
            if self.recurring.is_none() {
                self.schedule_next_from(now);
            }
            self.show_now(now);
        }
        std::mem::take(&mut self.pending)
    }

    /// Cancel every outstanding timer.
    ///
    /// The state is left as is; [`ToastScheduler::start`] may be called again.
    pub fn shutdown(&mut self) {
        tracing::debug!(timers = self.timers.len(), "toast scheduler shut down");
        self.cancel_all();
        self.started = false;
    }

    /// Show attempt at `now`; the quiet-hour check and the message timestamp
    /// both use that instant.
    fn show_now(&mut self, now: Timestamp) -> Option<ToastMessage> {
        if self.config.reduced_motion {
            return None;
        }

        let eligible = match self.state {
            ToastState::Idle => true,
            ToastState::Suppressed { until } => now >= until,
            ToastState::Showing { .. } => false,
        };
        if !eligible {
            return None;
        }

        let hour = self.clock.hour_at(now);
        if self.config.is_quiet_hour(hour) {
            tracing::trace!(hour, "quiet hour, skipping toast");
            return None;
        }

        if self.state.is_suppressed() {
            self.lift_suppression(now);
        }

        let Some(text) = compose_message(&self.catalog, &mut self.rng) else {
            tracing::warn!("toast catalog produced no message");
            return None;
        };

        let message = ToastMessage::new(text, now, self.config.display());
        let expires_at = message.expires_at();
        self.display = Some(self.timers.arm(expires_at, ToastTimer::Expire));
        self.state = ToastState::Showing {
            message: message.clone(),
            expires_at,
        };

        tracing::debug!(text = %message.text, %expires_at, "toast shown");
        self.pending.push(ToastEvent::Shown(message.clone()));
        Some(message)
    }

    fn lift_suppression(&mut self, at: Timestamp) {
        if let Some(id) = self.cooldown.take() {
            self.timers.cancel(id);
        }
        self.state = ToastState::Idle;
        tracing::debug!(%at, "toast suppression lifted");
        self.pending.push(ToastEvent::SuppressionLifted);
        self.arm_show_chain(at);
    }

    fn arm_show_chain(&mut self, from: Timestamp) {
        if self.config.reduced_motion {
            return;
        }
        if self.initial.is_none() {
            let delay =
                self.random_delay(self.config.initial_delay_min_ms, self.config.initial_delay_max_ms);
            self.initial = Some(self.timers.arm_after(from, delay, ToastTimer::InitialShow));
        }
        if self.recurring.is_none() {
            self.schedule_next_from(from);
        }
    }

    fn schedule_next_from(&mut self, from: Timestamp) -> Option<Duration> {
        if self.config.reduced_motion {
            return None;
        }
        if let Some(id) = self.recurring.take() {
            self.timers.cancel(id);
        }
        let delay = self.random_delay(self.config.interval_min_ms, self.config.interval_max_ms);
        self.recurring = Some(self.timers.arm_after(from, delay, ToastTimer::RecurringShow));
        Some(delay)
    }

    fn random_delay(&mut self, min_ms: u64, max_ms: u64) -> Duration {
        Duration::from_millis(self.rng.gen_range(min_ms..=max_ms))
    }

    /// Remaining cooldown from a previous session, if any
    fn stored_suppression(&mut self, now: Timestamp) -> Option<Timestamp> {
        let dismissed_at = match load_timestamp(&self.store, &self.config.storage_key) {
            Ok(at) => at?,
            Err(err) => {
                self.degrade(&err);
                return None;
            }
        };
        self.dismissed_at = Some(dismissed_at);

        let cooldown = self.config.cooldown();
        let elapsed = now.saturating_duration_since(dismissed_at);
        if elapsed >= cooldown {
            return None;
        }
        Some(now.saturating_add(cooldown - elapsed))
    }

    fn persist_dismissal(&mut self, at: Timestamp) {
        if self.storage_degraded {
            return;
        }
        if let Err(err) = save_timestamp(&mut self.store, &self.config.storage_key, at) {
            self.degrade(&err);
        }
    }

    fn degrade(&mut self, err: &StorageError) {
        if !self.storage_degraded {
            tracing::warn!(error = %err, "toast storage unavailable, keeping dismissals in memory");
            self.storage_degraded = true;
        }
    }
}

impl<C, S, R> Drop for ToastScheduler<C, S, R> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use skyroute_core::ManualClock;

    fn scheduler(clock: &ManualClock) -> ToastScheduler<&ManualClock, MemoryStore, StdRng> {
        ToastScheduler::new(
            ToastConfig::default(),
            ToastCatalog::default(),
            clock,
            MemoryStore::new(),
            StdRng::seed_from_u64(11),
        )
        .unwrap()
    }

    #[test]
    fn test_new_validates() {
        let clock = ManualClock::at_hour(12);
        let config = ToastConfig {
            interval_min_ms: 10,
            interval_max_ms: 5,
            ..ToastConfig::default()
        };
        let result = ToastScheduler::new(
            config,
            ToastCatalog::default(),
            &clock,
            MemoryStore::new(),
            StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(ToastError::InvertedRange { .. })));
    }

    #[test]
    fn test_start_arms_initial_and_recurring() {
        let clock = ManualClock::at_hour(12);
        let mut s = scheduler(&clock);
        assert_eq!(s.pending_timers(), 0);

        s.start();
        assert_eq!(s.pending_timers(), 2);
        let first = s.next_deadline().unwrap();
        let delay = first.saturating_duration_since(clock.now());
        assert!(delay >= Duration::from_secs(5) && delay <= Duration::from_secs(15));

        // Idempotent
        s.start();
        assert_eq!(s.pending_timers(), 2);
    }

    #[test]
    fn test_schedule_next_replaces_recurring() {
        let clock = ManualClock::at_hour(12);
        let mut s = scheduler(&clock);
        s.start();

        for _ in 0..50 {
            let delay = s.schedule_next().unwrap();
            assert!(delay >= Duration::from_secs(20) && delay <= Duration::from_secs(45));
        }
        assert_eq!(s.pending_timers(), 2);
    }

    #[test]
    fn test_show_then_expire() {
        let clock = ManualClock::at_hour(12);
        let mut s = scheduler(&clock);
        s.start();

        let first = s.next_deadline().unwrap();
        clock.set(first);
        let events = s.poll();
        assert_eq!(events.len(), 1);
        let ToastEvent::Shown(message) = &events[0] else {
            panic!("expected a toast, got {events:?}");
        };
        assert_eq!(message.created_at, first);
        assert_eq!(s.current_message(), Some(message));

        clock.advance(Duration::from_millis(4_499));
        assert!(s.poll().is_empty());
        clock.advance(Duration::from_millis(1));
        assert_eq!(s.poll().as_slice(), &[ToastEvent::Expired]);
        assert!(s.state().is_idle());
    }

    #[test]
    fn test_maybe_show_while_showing_is_noop() {
        let clock = ManualClock::at_hour(15);
        let mut s = scheduler(&clock);
        assert!(s.maybe_show());
        let shown = s.current_message().cloned();
        assert!(!s.maybe_show());
        assert_eq!(s.current_message().cloned(), shown);
    }

    #[test]
    fn test_dismiss_cancels_display_and_chain() {
        let clock = ManualClock::at_hour(12);
        let mut s = scheduler(&clock);
        s.start();
        assert!(s.maybe_show());
        assert_eq!(s.pending_timers(), 3);

        let until = s.dismiss();
        assert_eq!(s.state(), &ToastState::Suppressed { until });
        // Only the cooldown timer is left
        assert_eq!(s.pending_timers(), 1);
        assert_eq!(s.next_deadline(), Some(until));
        assert_eq!(
            s.store().get("toast_dismissed_at"),
            Some(clock.now().to_string().as_str())
        );
    }

    #[test]
    fn test_shutdown_clears_timers() {
        let clock = ManualClock::at_hour(12);
        let mut s = scheduler(&clock);
        s.start();
        s.shutdown();
        assert_eq!(s.pending_timers(), 0);

        clock.advance(Duration::from_secs(3_600));
        assert!(s.poll().is_empty());
    }
}
