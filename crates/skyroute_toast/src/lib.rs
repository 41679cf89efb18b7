//! skyroute Social Proof Toasts
//!
//! Randomly composed "someone in Toronto just viewed..." notifications on a
//! jittered schedule.
//!
//! # Features
//!
//! - **Single slot**: At most one toast is visible at a time
//! - **Quiet hours**: Nothing is shown during configured local hours
//! - **Cooldown**: A manual dismissal suppresses toasts for a while, and the
//!   suppression survives restarts through a [`DismissalStore`]
//! - **Deterministic**: Time and randomness are injected by the host
//!
//! # Example
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use skyroute_core::ManualClock;
//! use skyroute_toast::{MemoryStore, ToastCatalog, ToastConfig, ToastEvent, ToastScheduler};
//! use std::time::Duration;
//!
//! let clock = ManualClock::at_hour(14);
//! let mut toasts = ToastScheduler::new(
//!     ToastConfig::default(),
//!     ToastCatalog::default(),
//!     &clock,
//!     MemoryStore::new(),
//!     StdRng::seed_from_u64(1),
//! )
//! .unwrap();
//!
//! toasts.start();
//! clock.advance(Duration::from_secs(15));
//! let events = toasts.poll();
//! assert!(matches!(events.first(), Some(ToastEvent::Shown(_))));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod message;
pub mod scheduler;
pub mod storage;

pub use catalog::{City, ToastCatalog, ToastVariant, VariantKind};
pub use config::ToastConfig;
pub use error::{StorageError, ToastError};
pub use message::{compose_message, ToastMessage};
pub use scheduler::{ToastEvent, ToastEvents, ToastScheduler, ToastState};
pub use storage::{DismissalStore, JsonFileStore, MemoryStore, DISMISSED_AT_KEY};
