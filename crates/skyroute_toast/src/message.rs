//! Toast text composition

use std::time::Duration;

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use skyroute_core::Timestamp;

use crate::catalog::ToastCatalog;

/// A toast on screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastMessage {
    pub text: String,
    pub created_at: Timestamp,
    pub duration: Duration,
}

impl ToastMessage {
    pub fn new(text: impl Into<String>, created_at: Timestamp, duration: Duration) -> Self {
        Self {
            text: text.into(),
            created_at,
            duration,
        }
    }

    pub fn expires_at(&self) -> Timestamp {
        self.created_at.saturating_add(self.duration)
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at()
    }
}

/// Pick a city, product, weighted variant and template, then fill in the
/// tokens.
///
/// All randomness comes from `rng`. Returns `None` if the catalog has
/// nothing to pick from.
pub fn compose_message<R: Rng>(catalog: &ToastCatalog, rng: &mut R) -> Option<String> {
    let city = catalog.cities.choose(rng)?;
    let product = catalog.products.choose(rng)?;

    let weights = WeightedIndex::new(catalog.variants.iter().map(|v| v.weight)).ok()?;
    let variant = catalog.variants.get(weights.sample(rng))?;
    let template = variant.templates.choose(rng)?;

    let time = if rng.gen_bool(0.5) {
        "Just now".to_string()
    } else {
        format!("{} min", rng.gen_range(1..=5))
    };
    let order_id = format!("****{}", rng.gen_range(100..=999));

    Some(
        template
            .replace("{city}", &city.name)
            .replace("{country}", &city.country)
            .replace("{product}", product)
            .replace("{time}", &time)
            .replace("{orderId}", &order_id),
    )
}
