//! Logging and metrics setup for hosts.

use crate::config::UpsellConfig;
use metrics::{describe_counter, Unit};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Domain metric names
pub mod names {
    /// Catalog fetch results, labelled by `outcome`
    pub const CATALOG_FETCH: &str = "upsell.catalog.fetch";
    /// Add-to-order results, labelled by `outcome`
    pub const MUTATION: &str = "upsell.mutation";
}

fn env_filter(config: &UpsellConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global fmt subscriber
///
/// `RUST_LOG` wins over `config.log_filter`; an unparseable filter falls
/// back to `info`.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init_tracing(config: &UpsellConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}

/// Register descriptions for store and widget metrics
pub fn register_metrics() {
    checkout_upsell_runtime::metrics::register_metrics();
    describe_counter!(
        names::CATALOG_FETCH,
        Unit::Count,
        "Upsell catalog fetches, by outcome"
    );
    describe_counter!(names::MUTATION, Unit::Count, "Upsell add-to-order requests, by outcome");
}
