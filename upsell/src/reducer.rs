//! The upsell reducer.
//!
//! Owns every write to [`UpsellState`]. Catalog fetches and add-to-order
//! requests run as `Effect::Future`; the error banner timer runs as a
//! cancellable `Effect::Delay` registered under [`ERROR_DISMISS`].

use crate::catalog::{CatalogClient, CatalogQuery};
use crate::config::UpsellConfig;
use crate::locale::resolve_region;
use crate::mutation::{CartLineAdd, MutationFailure, MutationOutcome, OrderService};
use crate::state::{UpsellAction, UpsellState};
use crate::telemetry::names;
use checkout_upsell_core::effect::{Effect, EffectId};
use checkout_upsell_core::environment::Clock;
use checkout_upsell_core::reducer::Reducer;
use checkout_upsell_core::{async_effect, cancellable, delay, smallvec, SmallVec};
use checkout_upsell_runtime::Store;
use std::sync::Arc;

/// Effect id of the error banner timer
pub const ERROR_DISMISS: EffectId = EffectId::from_static("upsell-error-dismiss");

/// Collaborators injected into the reducer
#[derive(Clone)]
pub struct UpsellEnvironment {
    /// Offer source
    pub catalog: Arc<dyn CatalogClient>,
    /// Order mutation endpoint
    pub orders: Arc<dyn OrderService>,
    /// Clock for failure timestamps
    pub clock: Arc<dyn Clock>,
    /// Widget settings
    pub config: UpsellConfig,
}

impl UpsellEnvironment {
    /// Creates a new `UpsellEnvironment`
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        orders: Arc<dyn OrderService>,
        clock: Arc<dyn Clock>,
        config: UpsellConfig,
    ) -> Self {
        Self {
            catalog,
            orders,
            clock,
            config,
        }
    }
}

/// Store running the upsell widget
pub type UpsellStore = Store<UpsellState, UpsellAction, UpsellEnvironment, UpsellReducer>;

/// Reducer for the upsell widget
#[derive(Clone, Debug, Default)]
pub struct UpsellReducer;

impl UpsellReducer {
    /// Creates a new `UpsellReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Issue a catalog request for the current region
    ///
    /// Each request gets a new sequence number; results for older numbers
    /// are discarded on arrival.
    fn fetch(state: &mut UpsellState, env: &UpsellEnvironment) -> Effect<UpsellAction> {
        state.fetch_request += 1;
        state.loading = true;

        let request = state.fetch_request;
        let query = CatalogQuery::new(state.region, &env.config.catalog);
        let catalog = Arc::clone(&env.catalog);
        tracing::debug!(request, region = %query.region, "Fetching upsell candidates");

        async_effect! {
            match catalog.fetch_offers(&query).await {
                Ok(candidates) => Some(UpsellAction::CandidatesLoaded { request, candidates }),
                Err(error) => Some(UpsellAction::CandidatesFailed { request, error }),
            }
        }
    }

    fn is_stale(state: &UpsellState, request: u64) -> bool {
        if request == state.fetch_request {
            return false;
        }
        tracing::debug!(
            request,
            current = state.fetch_request,
            "Discarding stale catalog result"
        );
        true
    }

    /// Show the banner and (re)start its timer
    fn raise_error(state: &mut UpsellState, env: &UpsellEnvironment) -> Effect<UpsellAction> {
        state.show_error = true;
        state.error_generation += 1;

        cancellable! {
            id: ERROR_DISMISS,
            effect: delay! {
                duration: env.config.error_banner_duration(),
                action: UpsellAction::DismissError { generation: state.error_generation }
            }
        }
    }
}

impl Reducer for UpsellReducer {
    type State = UpsellState;
    type Action = UpsellAction;
    type Environment = UpsellEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Lifecycle ==========
            UpsellAction::Activate => {
                if state.active {
                    tracing::debug!("Upsell already active, ignoring Activate");
                    return SmallVec::new();
                }
                state.active = true;
                smallvec![Self::fetch(state, env)]
            },

            UpsellAction::Deactivate => {
                state.active = false;
                state.show_error = false;
                smallvec![Effect::Cancel(ERROR_DISMISS)]
            },

            UpsellAction::LocaleChanged { currency, language } => {
                let region = resolve_region(&currency, &language);
                state.currency = currency;
                state.language = language;

                if region == state.region {
                    return SmallVec::new();
                }
                tracing::debug!(from = %state.region, to = %region, "Upsell region changed");
                state.region = region;

                if state.active {
                    smallvec![Self::fetch(state, env)]
                } else {
                    SmallVec::new()
                }
            },

            UpsellAction::OrderLinesChanged { lines } => {
                tracing::trace!(lines = lines.len(), "Order snapshot updated");
                state.order_lines = lines;
                SmallVec::new()
            },

            // ========== Catalog ==========
            UpsellAction::CandidatesLoaded {
                request,
                candidates,
            } => {
                if Self::is_stale(state, request) {
                    return SmallVec::new();
                }
                metrics::counter!(names::CATALOG_FETCH, "outcome" => "success").increment(1);
                tracing::debug!(count = candidates.len(), region = %state.region, "Upsell candidates loaded");
                state.loading = false;
                state.candidates = candidates;
                SmallVec::new()
            },

            UpsellAction::CandidatesFailed { request, error } => {
                if Self::is_stale(state, request) {
                    return SmallVec::new();
                }
                metrics::counter!(names::CATALOG_FETCH, "outcome" => "failure").increment(1);
                tracing::warn!(%error, region = %state.region, "Upsell catalog fetch failed");
                state.loading = false;
                SmallVec::new()
            },

            // ========== Mutation ==========
            UpsellAction::AddToOrder { unit_id } => {
                if state.adding {
                    tracing::debug!(%unit_id, "Add already in flight, dropping AddToOrder");
                    return SmallVec::new();
                }
                state.adding = true;
                tracing::debug!(%unit_id, "Adding upsell offer to order");

                let orders = Arc::clone(&env.orders);
                smallvec![async_effect! {
                    match orders.add_line(CartLineAdd::one(unit_id)).await {
                        MutationOutcome::Success { lines } => Some(UpsellAction::MutationSucceeded { lines }),
                        MutationOutcome::Error { message } => Some(UpsellAction::MutationFailed { message }),
                    }
                }]
            },

            UpsellAction::MutationSucceeded { lines } => {
                metrics::counter!(names::MUTATION, "outcome" => "success").increment(1);
                state.adding = false;
                state.order_lines = lines;

                if state.show_error {
                    state.show_error = false;
                    smallvec![Effect::Cancel(ERROR_DISMISS)]
                } else {
                    SmallVec::new()
                }
            },

            UpsellAction::MutationFailed { message } => {
                metrics::counter!(names::MUTATION, "outcome" => "failure").increment(1);
                tracing::error!(%message, "Adding upsell offer failed");
                state.adding = false;
                state.last_failure = Some(MutationFailure {
                    message,
                    at: env.clock.now(),
                });

                if !state.active {
                    tracing::debug!("Upsell widget inactive, no error banner");
                    return SmallVec::new();
                }
                smallvec![Self::raise_error(state, env)]
            },

            UpsellAction::DismissError { generation } => {
                if generation == state.error_generation {
                    state.show_error = false;
                } else {
                    tracing::debug!(
                        generation,
                        current = state.error_generation,
                        "Ignoring outdated error dismissal"
                    );
                }
                SmallVec::new()
            },
        }
    }
}
