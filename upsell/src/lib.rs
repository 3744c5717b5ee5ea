//! # Checkout Upsell
//!
//! Recommends one extra item during checkout and adds it to the order with
//! a single action.
//!
//! ```text
//! LocaleChanged ──► resolve_region ──► CatalogQuery ──► CatalogClient
//!                                                           │
//!                                           CandidatesLoaded / Failed
//!                                                           ▼
//! OrderLinesChanged ─────────────────────► synchronize ──► select ──► RenderOutput
//!                                                                        │
//!                              AddToOrder ◄──── add_action() ◄───────────┘
//!                                  │
//!                             OrderService ──► MutationSucceeded / MutationFailed
//!                                                                   │
//!                                          DismissError ◄── banner timer (cancellable)
//! ```
//!
//! All state lives in [`UpsellState`] and changes only through
//! [`UpsellReducer`]. Hosts run the reducer in an [`UpsellStore`], push
//! locale and order signals in as [`UpsellAction`]s, and render
//! [`UpsellState::render`].
//!
//! ## Example
//!
//! ```no_run
//! use checkout_upsell::mutation::MutationFuture;
//! use checkout_upsell::{
//!     CartLineAdd, HttpCatalogClient, MutationOutcome, OrderService, UpsellAction, UpsellConfig,
//!     UpsellEnvironment, UpsellReducer, UpsellState, UpsellStore,
//! };
//! use checkout_upsell_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! /// The host's cart, reached through its own checkout API
//! struct HostCart;
//!
//! impl OrderService for HostCart {
//!     fn add_line(&self, change: CartLineAdd) -> MutationFuture {
//!         Box::pin(async move {
//!             // Forward `change` to the checkout and report its answer.
//!             MutationOutcome::Error {
//!                 message: format!("checkout rejected {}", change.unit_id),
//!             }
//!         })
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UpsellConfig::from_env()?;
//! let catalog = Arc::new(HttpCatalogClient::new(&config.catalog)?);
//! let env = UpsellEnvironment::new(catalog, Arc::new(HostCart), Arc::new(SystemClock), config);
//!
//! let store = UpsellStore::new(
//!     UpsellState::new("EUR".into(), "fr-FR".into()),
//!     UpsellReducer::new(),
//!     env,
//! );
//! store.send(UpsellAction::Activate).await?;
//!
//! let output = store.state(UpsellState::render).await;
//! if let Some(action) = output.add_action() {
//!     store.send(action).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod format;
pub mod locale;
pub mod mocks;
pub mod mutation;
pub mod order_feed;
pub mod reducer;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod view;

pub use catalog::{CatalogClient, CatalogQuery, FetchError, HttpCatalogClient};
pub use config::{CatalogConfig, ConfigError, UpsellConfig};
pub use mutation::{CartLineAdd, MutationOutcome, OrderService};
pub use reducer::{UpsellEnvironment, UpsellReducer, UpsellStore, ERROR_DISMISS};
pub use state::{UpsellAction, UpsellState};
pub use view::{OfferView, RenderOutput};
