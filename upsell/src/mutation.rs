//! Add-to-order requests and their outcomes.

use crate::types::{OrderLine, PurchasableUnitId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Request to add one line to the order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineAdd {
    /// Unit to add
    #[serde(rename = "merchandiseId")]
    pub unit_id: PurchasableUnitId,
    /// Always 1 for an upsell
    pub quantity: u32,
}

impl CartLineAdd {
    /// Add a single unit
    #[must_use]
    pub const fn one(unit_id: PurchasableUnitId) -> Self {
        Self {
            unit_id,
            quantity: 1,
        }
    }
}

/// What the order service reported
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MutationOutcome {
    /// The line was added; carries the updated order
    Success {
        /// Order lines after the change
        lines: Vec<OrderLine>,
    },
    /// The service rejected the change
    Error {
        /// Diagnostic from the service
        message: String,
    },
}

/// Boxed future returned by [`OrderService::add_line`]
pub type MutationFuture = Pin<Box<dyn Future<Output = MutationOutcome> + Send>>;

/// The host's order mutation endpoint
///
/// Implementations report transport problems as [`MutationOutcome::Error`];
/// there is no separate error channel.
pub trait OrderService: Send + Sync {
    /// Apply `change` to the shopper's order
    fn add_line(&self, change: CartLineAdd) -> MutationFuture;
}

/// The last failed add, kept for host diagnostics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationFailure {
    /// Diagnostic from the order service
    pub message: String,
    /// When the failure was recorded
    pub at: DateTime<Utc>,
}
