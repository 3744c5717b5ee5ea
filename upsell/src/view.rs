//! What the presentation layer renders.

use crate::format::{format_price, Labels};
use crate::state::{UpsellAction, UpsellState};
use crate::types::{CandidateId, PurchasableUnitId};
use serde::Serialize;

/// The selected offer, ready to display
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OfferView {
    /// Candidate identifier
    pub id: CandidateId,
    /// Display title
    pub title: String,
    /// Representative image
    pub image_url: Option<String>,
    /// Unit the add button submits
    pub unit_id: PurchasableUnitId,
    /// Price localized for the shopper
    pub formatted_price: String,
}

/// Snapshot handed to the renderer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    /// Catalog fetch outstanding
    pub loading: bool,
    /// Offer to show; `None` renders nothing
    pub offer: Option<OfferView>,
    /// Add in flight
    pub adding: bool,
    /// Failed-add banner visible
    pub show_error: bool,
    /// Static strings in the shopper's language
    pub labels: Labels,
}

impl RenderOutput {
    /// Whether the add button may dispatch
    #[must_use]
    pub const fn can_add(&self) -> bool {
        !self.adding && self.offer.is_some()
    }

    /// The action the add button dispatches, if it may
    ///
    /// Callers check this instead of dispatching unconditionally; it is the
    /// guard against double submission.
    #[must_use]
    pub fn add_action(&self) -> Option<UpsellAction> {
        if self.adding {
            return None;
        }
        self.offer.as_ref().map(|offer| UpsellAction::AddToOrder {
            unit_id: offer.unit_id.clone(),
        })
    }
}

impl UpsellState {
    /// Build the renderer snapshot
    #[must_use]
    pub fn render(&self) -> RenderOutput {
        let offer = self.selection().map(|candidate| OfferView {
            id: candidate.id.clone(),
            title: candidate.title.clone(),
            image_url: candidate.image_url.clone(),
            unit_id: candidate.unit.id.clone(),
            formatted_price: format_price(&candidate.unit.price, &self.language),
        });

        RenderOutput {
            loading: self.loading,
            offer,
            adding: self.adding,
            show_error: self.show_error,
            labels: Labels::for_language(&self.language),
        }
    }
}
