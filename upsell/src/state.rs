//! Widget state and the actions that drive it.

use crate::cart;
use crate::catalog::FetchError;
use crate::locale::resolve_region;
use crate::mutation::MutationFailure;
use crate::types::{CurrencyCode, LanguageTag, OfferCandidate, OrderLine, PurchasableUnitId, RegionCode};

/// Everything the widget knows
///
/// Only [`UpsellReducer`](crate::reducer::UpsellReducer) writes it. The
/// selected offer is derived on demand through [`UpsellState::selection`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpsellState {
    /// Between `Activate` and `Deactivate`
    pub active: bool,
    /// Shopper's currency
    pub currency: CurrencyCode,
    /// Shopper's language
    pub language: LanguageTag,
    /// Region resolved from currency and language
    pub region: RegionCode,
    /// Last successfully fetched candidates, in catalog order
    pub candidates: Vec<OfferCandidate>,
    /// Latest order snapshot from the host
    pub order_lines: Vec<OrderLine>,
    /// A catalog fetch is outstanding
    pub loading: bool,
    /// An add-to-order request is outstanding
    pub adding: bool,
    /// The failed-add banner is visible
    pub show_error: bool,
    /// Bumped every time the banner is raised
    pub error_generation: u64,
    /// Sequence number of the newest catalog request
    pub fetch_request: u64,
    /// Last failed add, for diagnostics
    pub last_failure: Option<MutationFailure>,
}

impl UpsellState {
    /// Inactive state for the given locale
    #[must_use]
    pub fn new(currency: CurrencyCode, language: LanguageTag) -> Self {
        let region = resolve_region(&currency, &language);
        Self {
            currency,
            language,
            region,
            ..Self::default()
        }
    }

    /// The offer to present right now
    #[must_use]
    pub fn selection(&self) -> Option<&OfferCandidate> {
        cart::selection(&self.candidates, &self.order_lines)
    }

    /// Whether an add can be dispatched: nothing in flight and an offer to add
    #[must_use]
    pub fn can_add(&self) -> bool {
        !self.adding && self.selection().is_some()
    }
}

/// Inputs to the widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpsellAction {
    /// The widget mounted; fetch candidates once
    Activate,
    /// The widget unmounted
    Deactivate,
    /// The host reported a currency or language
    LocaleChanged {
        /// Shopper's currency
        currency: CurrencyCode,
        /// Shopper's language
        language: LanguageTag,
    },
    /// The host pushed a new order snapshot
    OrderLinesChanged {
        /// Current order lines
        lines: Vec<OrderLine>,
    },
    /// A catalog fetch finished
    CandidatesLoaded {
        /// Sequence number of the request
        request: u64,
        /// Candidates in catalog order
        candidates: Vec<OfferCandidate>,
    },
    /// A catalog fetch failed
    CandidatesFailed {
        /// Sequence number of the request
        request: u64,
        /// Why it failed
        error: FetchError,
    },
    /// The shopper pressed the add button for the selected offer
    AddToOrder {
        /// Unit captured at press time
        unit_id: PurchasableUnitId,
    },
    /// The order service accepted the add
    MutationSucceeded {
        /// Order lines after the change
        lines: Vec<OrderLine>,
    },
    /// The order service rejected the add
    MutationFailed {
        /// Diagnostic from the service
        message: String,
    },
    /// The banner timer for `generation` expired
    DismissError {
        /// Generation of the banner the timer was started for
        generation: u64,
    },
}
