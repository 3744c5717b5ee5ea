//! Domain types for the checkout upsell widget.
//!
//! Value objects for catalog candidates, order lines and the locale signal.
//! Everything here is immutable once constructed; the widget's only mutable
//! state lives in [`UpsellState`](crate::state::UpsellState).

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier issued by the catalog or order service
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Catalog identifier of an offer candidate (the product)
    CandidateId
);

string_id!(
    /// Identifier of a purchasable unit (the sellable variant)
    ///
    /// Both candidates and order lines reference units by this id; it is the
    /// identity key for deduplication.
    PurchasableUnitId
);

string_id!(
    /// Identifier of a line in the shopper's order
    OrderLineId
);

// ============================================================================
// Locale
// ============================================================================

/// Catalog region used to scope the offer query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionCode {
    /// France
    FR,
    /// Germany (and the default euro region)
    DE,
    /// Canada
    CA,
    /// United States (default fallback)
    #[default]
    US,
}

impl RegionCode {
    /// Every region the resolver can produce
    pub const ALL: [Self; 4] = [Self::FR, Self::DE, Self::CA, Self::US];

    /// ISO 3166-1 alpha-2 country code passed to the catalog
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FR => "FR",
            Self::DE => "DE",
            Self::CA => "CA",
            Self::US => "US",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ISO 4217 currency code, stored upper-case
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a currency code, normalizing to upper-case
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// The code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// BCP-47 language tag as reported by the host (e.g. `fr-FR`)
///
/// Kept verbatim; the region resolver compares it exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Wrap a language tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased primary language subtag (`fr` for `fr-FR`)
    #[must_use]
    pub fn primary(&self) -> String {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self::new("en-US")
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

// ============================================================================
// Catalog values
// ============================================================================

/// Monetary amount as the catalog reports it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision)
    pub amount: String,
    /// ISO 4217 currency code
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a money value
    #[must_use]
    pub fn new(amount: impl Into<String>, currency_code: impl Into<CurrencyCode>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        }
    }
}

/// The sellable variant an offer would add to the order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasableUnit {
    /// Unit identifier
    pub id: PurchasableUnitId,
    /// Unit price
    pub price: Money,
}

/// A catalog item eligible for upsell presentation
///
/// Always carries exactly one purchasable unit; catalog products without
/// one are dropped while decoding the catalog response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCandidate {
    /// Candidate identifier
    pub id: CandidateId,
    /// Display title
    pub title: String,
    /// First catalog image, if any
    pub image_url: Option<String>,
    /// Representative purchasable unit
    pub unit: PurchasableUnit,
}

impl OfferCandidate {
    /// Create a candidate without an image
    #[must_use]
    pub fn new(id: impl Into<CandidateId>, title: impl Into<String>, unit: PurchasableUnit) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: None,
            unit,
        }
    }

    /// Attach a representative image
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

// ============================================================================
// Order snapshot
// ============================================================================

/// One line of the shopper's in-progress order
///
/// Owned by the host; the widget only reads snapshots of these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Line identifier
    pub id: OrderLineId,
    /// Purchasable unit the line references
    pub unit_id: PurchasableUnitId,
    /// Quantity on the line
    pub quantity: u32,
}

impl OrderLine {
    /// Create an order line
    #[must_use]
    pub fn new(
        id: impl Into<OrderLineId>,
        unit_id: impl Into<PurchasableUnitId>,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            unit_id: unit_id.into(),
            quantity,
        }
    }
}
