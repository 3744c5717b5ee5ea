//! Region resolution for catalog lookups.

use crate::types::{CurrencyCode, LanguageTag, RegionCode};

/// Map the shopper's currency and language to the catalog region
///
/// First match wins:
///
/// | currency | language | region |
/// |----------|----------|--------|
/// | EUR      | `fr-FR`  | FR     |
/// | EUR      | other    | DE     |
/// | CAD      | any      | CA     |
/// | other    | any      | US     |
///
/// Total: every pair resolves, with US as the fallback.
#[must_use]
pub fn resolve_region(currency: &CurrencyCode, language: &LanguageTag) -> RegionCode {
    match currency.as_str() {
        "EUR" if language.as_str() == "fr-FR" => RegionCode::FR,
        "EUR" => RegionCode::DE,
        "CAD" => RegionCode::CA,
        _ => RegionCode::US,
    }
}
