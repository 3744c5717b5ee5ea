//! Cart synchronization and offer selection.

use crate::types::{OfferCandidate, OrderLine, PurchasableUnitId};
use std::collections::HashSet;

/// Drop every candidate whose unit is already in the order
///
/// Stable: surviving candidates keep their catalog order.
#[must_use]
pub fn synchronize<'a>(candidates: &'a [OfferCandidate], lines: &[OrderLine]) -> Vec<&'a OfferCandidate> {
    let in_order: HashSet<&PurchasableUnitId> = lines.iter().map(|line| &line.unit_id).collect();

    candidates
        .iter()
        .filter(|candidate| !in_order.contains(&candidate.unit.id))
        .collect()
}

/// First candidate in catalog order, if any
#[must_use]
pub fn select<'a>(filtered: &[&'a OfferCandidate]) -> Option<&'a OfferCandidate> {
    filtered.first().copied()
}

/// The offer to present for the given inputs
#[must_use]
pub fn selection<'a>(candidates: &'a [OfferCandidate], lines: &[OrderLine]) -> Option<&'a OfferCandidate> {
    select(&synchronize(candidates, lines))
}
