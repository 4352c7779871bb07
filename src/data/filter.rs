use std::collections::HashSet;

use super::model::{Dataset, FilteredView, Listing};

// ---------------------------------------------------------------------------
// Filter predicate: price range, availability window, neighbourhood
// ---------------------------------------------------------------------------

/// The active selection. Bounds are inclusive and deliberately not
/// validated: inverted bounds simply match nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    pub price_min: f64,
    pub price_max: f64,
    pub availability_min: u16,
    pub availability_max: u16,
    pub neighbourhood: String,
}

/// Initial slider positions, from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDefaults {
    pub price_min: f64,
    pub price_max: f64,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            price_min: 50.0,
            price_max: 500.0,
        }
    }
}

impl ListingFilter {
    /// Starting selection for a freshly loaded dataset: the default price
    /// range clamped into the dataset's range, the full availability window
    /// and the first neighbourhood encountered.
    pub fn initial(dataset: &Dataset, defaults: &FilterDefaults) -> Self {
        let (price_min, price_max) = match price_bounds(&dataset.listings) {
            Some((lo, hi)) => (
                defaults.price_min.clamp(lo, hi),
                defaults.price_max.clamp(lo, hi),
            ),
            None => (defaults.price_min, defaults.price_max),
        };
        Self {
            price_min,
            price_max,
            availability_min: 0,
            availability_max: 365,
            neighbourhood: neighbourhood_options(&dataset.listings)
                .into_iter()
                .next()
                .unwrap_or_default(),
        }
    }

    /// Whether a single listing passes every predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.price_min <= listing.price
            && listing.price <= self.price_max
            && self.availability_min <= listing.availability_365
            && listing.availability_365 <= self.availability_max
            && listing.neighbourhood == self.neighbourhood
    }

    /// Select the matching listings, keeping table order.
    pub fn apply<'a>(&self, listings: &'a [Listing]) -> FilteredView<'a> {
        let indices = listings
            .iter()
            .enumerate()
            .filter(|(_, l)| self.matches(l))
            .map(|(i, _)| i)
            .collect();
        FilteredView::new(listings, indices)
    }
}

/// Distinct neighbourhood names in order of first appearance.
pub fn neighbourhood_options(listings: &[Listing]) -> Vec<String> {
    let mut seen = HashSet::new();
    listings
        .iter()
        .filter(|l| seen.insert(l.neighbourhood.as_str()))
        .map(|l| l.neighbourhood.clone())
        .collect()
}

/// Whole-number price range of the table, as the price slider shows it.
pub fn price_bounds(listings: &[Listing]) -> Option<(f64, f64)> {
    let mut prices = listings.iter().map(|l| l.price);
    let first = prices.next()?;
    let (lo, hi) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Some((lo.floor(), hi.floor()))
}
