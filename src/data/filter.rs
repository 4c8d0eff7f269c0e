use std::collections::BTreeSet;
use std::fmt;

use super::model::{Dataset, Listing};

// ---------------------------------------------------------------------------
// Suite selector
// ---------------------------------------------------------------------------

/// Tri-state suite selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuiteFilter {
    #[default]
    Any,
    Yes,
    No,
}

impl SuiteFilter {
    pub const ALL: [SuiteFilter; 3] = [SuiteFilter::Any, SuiteFilter::Yes, SuiteFilter::No];

    /// The suite flag a listing must carry, or `None` for no restriction.
    pub fn required_flag(self) -> Option<i64> {
        match self {
            SuiteFilter::Any => None,
            SuiteFilter::Yes => Some(1),
            SuiteFilter::No => Some(0),
        }
    }
}

impl fmt::Display for SuiteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteFilter::Any => write!(f, "Any"),
            SuiteFilter::Yes => write!(f, "Yes"),
            SuiteFilter::No => write!(f, "No"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// The active filter selections.  An empty set means "no restriction".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub neighborhoods: BTreeSet<String>,
    pub min_price: f64,
    pub max_price: f64,
    pub rooms: BTreeSet<i64>,
    pub suite: SuiteFilter,
    pub parking: BTreeSet<i64>,
}

impl FilterCriteria {
    /// Initial selections for a freshly loaded dataset: no neighborhood
    /// restriction, the full observed price range, every room and parking
    /// count selected.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        FilterCriteria {
            neighborhoods: BTreeSet::new(),
            min_price: dataset.min_price,
            max_price: dataset.max_price,
            rooms: dataset.room_counts.clone(),
            suite: SuiteFilter::Any,
            parking: dataset.parking_counts.clone(),
        }
    }

    /// Repair an inverted price range by moving the minimum to `max - 1`.
    /// Returns `true` when the range was changed.
    ///
    /// The result may be negative or below the observed prices; it is kept
    /// as is.
    pub fn clamp_price_range(&mut self) -> bool {
        if self.min_price > self.max_price {
            log::warn!(
                "Minimum price {} exceeds maximum {}; clamping minimum to {}",
                self.min_price,
                self.max_price,
                self.max_price - 1.0
            );
            self.min_price = self.max_price - 1.0;
            true
        } else {
            false
        }
    }

    /// Whether a listing passes every active predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        if !self.neighborhoods.is_empty() && !self.neighborhoods.contains(&listing.neighborhood) {
            return false;
        }
        if !self.rooms.is_empty() && !self.rooms.contains(&listing.rooms) {
            return false;
        }
        if let Some(flag) = self.suite.required_flag() {
            if listing.suites != flag {
                return false;
            }
        }
        if !self.parking.is_empty() && !self.parking.contains(&listing.parking) {
            return false;
        }
        listing.price >= self.min_price && listing.price <= self.max_price
    }
}

/// Return the listings that pass all active filters, in their original order.
pub fn filter_listings(listings: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| criteria.matches(l))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::listing;

    fn sample() -> Vec<Listing> {
        vec![
            listing("Centro", 900.0, 40.0, 1, 0, 0),
            listing("Centro", 1500.0, 60.0, 2, 0, 1),
            listing("Batel", 3200.0, 95.0, 3, 1, 2),
            listing("Agua Verde", 2100.0, 75.0, 2, 1, 1),
            listing("Batel", 5500.0, 140.0, 4, 1, 3),
        ]
    }

    fn open_range(min: f64, max: f64) -> FilterCriteria {
        FilterCriteria {
            min_price: min,
            max_price: max,
            ..FilterCriteria::default()
        }
    }

    #[test]
    fn empty_selectors_only_restrict_price() {
        let listings = sample();
        let criteria = open_range(1000.0, 3200.0);

        let result = filter_listings(&listings, &criteria);
        let expected: Vec<Listing> = listings
            .iter()
            .filter(|l| l.price >= 1000.0 && l.price <= 3200.0)
            .cloned()
            .collect();
        assert_eq!(result, expected);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let result = filter_listings(&sample(), &open_range(900.0, 1500.0));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let criteria = FilterCriteria {
            neighborhoods: ["Batel".to_string(), "Centro".to_string()].into(),
            rooms: [2, 3].into(),
            suite: SuiteFilter::Yes,
            ..open_range(0.0, 10_000.0)
        };
        let result = filter_listings(&sample(), &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].price, 3200.0);
    }

    #[test]
    fn suite_no_keeps_only_zero_flag() {
        let criteria = FilterCriteria {
            suite: SuiteFilter::No,
            ..open_range(0.0, 10_000.0)
        };
        let result = filter_listings(&sample(), &criteria);
        assert!(result.iter().all(|l| l.suites == 0));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn parking_selection_restricts() {
        let criteria = FilterCriteria {
            parking: [0, 3].into(),
            ..open_range(0.0, 10_000.0)
        };
        let result = filter_listings(&sample(), &criteria);
        assert_eq!(
            result.iter().map(|l| l.parking).collect::<Vec<_>>(),
            vec![0, 3]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let criteria = FilterCriteria {
            neighborhoods: ["Batel".to_string()].into(),
            ..open_range(1000.0, 6000.0)
        };
        let once = filter_listings(&sample(), &criteria);
        let twice = filter_listings(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn defaults_for_dataset_select_everything() {
        let ds = Dataset::from_listings(sample());
        let criteria = FilterCriteria::for_dataset(&ds);
        assert!(criteria.neighborhoods.is_empty());
        assert_eq!(criteria.rooms, ds.room_counts);
        assert_eq!(criteria.parking, ds.parking_counts);
        assert_eq!(criteria.suite, SuiteFilter::Any);
        assert_eq!(filter_listings(&ds.listings, &criteria).len(), ds.len());
    }

    #[test]
    fn inverted_range_clamps_min_to_max_minus_one() {
        let mut criteria = open_range(3000.0, 2000.0);
        assert!(criteria.clamp_price_range());
        assert_eq!(criteria.min_price, 1999.0);
        assert_eq!(criteria.max_price, 2000.0);

        let mut ordered = open_range(1000.0, 2000.0);
        assert!(!ordered.clamp_price_range());
        assert_eq!(ordered.min_price, 1000.0);
    }

    #[test]
    fn clamp_keeps_degenerate_negative_minimum() {
        let mut criteria = open_range(500.0, 0.0);
        assert!(criteria.clamp_price_range());
        assert_eq!(criteria.min_price, -1.0);
    }

    #[test]
    fn first_listing_scenario() {
        let listings = vec![
            listing("A", 1000.0, 50.0, 1, 0, 1),
            listing("B", 3000.0, 100.0, 2, 1, 1),
        ];
        let result = filter_listings(&listings, &open_range(0.0, 2000.0));
        assert_eq!(result, vec![listings[0].clone()]);
    }
}
