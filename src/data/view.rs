use super::aggregate::{
    self, Kpis, NeighborhoodMean, PriceBucketStats, SizeBucketStats, SuiteComparison,
};
use super::filter::FilterCriteria;
use super::model::Listing;

pub const NO_MATCHES_MESSAGE: &str =
    "No listings match the current filters. Try adjusting the search criteria.";
pub const RANKING_UNAVAILABLE_MESSAGE: &str =
    "Select more than one neighborhood to see the ranking.";
pub const SUITE_UNAVAILABLE_MESSAGE: &str =
    "Select listings with and without a suite to see the comparison.";
pub const PRICE_RANGE_WARNING: &str = "The minimum price cannot be greater than the maximum.";

/// Everything the dashboard shows for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    /// Nothing matched; only [`NO_MATCHES_MESSAGE`] is shown.
    Empty,
    Ready(Report),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub kpis: Kpis,
    /// `None` when fewer than two neighborhoods are present.
    pub ranking: Option<Vec<NeighborhoodMean>>,
    pub size_buckets: Vec<SizeBucketStats>,
    pub price_buckets: Vec<PriceBucketStats>,
    /// `None` unless both suite groups are present.
    pub suite_comparison: Option<SuiteComparison>,
    /// Price range the rows were filtered with.
    pub price_range: (f64, f64),
    /// Detail-table rows, cheapest first.
    pub rows: Vec<Listing>,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        matches!(self, ViewModel::Empty)
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            ViewModel::Ready(report) => Some(report),
            ViewModel::Empty => None,
        }
    }
}

/// Build the view model for an already filtered set.  Pure: the same inputs
/// always yield the same output.
pub fn render(filtered: &[Listing], criteria: &FilterCriteria) -> ViewModel {
    let Some(kpis) = aggregate::kpis(filtered) else {
        return ViewModel::Empty;
    };

    let mut rows = filtered.to_vec();
    rows.sort_by(|a, b| a.price.total_cmp(&b.price));

    ViewModel::Ready(Report {
        kpis,
        ranking: aggregate::neighborhood_ranking(filtered),
        size_buckets: aggregate::size_buckets(filtered),
        price_buckets: aggregate::price_buckets(filtered),
        suite_comparison: aggregate::suite_comparison(filtered),
        price_range: (criteria.min_price, criteria.max_price),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_listings;
    use crate::data::model::listing;

    fn criteria(min: f64, max: f64) -> FilterCriteria {
        FilterCriteria {
            min_price: min,
            max_price: max,
            ..FilterCriteria::default()
        }
    }

    #[test]
    fn empty_set_renders_empty_view() {
        let view = render(&[], &criteria(0.0, 100.0));
        assert!(view.is_empty());
        assert!(view.report().is_none());
    }

    #[test]
    fn single_neighborhood_all_suites_degrades_gracefully() {
        let listings = vec![
            listing("Centro", 3000.0, 100.0, 2, 1, 1),
            listing("Centro", 1000.0, 50.0, 1, 1, 1),
        ];
        let view = render(&listings, &criteria(0.0, 5000.0));
        let report = view.report().unwrap();
        assert!(report.ranking.is_none());
        assert!(report.suite_comparison.is_none());
        assert_eq!(report.kpis.count, 2);
    }

    #[test]
    fn rows_are_sorted_by_price() {
        let listings = vec![
            listing("B", 3000.0, 100.0, 2, 1, 1),
            listing("A", 1000.0, 50.0, 1, 0, 1),
            listing("C", 2000.0, 70.0, 1, 0, 1),
        ];
        let report = render(&listings, &criteria(0.0, 5000.0)).report().cloned().unwrap();
        let prices: Vec<f64> = report.rows.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![1000.0, 2000.0, 3000.0]);
        assert_eq!(report.price_range, (0.0, 5000.0));
        assert!(report.ranking.is_some());
        assert!(report.suite_comparison.is_some());
    }

    #[test]
    fn render_is_repeatable() {
        let listings = vec![
            listing("A", 1000.0, 50.0, 1, 0, 1),
            listing("B", 3000.0, 100.0, 2, 1, 1),
        ];
        let c = criteria(0.0, 2000.0);
        let filtered = filter_listings(&listings, &c);
        assert_eq!(render(&filtered, &c), render(&filtered, &c));

        let report = render(&filtered, &c).report().cloned().unwrap();
        assert_eq!(report.kpis.mean_price, 1000.0);
        assert_eq!(report.kpis.price_per_area, 20.0);
    }
}
