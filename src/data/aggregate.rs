//! Summary statistics and fixed-bin classifications over a filtered set.
//!
//! Everything here is a pure function of the slice it is given; nothing is
//! cached between calls.  NaN cells (blank in the source) are skipped by
//! sums and means.

use std::collections::BTreeMap;
use std::fmt;

use super::model::Listing;

/// Number of neighborhoods shown in the ranking.
pub const RANKING_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub mean_price: f64,
    /// NaN when every monthly cost is missing.
    pub mean_monthly_cost: f64,
    /// sum(price) / sum(area), or 0 when the total area is not positive.
    pub price_per_area: f64,
    pub count: usize,
}

/// Overall KPIs, or `None` for an empty set.
pub fn kpis(listings: &[Listing]) -> Option<Kpis> {
    if listings.is_empty() {
        return None;
    }
    Some(Kpis {
        mean_price: mean(listings.iter().map(|l| l.price)).unwrap_or(f64::NAN),
        mean_monthly_cost: mean(listings.iter().map(|l| l.monthly_cost)).unwrap_or(f64::NAN),
        price_per_area: price_per_area(listings),
        count: listings.len(),
    })
}

pub fn price_per_area(listings: &[Listing]) -> f64 {
    let total_price: f64 = listings.iter().map(|l| l.price).filter(|v| !v.is_nan()).sum();
    let total_area: f64 = listings.iter().map(|l| l.area).filter(|v| !v.is_nan()).sum();
    if total_area > 0.0 {
        total_price / total_area
    } else {
        0.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Neighborhood ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodMean {
    pub neighborhood: String,
    pub mean_price: f64,
}

/// Mean price per neighborhood, highest first, at most [`RANKING_SIZE`]
/// entries.  `None` unless more than one neighborhood is present.
pub fn neighborhood_ranking(listings: &[Listing]) -> Option<Vec<NeighborhoodMean>> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for l in listings {
        let entry = groups.entry(l.neighborhood.as_str()).or_insert((0.0, 0));
        if !l.price.is_nan() {
            entry.0 += l.price;
            entry.1 += 1;
        }
    }
    if groups.len() <= 1 {
        return None;
    }

    let mut ranking: Vec<NeighborhoodMean> = groups
        .into_iter()
        .map(|(name, (sum, n))| NeighborhoodMean {
            neighborhood: name.to_string(),
            mean_price: sum / n as f64,
        })
        .collect();
    // Stable sort keeps alphabetical order between ties.
    ranking.sort_by(|a, b| b.mean_price.total_cmp(&a.mean_price));
    ranking.truncate(RANKING_SIZE);
    Some(ranking)
}

// ---------------------------------------------------------------------------
// Size buckets
// ---------------------------------------------------------------------------

/// Area bins: (0,50], (50,70], (70,90], (90,120], (120,∞).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeBucket {
    UpTo50,
    From51To70,
    From71To90,
    From91To120,
    Above120,
}

impl SizeBucket {
    pub const ALL: [SizeBucket; 5] = [
        SizeBucket::UpTo50,
        SizeBucket::From51To70,
        SizeBucket::From71To90,
        SizeBucket::From91To120,
        SizeBucket::Above120,
    ];

    /// Non-positive areas fall into the first bin so that every listing is
    /// classified exactly once.
    pub fn classify(area: f64) -> SizeBucket {
        match area {
            a if a > 120.0 => SizeBucket::Above120,
            a if a > 90.0 => SizeBucket::From91To120,
            a if a > 70.0 => SizeBucket::From71To90,
            a if a > 50.0 => SizeBucket::From51To70,
            _ => SizeBucket::UpTo50,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeBucket::UpTo50 => "Up to 50m²",
            SizeBucket::From51To70 => "51-70m²",
            SizeBucket::From71To90 => "71-90m²",
            SizeBucket::From91To120 => "91-120m²",
            SizeBucket::Above120 => "Above 120m²",
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBucketStats {
    pub bucket: SizeBucket,
    pub count: usize,
    /// `None` when the bin is empty.
    pub mean_price: Option<f64>,
}

/// Count and mean price for every size bin, in bin order.
pub fn size_buckets(listings: &[Listing]) -> Vec<SizeBucketStats> {
    SizeBucket::ALL
        .iter()
        .map(|&bucket| {
            let prices = || {
                listings
                    .iter()
                    .filter(move |l| SizeBucket::classify(l.area) == bucket)
                    .map(|l| l.price)
            };
            SizeBucketStats {
                bucket,
                count: prices().count(),
                mean_price: mean(prices()),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Price buckets
// ---------------------------------------------------------------------------

/// Price bins: (0,1000], (1000,2000], ... (4000,5000], (5000,∞).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceBucket {
    UpTo1000,
    From1001To2000,
    From2001To3000,
    From3001To4000,
    From4001To5000,
    Above5000,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 6] = [
        PriceBucket::UpTo1000,
        PriceBucket::From1001To2000,
        PriceBucket::From2001To3000,
        PriceBucket::From3001To4000,
        PriceBucket::From4001To5000,
        PriceBucket::Above5000,
    ];

    /// Non-positive prices fall into the first bin.
    pub fn classify(price: f64) -> PriceBucket {
        match price {
            p if p > 5000.0 => PriceBucket::Above5000,
            p if p > 4000.0 => PriceBucket::From4001To5000,
            p if p > 3000.0 => PriceBucket::From3001To4000,
            p if p > 2000.0 => PriceBucket::From2001To3000,
            p if p > 1000.0 => PriceBucket::From1001To2000,
            _ => PriceBucket::UpTo1000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::UpTo1000 => "Up to R$1.000",
            PriceBucket::From1001To2000 => "R$1.001-2.000",
            PriceBucket::From2001To3000 => "R$2.001-3.000",
            PriceBucket::From3001To4000 => "R$3.001-4.000",
            PriceBucket::From4001To5000 => "R$4.001-5.000",
            PriceBucket::Above5000 => "Above R$5.000",
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBucketStats {
    pub bucket: PriceBucket,
    pub count: usize,
}

/// Listing count for every price bin, in bin order.
pub fn price_buckets(listings: &[Listing]) -> Vec<PriceBucketStats> {
    let mut counts = [0usize; PriceBucket::ALL.len()];
    for l in listings {
        counts[PriceBucket::classify(l.price) as usize] += 1;
    }
    PriceBucket::ALL
        .iter()
        .zip(counts)
        .map(|(&bucket, count)| PriceBucketStats { bucket, count })
        .collect()
}

// ---------------------------------------------------------------------------
// Suite comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuiteComparison {
    pub with_suite: f64,
    pub without_suite: f64,
}

/// Mean price with and without a suite.  `None` unless both groups are
/// present.
pub fn suite_comparison(listings: &[Listing]) -> Option<SuiteComparison> {
    let with_suite = mean(listings.iter().filter(|l| l.has_suite()).map(|l| l.price))?;
    let without_suite = mean(listings.iter().filter(|l| l.suites == 0).map(|l| l.price))?;
    Some(SuiteComparison {
        with_suite,
        without_suite,
    })
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
            listing("Portao", 1000.0, 50.0, 1, 0, 0),
        ]
    }

    #[test]
    fn single_listing_kpis() {
        let listings = vec![listing("A", 1000.0, 50.0, 1, 0, 1)];
        let k = kpis(&listings).unwrap();
        assert_eq!(k.mean_price, 1000.0);
        assert_eq!(k.price_per_area, 20.0);
        assert_eq!(k.count, 1);
        assert_eq!(k.mean_monthly_cost, 1300.0);
    }

    #[test]
    fn missing_cells_are_skipped_by_means_and_sums() {
        let mut blank = listing("A", 2000.0, 50.0, 1, 0, 1);
        blank.monthly_cost = f64::NAN;
        blank.area = f64::NAN;
        let listings = vec![listing("A", 1000.0, 50.0, 1, 0, 1), blank];

        let k = kpis(&listings).unwrap();
        assert_eq!(k.mean_price, 1500.0);
        assert_eq!(k.mean_monthly_cost, 1300.0);
        assert_eq!(k.price_per_area, 60.0);
        assert_eq!(k.count, 2);
    }

    #[test]
    fn kpis_are_none_for_empty_set() {
        assert!(kpis(&[]).is_none());
    }

    #[test]
    fn price_per_area_is_zero_without_area() {
        let listings = vec![
            listing("A", 1000.0, 0.0, 1, 0, 1),
            listing("B", 2000.0, 0.0, 1, 0, 1),
        ];
        assert_eq!(price_per_area(&listings), 0.0);
        assert_eq!(kpis(&listings).unwrap().price_per_area, 0.0);
        assert_eq!(price_per_area(&[]), 0.0);
    }

    #[test]
    fn ranking_is_descending_by_mean() {
        let ranking = neighborhood_ranking(&sample()).unwrap();
        let names: Vec<&str> = ranking.iter().map(|r| r.neighborhood.as_str()).collect();
        assert_eq!(names, vec!["Batel", "Agua Verde", "Centro", "Portao"]);
        assert_eq!(ranking[0].mean_price, 4350.0);
        assert_eq!(ranking[2].mean_price, 1200.0);
    }

    #[test]
    fn ranking_needs_more_than_one_neighborhood() {
        let single = vec![
            listing("Centro", 900.0, 40.0, 1, 0, 0),
            listing("Centro", 1500.0, 60.0, 2, 0, 1),
        ];
        assert!(neighborhood_ranking(&single).is_none());
        assert!(neighborhood_ranking(&[]).is_none());
    }

    #[test]
    fn ranking_keeps_top_ten() {
        let listings: Vec<Listing> = (0..15)
            .map(|i| listing(&format!("N{i:02}"), 1000.0 + i as f64 * 100.0, 50.0, 1, 0, 0))
            .collect();
        let ranking = neighborhood_ranking(&listings).unwrap();
        assert_eq!(ranking.len(), RANKING_SIZE);
        assert_eq!(ranking[0].neighborhood, "N14");
        assert_eq!(ranking[9].neighborhood, "N05");
    }

    #[test]
    fn size_bins_use_right_closed_edges() {
        assert_eq!(SizeBucket::classify(50.0), SizeBucket::UpTo50);
        assert_eq!(SizeBucket::classify(50.5), SizeBucket::From51To70);
        assert_eq!(SizeBucket::classify(70.0), SizeBucket::From51To70);
        assert_eq!(SizeBucket::classify(90.0), SizeBucket::From71To90);
        assert_eq!(SizeBucket::classify(120.0), SizeBucket::From91To120);
        assert_eq!(SizeBucket::classify(120.1), SizeBucket::Above120);
        assert_eq!(SizeBucket::classify(0.0), SizeBucket::UpTo50);
    }

    #[test]
    fn price_bins_use_right_closed_edges() {
        assert_eq!(PriceBucket::classify(1000.0), PriceBucket::UpTo1000);
        assert_eq!(PriceBucket::classify(1000.01), PriceBucket::From1001To2000);
        assert_eq!(PriceBucket::classify(5000.0), PriceBucket::From4001To5000);
        assert_eq!(PriceBucket::classify(12000.0), PriceBucket::Above5000);
    }

    #[test]
    fn buckets_partition_the_set() {
        let listings = sample();

        let sizes = size_buckets(&listings);
        assert_eq!(sizes.len(), SizeBucket::ALL.len());
        assert_eq!(sizes.iter().map(|s| s.count).sum::<usize>(), listings.len());

        let prices = price_buckets(&listings);
        assert_eq!(prices.len(), PriceBucket::ALL.len());
        assert_eq!(prices.iter().map(|p| p.count).sum::<usize>(), listings.len());

        for l in &listings {
            let size_hits = SizeBucket::ALL
                .iter()
                .filter(|&&b| SizeBucket::classify(l.area) == b)
                .count();
            assert_eq!(size_hits, 1);
        }
    }

    #[test]
    fn size_bucket_means_and_empty_bins() {
        let sizes = size_buckets(&sample());
        let up_to_50 = &sizes[0];
        assert_eq!(up_to_50.bucket, SizeBucket::UpTo50);
        assert_eq!(up_to_50.count, 2);
        assert_eq!(up_to_50.mean_price, Some(950.0));

        let empty = size_buckets(&[]);
        assert!(empty.iter().all(|s| s.count == 0 && s.mean_price.is_none()));
    }

    #[test]
    fn price_bucket_counts() {
        let counts: Vec<usize> = price_buckets(&sample()).iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 1, 0, 1]);
    }

    #[test]
    fn suite_comparison_needs_both_groups() {
        let all_suites = vec![
            listing("A", 1000.0, 50.0, 1, 1, 1),
            listing("B", 3000.0, 100.0, 2, 1, 1),
        ];
        assert!(suite_comparison(&all_suites).is_none());

        let cmp = suite_comparison(&sample()).unwrap();
        assert_eq!(cmp.with_suite, (3200.0 + 2100.0 + 5500.0) / 3.0);
        assert_eq!(cmp.without_suite, (900.0 + 1500.0 + 1000.0) / 3.0);
    }
}
