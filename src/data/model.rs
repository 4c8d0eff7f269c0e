use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Column names as they appear in the source file
// ---------------------------------------------------------------------------

pub const COL_NEIGHBORHOOD: &str = "Bairro";
pub const COL_PRICE: &str = "Valor";
pub const COL_MONTHLY_COST: &str = "Valor_por_mes";
pub const COL_AREA: &str = "Area";
pub const COL_ROOMS: &str = "Quartos";
pub const COL_SUITES: &str = "Suites";
pub const COL_PARKING: &str = "Vagas";
pub const COL_CONDO_FEE: &str = "Condominio";

/// Required columns, in export order.
pub const COLUMNS: [&str; 8] = [
    COL_NEIGHBORHOOD,
    COL_PRICE,
    COL_MONTHLY_COST,
    COL_AREA,
    COL_ROOMS,
    COL_SUITES,
    COL_PARKING,
    COL_CONDO_FEE,
];

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single apartment-rental listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing {
    #[serde(rename = "Bairro")]
    pub neighborhood: String,
    /// Monthly rent.
    #[serde(rename = "Valor", deserialize_with = "nan_if_null")]
    pub price: f64,
    /// Total monthly cost (rent plus fees).
    #[serde(rename = "Valor_por_mes", deserialize_with = "nan_if_null")]
    pub monthly_cost: f64,
    /// Floor area in m².
    #[serde(rename = "Area", deserialize_with = "nan_if_null")]
    pub area: f64,
    #[serde(rename = "Quartos")]
    pub rooms: i64,
    /// Suite flag: 1 when the apartment has a suite, 0 otherwise.
    #[serde(rename = "Suites")]
    pub suites: i64,
    #[serde(rename = "Vagas")]
    pub parking: i64,
    #[serde(rename = "Condominio", deserialize_with = "nan_if_null")]
    pub condo_fee: f64,
}

impl Listing {
    pub fn has_suite(&self) -> bool {
        self.suites == 1
    }
}

/// JSON `null` in a float column loads as NaN, matching blank CSV cells.
fn nan_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with the option sets the filter widgets offer.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub listings: Vec<Listing>,
    /// Sorted distinct neighborhoods.
    pub neighborhoods: BTreeSet<String>,
    /// Sorted distinct room counts.
    pub room_counts: BTreeSet<i64>,
    /// Sorted distinct parking-spot counts.
    pub parking_counts: BTreeSet<i64>,
    /// Lowest observed price (0 for an empty table).
    pub min_price: f64,
    /// Highest observed price (0 for an empty table).
    pub max_price: f64,
}

impl Dataset {
    /// Build the option sets from the loaded listings.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut neighborhoods = BTreeSet::new();
        let mut room_counts = BTreeSet::new();
        let mut parking_counts = BTreeSet::new();
        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;

        for l in &listings {
            neighborhoods.insert(l.neighborhood.clone());
            room_counts.insert(l.rooms);
            parking_counts.insert(l.parking);
            min_price = min_price.min(l.price);
            max_price = max_price.max(l.price);
        }

        if listings.is_empty() {
            min_price = 0.0;
            max_price = 0.0;
        }

        Dataset {
            listings,
            neighborhoods,
            room_counts,
            parking_counts,
            min_price,
            max_price,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn listing(
    neighborhood: &str,
    price: f64,
    area: f64,
    rooms: i64,
    suites: i64,
    parking: i64,
) -> Listing {
    Listing {
        neighborhood: neighborhood.to_string(),
        price,
        monthly_cost: price + 300.0,
        area,
        rooms,
        suites,
        parking,
        condo_fee: 300.0,
    }
}
