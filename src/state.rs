use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use rent_panda::data::export::{self, write_csv};
use rent_panda::data::filter::{filter_listings, FilterCriteria, SuiteFilter};
use rent_panda::data::loader::CsvFormat;
use rent_panda::data::model::{Dataset, Listing};
use rent_panda::data::store::{DataStore, FileSource, ListingSource};
use rent_panda::data::view::{self, ViewModel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded-once listings store.
    pub store: DataStore,

    /// Active filter selections.  The price range here is the repaired
    /// one the rows were filtered with.
    pub criteria: FilterCriteria,

    /// Price range as typed into the min/max widgets, before repair.
    pub price_input: PriceInput,

    /// Listings passing the current filters (recomputed on change).
    pub filtered: Vec<Listing>,

    /// Charts, KPIs and table rows for the current filters.
    pub view: ViewModel,

    /// Set when the last refilter had to repair an inverted price range.
    pub price_clamped: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state over a store, loading its dataset immediately.
    pub fn new(store: DataStore) -> Result<Self> {
        let criteria = {
            let dataset = store
                .dataset()
                .with_context(|| format!("loading {}", store.source_description()))?;
            FilterCriteria::for_dataset(dataset)
        };
        let price_input = PriceInput {
            min: criteria.min_price,
            max: criteria.max_price,
        };
        let mut state = Self {
            store,
            criteria,
            price_input,
            filtered: Vec::new(),
            view: ViewModel::Empty,
            price_clamped: false,
            status_message: None,
        };
        state.refilter();
        Ok(state)
    }

    /// The loaded dataset.  Always present once `new` succeeded.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.store.dataset().ok()
    }

    /// Replace the store with a new source (File → Open…).  On failure the
    /// current dataset is kept and the error is shown.
    pub fn open_source(&mut self, source: impl ListingSource + 'static) {
        match AppState::new(DataStore::new(source)) {
            Ok(state) => *self = state,
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn open_file(&mut self, path: &Path) {
        self.open_source(FileSource::new(path));
    }

    /// Recompute the filtered rows and the view model after a filter change.
    /// The price range is taken afresh from `price_input` and repaired here,
    /// so the widgets keep what the user typed.
    pub fn refilter(&mut self) {
        self.criteria.min_price = self.price_input.min;
        self.criteria.max_price = self.price_input.max;
        self.price_clamped = self.criteria.clamp_price_range();
        let Some(dataset) = self.store.dataset().ok() else {
            return;
        };
        self.filtered = filter_listings(&dataset.listings, &self.criteria);
        self.view = view::render(&self.filtered, &self.criteria);
        log::debug!(
            "{} of {} listings match the current filters",
            self.filtered.len(),
            dataset.len()
        );
    }

    // -- Set-valued selectors --

    /// Toggle a neighborhood in the selection.
    pub fn toggle_neighborhood(&mut self, name: &str) {
        if !self.criteria.neighborhoods.remove(name) {
            self.criteria.neighborhoods.insert(name.to_string());
        }
        self.refilter();
    }

    pub fn toggle_rooms(&mut self, rooms: i64) {
        toggle(&mut self.criteria.rooms, rooms);
        self.refilter();
    }

    pub fn toggle_parking(&mut self, parking: i64) {
        toggle(&mut self.criteria.parking, parking);
        self.refilter();
    }

    /// Select every observed value of a selector.
    pub fn select_all(&mut self, selector: Selector) {
        let Some(ds) = self.dataset() else {
            return;
        };
        let (neighborhoods, rooms, parking) = (
            ds.neighborhoods.clone(),
            ds.room_counts.clone(),
            ds.parking_counts.clone(),
        );
        match selector {
            Selector::Neighborhoods => self.criteria.neighborhoods = neighborhoods,
            Selector::Rooms => self.criteria.rooms = rooms,
            Selector::Parking => self.criteria.parking = parking,
        }
        self.refilter();
    }

    /// Clear a selector.  An empty selection means "no restriction".
    pub fn select_none(&mut self, selector: Selector) {
        match selector {
            Selector::Neighborhoods => self.criteria.neighborhoods.clear(),
            Selector::Rooms => self.criteria.rooms.clear(),
            Selector::Parking => self.criteria.parking.clear(),
        }
        self.refilter();
    }

    pub fn set_suite(&mut self, suite: SuiteFilter) {
        if self.criteria.suite != suite {
            self.criteria.suite = suite;
            self.refilter();
        }
    }

    /// Write the filtered rows to `path` using the export CSV conventions.
    pub fn export_to(&mut self, path: &Path) {
        let result = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))
            .and_then(|file| write_csv(file, &self.filtered, CsvFormat::EXPORT));

        match result {
            Ok(()) => {
                log::info!("Exported {} listings to {}", self.filtered.len(), path.display());
                self.status_message = Some(format!(
                    "Exported {} listings to {}",
                    self.filtered.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn export_file_name(&self) -> &'static str {
        export::EXPORT_FILE_NAME
    }
}

/// Values bound to the min/max price widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceInput {
    pub min: f64,
    pub max: f64,
}

/// The set-valued filter widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Neighborhoods,
    Rooms,
    Parking,
}

fn toggle(set: &mut BTreeSet<i64>, value: i64) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui;
    use rent_panda::data::store::MemorySource;

    fn listing(neighborhood: &str, price: f64, suites: i64, parking: i64) -> Listing {
        Listing {
            neighborhood: neighborhood.to_string(),
            price,
            monthly_cost: price + 200.0,
            area: price / 20.0,
            rooms: 2,
            suites,
            parking,
            condo_fee: 200.0,
        }
    }

    fn state() -> AppState {
        AppState::new(DataStore::new(MemorySource::new(vec![
            listing("Centro", 1000.0, 0, 1),
            listing("Batel", 3000.0, 1, 2),
            listing("Batel", 2000.0, 0, 1),
        ])))
        .unwrap()
    }

    #[test]
    fn starts_with_everything_visible() {
        let s = state();
        assert_eq!(s.filtered.len(), 3);
        assert!(!s.view.is_empty());
        assert!(!s.price_clamped);
    }

    #[test]
    fn inverted_range_is_clamped_and_flagged() {
        let mut s = state();
        s.price_input = PriceInput {
            min: 2500.0,
            max: 2000.0,
        };
        s.refilter();
        assert!(s.price_clamped);
        assert_eq!(s.criteria.min_price, 1999.0);
        assert_eq!(s.price_input.min, 2500.0);
        assert_eq!(s.filtered.len(), 1);

        // Unrelated filter changes keep the repaired range and the warning.
        s.toggle_parking(2);
        assert!(s.price_clamped);
        assert_eq!(s.criteria.min_price, 1999.0);
    }

    fn run_side_panel(s: &mut AppState, frames: usize) {
        let ctx = egui::Context::default();
        for _ in 0..frames {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::SidePanel::left("filter_panel").show(ctx, |ui| {
                    crate::ui::panels::side_panel(ui, s);
                });
            });
        }
    }

    #[test]
    fn degenerate_clamp_survives_rendering() {
        let mut s = state();
        s.price_input = PriceInput { min: 500.0, max: 0.0 };
        s.refilter();
        assert_eq!(s.criteria.min_price, -1.0);

        run_side_panel(&mut s, 2);

        assert!(s.price_clamped);
        assert_eq!(s.criteria.min_price, -1.0);
        assert_eq!(s.criteria.max_price, 0.0);
        assert_eq!(s.price_input, PriceInput { min: 500.0, max: 0.0 });
    }

    #[test]
    fn clearing_a_selector_removes_the_restriction() {
        let mut s = state();
        s.toggle_parking(2);
        assert_eq!(s.filtered.len(), 2);
        s.select_none(Selector::Parking);
        assert_eq!(s.filtered.len(), 3);
        s.select_all(Selector::Parking);
        assert_eq!(s.filtered.len(), 3);
    }

    #[test]
    fn no_match_yields_empty_view() {
        let mut s = state();
        s.toggle_neighborhood("Centro");
        s.set_suite(SuiteFilter::Yes);
        assert!(s.filtered.is_empty());
        assert!(s.view.is_empty());
    }

    #[test]
    fn failed_open_keeps_current_dataset() {
        let mut s = state();
        s.open_file(Path::new("missing/listings.csv"));
        assert!(s.status_message.as_deref().unwrap_or("").starts_with("Error"));
        assert_eq!(s.dataset().map(|d| d.len()), Some(3));
    }
}
