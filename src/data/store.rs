use std::cell::OnceCell;
use std::path::PathBuf;

use anyhow::Result;

use super::loader;
use super::model::{Dataset, Listing};

// ---------------------------------------------------------------------------
// Listing sources
// ---------------------------------------------------------------------------

/// Somewhere a dataset can be loaded from.
pub trait ListingSource {
    fn load(&self) -> Result<Dataset>;

    /// Human-readable description for logs and the status bar.
    fn describe(&self) -> String;
}

/// Loads listings from a file on disk (dispatch by extension).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ListingSource for FileSource {
    fn load(&self) -> Result<Dataset> {
        loader::load_file(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves listings already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    listings: Vec<Listing>,
}

impl MemorySource {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }
}

impl ListingSource for MemorySource {
    fn load(&self) -> Result<Dataset> {
        Ok(Dataset::from_listings(self.listings.clone()))
    }

    fn describe(&self) -> String {
        format!("{} in-memory listings", self.listings.len())
    }
}

// ---------------------------------------------------------------------------
// DataStore – load once, read-only afterwards
// ---------------------------------------------------------------------------

/// Owns a listing source and the dataset loaded from it.  The dataset is
/// read on first access and never reloaded.
pub struct DataStore {
    source: Box<dyn ListingSource>,
    dataset: OnceCell<Dataset>,
}

impl DataStore {
    pub fn new(source: impl ListingSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            dataset: OnceCell::new(),
        }
    }

    /// Return the dataset, loading it on the first call.  A failed load
    /// leaves the store empty, so the next call tries again.
    pub fn dataset(&self) -> Result<&Dataset> {
        if let Some(ds) = self.dataset.get() {
            return Ok(ds);
        }
        log::debug!("Loading listings from {}", self.source.describe());
        let loaded = self.source.load()?;
        Ok(self.dataset.get_or_init(|| loaded))
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::data::model::listing;

    struct CountingSource {
        loads: Rc<Cell<usize>>,
    }

    impl ListingSource for CountingSource {
        fn load(&self) -> Result<Dataset> {
            self.loads.set(self.loads.get() + 1);
            Ok(Dataset::from_listings(vec![listing("Centro", 1000.0, 50.0, 1, 0, 1)]))
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    struct FailingSource;

    impl ListingSource for FailingSource {
        fn load(&self) -> Result<Dataset> {
            anyhow::bail!("source unavailable")
        }

        fn describe(&self) -> String {
            "failing".into()
        }
    }

    #[test]
    fn loads_only_once() {
        let loads = Rc::new(Cell::new(0));
        let store = DataStore::new(CountingSource {
            loads: Rc::clone(&loads),
        });
        assert!(!store.is_loaded());

        assert_eq!(store.dataset().unwrap().len(), 1);
        assert_eq!(store.dataset().unwrap().len(), 1);
        assert_eq!(loads.get(), 1);
        assert!(store.is_loaded());
    }

    #[test]
    fn failed_load_is_reported() {
        let store = DataStore::new(FailingSource);
        let err = store.dataset().unwrap_err();
        assert_eq!(err.to_string(), "source unavailable");
        assert!(!store.is_loaded());
    }

    #[test]
    fn memory_source_builds_option_sets() {
        let store = DataStore::new(MemorySource::new(vec![
            listing("Centro", 1000.0, 50.0, 1, 0, 1),
            listing("Batel", 3000.0, 100.0, 2, 1, 1),
        ]));
        let ds = store.dataset().unwrap();
        assert_eq!(ds.neighborhoods.len(), 2);
        assert_eq!(store.source_description(), "2 in-memory listings");
    }

    #[test]
    fn missing_file_fails_at_load() {
        let store = DataStore::new(FileSource::new("does/not/exist.csv"));
        assert!(store.dataset().is_err());
    }
}
