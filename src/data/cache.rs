use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use once_cell::sync::Lazy;

use super::error::DataError;
use super::loader::{load_dataset, DataSources, RowPolicy};
use super::model::Dataset;

const SOURCE_NAMES: [&str; 4] = ["listings", "calendar", "neighbourhoods", "boundaries"];

/// Identity of the inputs a cached dataset was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    files: Vec<FileStamp>,
    policy: RowPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceFingerprint {
    /// Stat every input. A missing file is reported as a load error.
    pub fn of(sources: &DataSources, policy: RowPolicy) -> Result<Self, DataError> {
        let files = sources
            .paths()
            .into_iter()
            .zip(SOURCE_NAMES)
            .map(|(path, source_name)| stamp(path, source_name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { files, policy })
    }
}

fn stamp(path: &Path, source_name: &'static str) -> Result<FileStamp, DataError> {
    let meta = std::fs::metadata(path).map_err(|source| DataError::Load {
        source_name,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FileStamp {
        path: path.to_path_buf(),
        len: meta.len(),
        modified: meta.modified().ok(),
    })
}

// ---------------------------------------------------------------------------
// DatasetCache – single-entry memo keyed by fingerprint
// ---------------------------------------------------------------------------

/// Holds at most one loaded dataset.
///
/// The lock is held for the whole load, so concurrent callers either wait
/// for the finished `Arc` or see the previous one; a failed load leaves the
/// previous entry in place.
#[derive(Default)]
pub struct DatasetCache {
    entry: Mutex<Option<(SourceFingerprint, Arc<Dataset>)>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset if the inputs are unchanged, otherwise load
    /// and cache a fresh one.
    pub fn get_or_load(
        &self,
        sources: &DataSources,
        policy: RowPolicy,
    ) -> Result<Arc<Dataset>, DataError> {
        let fingerprint = SourceFingerprint::of(sources, policy)?;
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((cached, dataset)) = entry.as_ref() {
            if *cached == fingerprint {
                log::debug!("Dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
            log::info!("Input files changed, reloading dataset");
        }

        let dataset = Arc::new(load_dataset(sources, policy)?);
        *entry = Some((fingerprint, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Forget the cached dataset.
    pub fn clear(&self) {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

static GLOBAL: Lazy<DatasetCache> = Lazy::new(DatasetCache::new);

/// Process-wide memoized [`load_dataset`].
pub fn load_cached(sources: &DataSources, policy: RowPolicy) -> Result<Arc<Dataset>, DataError> {
    GLOBAL.get_or_load(sources, policy)
}

/// Drop the process-wide cached dataset.
pub fn clear_cache() {
    GLOBAL.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sources(dir: &Path, listing_price: &str) -> DataSources {
        let sources = DataSources {
            listings: dir.join("listings.csv"),
            calendar: dir.join("calendar.csv"),
            neighbourhoods: dir.join("neighbourhoods.csv"),
            boundaries: dir.join("neighbourhoods.geojson"),
        };
        fs::write(
            &sources.listings,
            format!(
                "id,neighbourhood,price,availability_365,latitude,longitude\n\
                 1,Fenway,\"{listing_price}\",12,42.34,-71.10\n"
            ),
        )
        .unwrap();
        fs::write(
            &sources.calendar,
            "listing_id,date,available,price\n1,2024-05-01,t,$90.00\n",
        )
        .unwrap();
        fs::write(&sources.neighbourhoods, "neighbourhood_group,neighbourhood\n,Fenway\n").unwrap();
        fs::write(
            &sources.boundaries,
            r#"{"type":"FeatureCollection","features":[]}"#,
        )
        .unwrap();
        sources
    }

    #[test]
    fn unchanged_inputs_hit_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "$90.00");
        let cache = DatasetCache::new();

        let first = cache.get_or_load(&sources, RowPolicy::Strict).unwrap();
        let second = cache.get_or_load(&sources, RowPolicy::Strict).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn changed_inputs_reload() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "$90.00");
        let cache = DatasetCache::new();
        let first = cache.get_or_load(&sources, RowPolicy::Strict).unwrap();

        write_sources(dir.path(), "$1,090.00");
        let second = cache.get_or_load(&sources, RowPolicy::Strict).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.listings[0].price, 1090.0);
    }

    #[test]
    fn policy_is_part_of_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "$90.00");
        let cache = DatasetCache::new();
        let strict = cache.get_or_load(&sources, RowPolicy::Strict).unwrap();
        let lenient = cache.get_or_load(&sources, RowPolicy::Lenient).unwrap();
        assert!(!Arc::ptr_eq(&strict, &lenient));
        assert_eq!(*strict, *lenient);
    }

    #[test]
    fn failed_load_keeps_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "$90.00");
        let cache = DatasetCache::new();
        cache.get_or_load(&sources, RowPolicy::Strict).unwrap();

        write_sources(dir.path(), "not a price");
        assert!(cache.get_or_load(&sources, RowPolicy::Strict).is_err());
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_fails_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "$90.00");
        fs::remove_file(&sources.calendar).unwrap();
        let err = SourceFingerprint::of(&sources, RowPolicy::Lenient).unwrap_err();
        assert_eq!(err.source_name(), "calendar");
    }
}
