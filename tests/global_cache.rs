mod common;

use std::sync::Arc;

use bnb_insights::data::cache::{clear_cache, load_cached};
use bnb_insights::data::loader::RowPolicy;

use common::{write_dataset, write_gz, CALENDAR, LISTINGS};

// Single test: the cache is process-wide.
#[test]
fn process_wide_cache_tracks_file_changes() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_dataset(dir.path(), LISTINGS, CALENDAR);

    let first = load_cached(&sources, RowPolicy::Lenient).unwrap();
    let again = load_cached(&sources, RowPolicy::Lenient).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let more = format!("{LISTINGS}16,Annex,Fenway,42.34,-71.10,$120.00,30\n");
    write_gz(&sources.listings, &more);
    let reloaded = load_cached(&sources, RowPolicy::Lenient).unwrap();
    assert!(!Arc::ptr_eq(&first, &reloaded));
    assert_eq!(reloaded.listings.len(), 6);
    assert_eq!(first.listings.len(), 5);

    clear_cache();
    let fresh = load_cached(&sources, RowPolicy::Lenient).unwrap();
    assert!(!Arc::ptr_eq(&reloaded, &fresh));
    assert_eq!(*reloaded, *fresh);
}
