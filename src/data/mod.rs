/// Data layer: core types, loading, filtering and reductions.
///
/// Architecture:
/// ```text
///  listings.csv.gz  calendar.csv.gz  neighbourhoods.csv  neighbourhoods.geojson
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean → Dataset   (memoized by `cache`)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  price / availability / neighbourhood → FilteredView
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate │  │ summary  │  chart series, describe table
///   └───────────┘  └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod parse;
pub mod summary;
