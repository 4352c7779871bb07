use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use csv::{ByteRecord, StringRecord};
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::{DataError, RowError};
use super::model::{CalendarEntry, Dataset, Listing, NeighbourhoodBoundaries};
use super::parse;

// ---------------------------------------------------------------------------
// Inputs and row policy
// ---------------------------------------------------------------------------

/// Paths of the four input files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSources {
    pub listings: PathBuf,
    pub calendar: PathBuf,
    pub neighbourhoods: PathBuf,
    pub boundaries: PathBuf,
}

impl DataSources {
    /// The default Inside Airbnb file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            listings: dir.join("listings.csv.gz"),
            calendar: dir.join("calendar.csv.gz"),
            neighbourhoods: dir.join("neighbourhoods.csv"),
            boundaries: dir.join("neighbourhoods.geojson"),
        }
    }

    pub fn paths(&self) -> [&Path; 4] {
        [
            &self.listings,
            &self.calendar,
            &self.neighbourhoods,
            &self.boundaries,
        ]
    }
}

/// What to do with a row whose fields fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Abort the whole load on the first bad row.
    Strict,
    /// Drop bad rows and report how many were dropped.
    #[default]
    Lenient,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean all four inputs.
///
/// A pure function of the file contents: unchanged files always produce an
/// equal [`Dataset`].
pub fn load_dataset(sources: &DataSources, policy: RowPolicy) -> Result<Dataset, DataError> {
    let started = Instant::now();

    let listings = load_listings(&sources.listings, policy)?;
    let calendar = load_calendar(&sources.calendar, policy)?;
    let neighbourhoods = load_neighbourhoods(&sources.neighbourhoods, policy)?;
    let boundaries = load_boundaries(&sources.boundaries)?;

    log::info!(
        "Loaded {} listings, {} calendar entries, {} neighbourhoods in {:.2?}",
        listings.len(),
        calendar.len(),
        neighbourhoods.len(),
        started.elapsed()
    );

    Ok(Dataset {
        listings,
        calendar,
        neighbourhoods,
        boundaries,
    })
}

// ---------------------------------------------------------------------------
// Per-table loaders
// ---------------------------------------------------------------------------

pub fn load_listings(path: &Path, policy: RowPolicy) -> Result<Vec<Listing>, DataError> {
    const REQUIRED: &[&str] = &[
        "id",
        "neighbourhood",
        "price",
        "availability_365",
        "latitude",
        "longitude",
    ];

    read_table("listings", path, REQUIRED, policy, |cols, record| {
        let neighbourhood = cols.field(record, "neighbourhood").trim();
        if neighbourhood.is_empty() {
            return Err(RowError::EmptyField {
                column: "neighbourhood",
            });
        }
        Ok(Listing {
            id: parse_id(cols.field(record, "id"), "id")?,
            neighbourhood: neighbourhood.to_string(),
            price: parse::parse_price(cols.field(record, "price"))?,
            latitude: parse::parse_coordinate(cols.field(record, "latitude"), "latitude", 90.0)?,
            longitude: parse::parse_coordinate(
                cols.field(record, "longitude"),
                "longitude",
                180.0,
            )?,
            availability_365: parse::parse_availability_365(
                cols.field(record, "availability_365"),
            )?,
        })
    })
}

pub fn load_calendar(path: &Path, policy: RowPolicy) -> Result<Vec<CalendarEntry>, DataError> {
    // `price` is optional; a missing column reads as all-empty.
    const REQUIRED: &[&str] = &["listing_id", "date", "available"];

    read_table("calendar", path, REQUIRED, policy, |cols, record| {
        Ok(CalendarEntry {
            listing_id: parse_id(cols.field(record, "listing_id"), "listing_id")?,
            date: parse::parse_date(cols.field(record, "date"))?,
            available: parse::parse_available(cols.field(record, "available"))?,
            price: parse::parse_optional_price(cols.field(record, "price"))?,
        })
    })
}

pub fn load_neighbourhoods(path: &Path, policy: RowPolicy) -> Result<Vec<String>, DataError> {
    read_table(
        "neighbourhoods",
        path,
        &["neighbourhood"],
        policy,
        |cols, record| {
            let name = cols.field(record, "neighbourhood").trim();
            if name.is_empty() {
                Err(RowError::EmptyField {
                    column: "neighbourhood",
                })
            } else {
                Ok(name.to_string())
            }
        },
    )
}

/// Read the boundary GeoJSON. Only the top-level shape is checked.
pub fn load_boundaries(path: &Path) -> Result<NeighbourhoodBoundaries, DataError> {
    let mut text = String::new();
    open_source("boundaries", path)?
        .read_to_string(&mut text)
        .map_err(|source| DataError::Load {
            source_name: "boundaries",
            path: path.to_path_buf(),
            source,
        })?;

    let geojson: JsonValue = serde_json::from_str(&text).map_err(|source| DataError::Geo {
        path: path.to_path_buf(),
        source,
    })?;

    let shape_err = |reason: &str| DataError::GeoShape {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    match geojson.get("type").and_then(|t| t.as_str()) {
        Some("FeatureCollection") => {}
        Some(other) => return Err(shape_err(&format!("top-level type is '{other}'"))),
        None => return Err(shape_err("no top-level 'type'")),
    }
    if !geojson.get("features").is_some_and(|f| f.is_array()) {
        return Err(shape_err("'features' is not an array"));
    }

    Ok(NeighbourhoodBoundaries { geojson })
}

// ---------------------------------------------------------------------------
// CSV plumbing
// ---------------------------------------------------------------------------

/// Header name → column position for one CSV file.
struct Columns {
    positions: HashMap<String, usize>,
}

impl Columns {
    /// The cell for `name`, or `""` if the column or cell is absent.
    fn field<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.positions
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
    }
}

/// Open a file, gunzipping it when the name ends in `.gz`.
fn open_source(source_name: &'static str, path: &Path) -> Result<Box<dyn Read>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Load {
        source_name,
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let gzipped = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));
    if gzipped {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Read every data row of a CSV file through `parse_row`, applying `policy`
/// to rows it rejects.
fn read_table<T>(
    source_name: &'static str,
    path: &Path,
    required: &[&'static str],
    policy: RowPolicy,
    mut parse_row: impl FnMut(&Columns, &StringRecord) -> Result<T, RowError>,
) -> Result<Vec<T>, DataError> {
    let csv_err = |source: csv::Error| DataError::Csv {
        source_name,
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader(open_source(source_name, path)?);

    let positions: HashMap<String, usize> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();
    if let Some(&column) = required.iter().find(|c| !positions.contains_key(**c)) {
        return Err(DataError::MissingColumn {
            source_name,
            column,
        });
    }
    let columns = Columns { positions };

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    let mut raw = ByteRecord::new();
    let mut row = 0usize;

    // Cells are decoded per row so a stray non-UTF-8 byte is a row error.
    while reader.read_byte_record(&mut raw).map_err(csv_err)? {
        row += 1;
        let parsed = StringRecord::from_byte_record(std::mem::take(&mut raw))
            .map_err(|e| RowError::Utf8 {
                field: e.utf8_error().field(),
            })
            .and_then(|record| parse_row(&columns, &record));
        match parsed {
            Ok(value) => rows.push(value),
            Err(source) => match policy {
                RowPolicy::Strict => {
                    return Err(DataError::Row {
                        source_name,
                        row,
                        source,
                    })
                }
                RowPolicy::Lenient => {
                    log::debug!("{source_name}: dropping row {row}: {source}");
                    dropped += 1;
                }
            },
        }
    }

    if dropped > 0 {
        log::warn!(
            "{source_name}: dropped {dropped} of {row} rows that failed validation ({})",
            path.display()
        );
    }
    Ok(rows)
}

fn parse_id(raw: &str, column: &'static str) -> Result<u64, RowError> {
    raw.trim().parse().map_err(|_| RowError::OutOfRange {
        column,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn listings_missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "listings.csv", "id,neighbourhood,price\n1,A,$5.00\n");
        let err = load_listings(&path, RowPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn {
                source_name: "listings",
                column: "availability_365"
            }
        ));
    }

    #[test]
    fn extra_columns_are_ignored_and_order_is_free() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "listings.csv",
            "longitude,name,price,id,availability_365,latitude,neighbourhood\n\
             -71.05,Cozy flat,\"$1,200.00\",7,30,42.35,Back Bay\n",
        );
        let listings = load_listings(&path, RowPolicy::Strict).unwrap();
        assert_eq!(
            listings,
            vec![Listing {
                id: 7,
                neighbourhood: "Back Bay".into(),
                price: 1200.0,
                latitude: 42.35,
                longitude: -71.05,
                availability_365: 30,
            }]
        );
    }

    #[test]
    fn calendar_without_price_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "calendar.csv",
            "listing_id,date,available\n1,2024-01-02,t\n1,2024-01-03,f\n",
        );
        let cal = load_calendar(&path, RowPolicy::Strict).unwrap();
        assert_eq!(cal.len(), 2);
        assert!(cal[0].available);
        assert!(!cal[1].available);
        assert!(cal.iter().all(|e| e.price.is_none()));
    }

    #[test]
    fn strict_reports_row_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "calendar.csv",
            "listing_id,date,available,price\n1,2024-01-02,t,$10.00\n1,2024-01-03,maybe,\n",
        );
        match load_calendar(&path, RowPolicy::Strict).unwrap_err() {
            DataError::Row {
                source_name,
                row,
                source: RowError::Encoding(e),
            } => {
                assert_eq!(source_name, "calendar");
                assert_eq!(row, 2);
                assert_eq!(e.raw, "maybe");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_utf8_row_follows_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neighbourhoods.csv");
        let mut bytes = b"neighbourhood_group,neighbourhood\n,Fenway\n,Rox".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"bury\n,Allston\n");
        std::fs::write(&path, bytes).unwrap();

        let names = load_neighbourhoods(&path, RowPolicy::Lenient).unwrap();
        assert_eq!(names, vec!["Fenway".to_string(), "Allston".to_string()]);

        match load_neighbourhoods(&path, RowPolicy::Strict).unwrap_err() {
            DataError::Row {
                source_name,
                row,
                source: RowError::Utf8 { field },
            } => {
                assert_eq!(source_name, "neighbourhoods");
                assert_eq!(row, 2);
                assert_eq!(field, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn boundaries_shape_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "a.geojson", r#"{"type":"Feature"}"#);
        assert!(matches!(
            load_boundaries(&bad).unwrap_err(),
            DataError::GeoShape { .. }
        ));
        let broken = write(dir.path(), "b.geojson", "{not json");
        assert!(matches!(
            load_boundaries(&broken).unwrap_err(),
            DataError::Geo { .. }
        ));
        let ok = write(
            dir.path(),
            "c.geojson",
            r#"{"type":"FeatureCollection","features":[]}"#,
        );
        assert!(load_boundaries(&ok).is_ok());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_neighbourhoods(&dir.path().join("nope.csv"), RowPolicy::Lenient).unwrap_err();
        assert_eq!(err.source_name(), "neighbourhoods");
        assert!(matches!(err, DataError::Load { .. }));
    }
}
