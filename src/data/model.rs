use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Listing – one row of the listings table
// ---------------------------------------------------------------------------

/// A rentable unit after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: u64,
    pub neighbourhood: String,
    /// Nightly price, always finite and non-negative.
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Days available over the trailing year, `0..=365`.
    pub availability_365: u16,
}

// ---------------------------------------------------------------------------
// CalendarEntry – one (listing, date) observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub listing_id: u64,
    pub date: NaiveDate,
    pub available: bool,
    pub price: Option<f64>,
}

// ---------------------------------------------------------------------------
// NeighbourhoodBoundaries – GeoJSON kept verbatim
// ---------------------------------------------------------------------------

/// Boundary polygons as read from the GeoJSON file.
///
/// The document is not transformed; [`outlines`](Self::outlines) only reads
/// the outer rings for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighbourhoodBoundaries {
    pub geojson: JsonValue,
}

/// A closed ring of `[longitude, latitude]` pairs.
pub type Ring = Vec<[f64; 2]>;

impl NeighbourhoodBoundaries {
    /// Outer rings of every Polygon / MultiPolygon feature, keyed by the
    /// feature's `properties.neighbourhood`. Features without a name or with
    /// another geometry type are skipped.
    pub fn outlines(&self) -> BTreeMap<String, Vec<Ring>> {
        let mut out: BTreeMap<String, Vec<Ring>> = BTreeMap::new();
        let Some(features) = self.geojson.get("features").and_then(|f| f.as_array()) else {
            return out;
        };

        for feature in features {
            let Some(name) = feature
                .pointer("/properties/neighbourhood")
                .and_then(|n| n.as_str())
            else {
                continue;
            };
            let Some(geometry) = feature.get("geometry") else {
                continue;
            };
            let coords = geometry.get("coordinates");

            let polygons: Vec<&JsonValue> = match geometry.get("type").and_then(|t| t.as_str()) {
                Some("Polygon") => coords.into_iter().collect(),
                Some("MultiPolygon") => coords
                    .and_then(|c| c.as_array())
                    .map(|polys| polys.iter().collect())
                    .unwrap_or_default(),
                _ => continue,
            };

            let rings = out.entry(name.to_string()).or_default();
            for polygon in polygons {
                if let Some(outer) = polygon.get(0).and_then(ring_from_json) {
                    rings.push(outer);
                }
            }
        }
        out
    }
}

fn ring_from_json(val: &JsonValue) -> Option<Ring> {
    val.as_array()?
        .iter()
        .map(|pt| {
            let pair = pt.as_array()?;
            Some([pair.first()?.as_f64()?, pair.get(1)?.as_f64()?])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dataset – the four immutable base tables
// ---------------------------------------------------------------------------

/// The full loaded dataset. Built once, then shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub listings: Vec<Listing>,
    pub calendar: Vec<CalendarEntry>,
    /// Neighbourhood names from the neighbourhood list, in file order.
    pub neighbourhoods: Vec<String>,
    pub boundaries: NeighbourhoodBoundaries,
}

impl Dataset {
    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether there are no listings.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilteredView – listings passing the active filter
// ---------------------------------------------------------------------------

/// A read-only selection of listings, in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a [Listing],
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// `indices` must be ascending and in bounds for `table`.
    pub(crate) fn new(table: &'a [Listing], indices: Vec<usize>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(indices.last().map_or(true, |&i| i < table.len()));
        Self { table, indices }
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions of the selected rows in the base table.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table[i])
    }

    pub fn prices(&self) -> Vec<f64> {
        self.iter().map(|l| l.price).collect()
    }

    /// `(latitude, longitude, price)` per selected listing, for the map layer.
    pub fn map_points(&self) -> Vec<(f64, f64, f64)> {
        self.iter()
            .map(|l| (l.latitude, l.longitude, l.price))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// AggregateSeries – ordered key → statistic
// ---------------------------------------------------------------------------

/// An ordered mapping from a group key to a mean, ready for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSeries<K> {
    pub points: Vec<(K, f64)>,
}

impl<K: PartialEq> AggregateSeries<K> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.points.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.points.iter().map(|(k, _)| k)
    }
}

impl<K> Default for AggregateSeries<K> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}
