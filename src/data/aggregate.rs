use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use super::model::{AggregateSeries, CalendarEntry, Dataset, FilteredView, Listing};

/// Which listings the per-neighbourhood average is computed over.
///
/// The dashboard charts average price over the whole table, so the
/// neighbourhood filter does not affect that chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggregateScope {
    #[default]
    Full,
    Filtered,
}

/// Mean price per neighbourhood, highest first.
///
/// Groups are formed in order of first appearance and the sort is stable,
/// so equal means keep that order.
pub fn mean_price_by_neighbourhood<'a>(
    listings: impl IntoIterator<Item = &'a Listing>,
) -> AggregateSeries<String> {
    let mut slot: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, f64, usize)> = Vec::new();

    for l in listings {
        let i = *slot.entry(l.neighbourhood.as_str()).or_insert_with(|| {
            groups.push((l.neighbourhood.as_str(), 0.0, 0));
            groups.len() - 1
        });
        groups[i].1 += l.price;
        groups[i].2 += 1;
    }

    let mut points: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(name, sum, n)| (name.to_string(), sum / n as f64))
        .collect();
    points.sort_by(|a, b| b.1.total_cmp(&a.1));

    AggregateSeries { points }
}

/// Per-neighbourhood average price over the selected scope.
pub fn neighbourhood_price_series(
    dataset: &Dataset,
    view: &FilteredView<'_>,
    scope: AggregateScope,
) -> AggregateSeries<String> {
    match scope {
        AggregateScope::Full => mean_price_by_neighbourhood(&dataset.listings),
        AggregateScope::Filtered => mean_price_by_neighbourhood(view.iter()),
    }
}

/// Fraction of calendar days available, per calendar month (1–12), in month
/// order. Years are merged; months with no entries are omitted.
pub fn mean_availability_by_month(calendar: &[CalendarEntry]) -> AggregateSeries<u32> {
    let mut months: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for entry in calendar {
        let (available, total) = months.entry(entry.date.month()).or_default();
        *available += usize::from(entry.available);
        *total += 1;
    }

    AggregateSeries {
        points: months
            .into_iter()
            .map(|(month, (available, total))| (month, available as f64 / total as f64))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One histogram bar: `[start, end)`, except the last bin which is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram over `[min, max]` of `values`.
///
/// When every value is equal the range is widened to `value ± 0.5`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn listing(hood: &str, price: f64) -> Listing {
        Listing {
            id: 0,
            neighbourhood: hood.to_string(),
            price,
            latitude: 0.0,
            longitude: 0.0,
            availability_365: 0,
        }
    }

    fn day(y: i32, m: u32, d: u32, available: bool) -> CalendarEntry {
        CalendarEntry {
            listing_id: 1,
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            available,
            price: None,
        }
    }

    #[test]
    fn neighbourhood_means_sorted_descending() {
        let rows = vec![listing("A", 100.0), listing("A", 200.0), listing("B", 300.0)];
        let series = mean_price_by_neighbourhood(&rows);
        assert_eq!(
            series.points,
            vec![("B".to_string(), 300.0), ("A".to_string(), 150.0)]
        );
    }

    #[test]
    fn month_means_in_calendar_order() {
        let cal = vec![
            day(2024, 2, 1, true),
            day(2024, 1, 5, true),
            day(2024, 1, 6, false),
        ];
        let series = mean_availability_by_month(&cal);
        assert_eq!(series.points, vec![(1, 0.5), (2, 1.0)]);
    }

    #[test]
    fn months_from_different_years_merge() {
        let cal = vec![
            day(2023, 12, 30, false),
            day(2024, 12, 1, true),
            day(2024, 12, 2, true),
            day(2025, 3, 1, false),
        ];
        let series = mean_availability_by_month(&cal);
        assert_eq!(series.keys().copied().collect::<Vec<_>>(), [3, 12]);
        assert_relative_eq!(series.get(&12).unwrap(), 2.0 / 3.0);
        assert_eq!(series.get(&3), Some(0.0));
    }

    #[test]
    fn empty_inputs_give_empty_series() {
        assert!(mean_price_by_neighbourhood(&Vec::<Listing>::new()).is_empty());
        assert!(mean_availability_by_month(&[]).is_empty());
        assert!(histogram(&[], 20).is_empty());
    }

    #[test]
    fn scope_selects_table() {
        let dataset = Dataset {
            listings: vec![listing("A", 100.0), listing("B", 300.0)],
            calendar: Vec::new(),
            neighbourhoods: Vec::new(),
            boundaries: crate::data::model::NeighbourhoodBoundaries {
                geojson: serde_json::Value::Null,
            },
        };
        let view = FilteredView::new(&dataset.listings, vec![0]);

        let full = neighbourhood_price_series(&dataset, &view, AggregateScope::Full);
        assert_eq!(full.len(), 2);
        let filtered = neighbourhood_price_series(&dataset, &view, AggregateScope::Filtered);
        assert_eq!(filtered.points, vec![("A".to_string(), 100.0)]);
    }

    #[test]
    fn histogram_bins_cover_range() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[4].count, 1);
        assert_relative_eq!(bins[0].start, 0.0);
        assert_relative_eq!(bins[4].end, 10.0);
        assert_relative_eq!(bins[2].width(), 2.0);
    }

    #[test]
    fn histogram_of_constant_values() {
        let bins = histogram(&[80.0, 80.0, 80.0], 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_relative_eq!(bins[0].start, 79.5);
        assert_relative_eq!(bins[3].end, 80.5);
    }
}
