use super::model::{FilteredView, Listing};

/// Descriptive statistics of one numeric column.
///
/// Follows the usual dataframe `describe` conventions: sample standard
/// deviation (n − 1) and linearly interpolated percentiles. With no values
/// every statistic is `NaN`; with one value `std` is `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Summary table for the filtered listings.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl SummaryReport {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Numeric listing columns reported, with their accessors.
const NUMERIC_COLUMNS: [(&str, fn(&Listing) -> f64); 4] = [
    ("price", |l: &Listing| l.price),
    ("availability_365", |l: &Listing| f64::from(l.availability_365)),
    ("latitude", |l: &Listing| l.latitude),
    ("longitude", |l: &Listing| l.longitude),
];

pub fn summarize(view: &FilteredView<'_>) -> SummaryReport {
    let columns = NUMERIC_COLUMNS
        .iter()
        .map(|&(name, get)| {
            let values: Vec<f64> = view.iter().map(get).collect();
            describe(name, values)
        })
        .collect();

    SummaryReport {
        row_count: view.len(),
        columns,
    }
}

/// Statistics for a single column of values.
pub fn describe(name: &'static str, mut values: Vec<f64>) -> ColumnSummary {
    let count = values.len();
    if count == 0 {
        return ColumnSummary {
            name,
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            p50: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        };
    }

    values.sort_by(f64::total_cmp);
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if count > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    } else {
        f64::NAN
    };

    ColumnSummary {
        name,
        count,
        mean,
        std,
        min: values[0],
        p25: quantile_sorted(&values, 0.25),
        p50: quantile_sorted(&values, 0.50),
        p75: quantile_sorted(&values, 0.75),
        max: values[count - 1],
    }
}

/// Linear-interpolation quantile of an ascending, non-empty slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn listing(price: f64, availability_365: u16) -> Listing {
        Listing {
            id: 1,
            neighbourhood: "A".into(),
            price,
            latitude: 42.0,
            longitude: -71.0,
            availability_365,
        }
    }

    #[test]
    fn empty_view_reports_nan() {
        let rows: Vec<Listing> = Vec::new();
        let report = summarize(&FilteredView::new(&rows, Vec::new()));
        assert_eq!(report.row_count, 0);
        assert_eq!(report.columns.len(), 4);
        for col in &report.columns {
            assert_eq!(col.count, 0);
            assert!(col.mean.is_nan() && col.std.is_nan() && col.p50.is_nan());
        }
    }

    #[test]
    fn describe_matches_dataframe_conventions() {
        let s = describe("x", vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.count, 4);
        assert_relative_eq!(s.mean, 2.5);
        assert_relative_eq!(s.std, 1.290_994_448_735_805_6, epsilon = 1e-12);
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.p25, 1.75);
        assert_relative_eq!(s.p50, 2.5);
        assert_relative_eq!(s.p75, 3.25);
        assert_relative_eq!(s.max, 4.0);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let s = describe("x", vec![7.0]);
        assert_eq!(s.count, 1);
        assert!(s.std.is_nan());
        assert_relative_eq!(s.p25, 7.0);
        assert_relative_eq!(s.max, 7.0);
    }

    #[test]
    fn report_covers_selected_rows_only() {
        let rows = vec![listing(100.0, 10), listing(999.0, 0), listing(300.0, 30)];
        let report = summarize(&FilteredView::new(&rows, vec![0, 2]));
        assert_eq!(report.row_count, 2);
        let price = report.column("price").unwrap();
        assert_eq!(price.count, 2);
        assert_relative_eq!(price.mean, 200.0);
        let days = report.column("availability_365").unwrap();
        assert_relative_eq!(days.max, 30.0);
        assert!(report.column("id").is_none());
    }
}
