use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use bnb_insights::config::AppConfig;
use bnb_insights::data::aggregate::{
    histogram, mean_availability_by_month, neighbourhood_price_series, AggregateScope,
    HistogramBin,
};
use bnb_insights::data::cache;
use bnb_insights::data::filter::{neighbourhood_options, price_bounds, ListingFilter};
use bnb_insights::data::model::{AggregateSeries, Dataset, Ring};
use bnb_insights::data::summary::{summarize, SummaryReport};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Derived outputs – recomputed on every filter change
// ---------------------------------------------------------------------------

/// Everything the charts and tables draw, owned so the UI can hold it
/// across frames.
#[derive(Debug, Clone, Default)]
pub struct Insights {
    pub histogram: Vec<HistogramBin>,
    pub neighbourhood_prices: AggregateSeries<String>,
    pub monthly_availability: AggregateSeries<u32>,
    /// `(latitude, longitude, price)` of the filtered listings.
    pub map_points: Vec<(f64, f64, f64)>,
    pub summary: Option<SummaryReport>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset (None until the first successful load).
    pub dataset: Option<Arc<Dataset>>,

    /// Current slider / selectbox values.
    pub filter: ListingFilter,

    /// Selectbox options, in order of first appearance.
    pub neighbourhoods: Vec<String>,

    /// Whole-number price range for the sliders.
    pub price_range: (f64, f64),

    /// Which listings the neighbourhood price chart covers.
    pub neighbourhood_scope: AggregateScope,

    pub insights: Insights,

    /// Boundary outlines per neighbourhood, read once per dataset.
    pub outlines: BTreeMap<String, Vec<Ring>>,

    /// Neighbourhood → colour for the map.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dataset: None,
            filter: ListingFilter {
                price_min: 0.0,
                price_max: 0.0,
                availability_min: 0,
                availability_max: 365,
                neighbourhood: String::new(),
            },
            neighbourhoods: Vec::new(),
            price_range: (0.0, 0.0),
            neighbourhood_scope: AggregateScope::Full,
            insights: Insights::default(),
            outlines: BTreeMap::new(),
            color_map: None,
            status_message: None,
        }
    }

    /// Load (or fetch from the cache) the configured dataset.
    pub fn load(&mut self) {
        let dir = self.config.data_dir.clone();
        self.load_from(dir);
    }

    /// Drop the cached dataset and read the files again.
    pub fn reload(&mut self) {
        cache::clear_cache();
        self.load();
    }

    /// Switch to another data folder and load it.
    pub fn open_dir(&mut self, dir: PathBuf) {
        self.load_from(dir);
    }

    /// `data_dir` only moves to `dir` once its dataset has loaded.
    fn load_from(&mut self, dir: PathBuf) {
        let sources = self.config.sources_in(&dir);
        match cache::load_cached(&sources, self.config.row_policy) {
            Ok(dataset) => {
                self.config.data_dir = dir;
                self.set_dataset(dataset);
            }
            Err(e) => {
                let msg = anyhow::Error::from(e)
                    .context(format!("loading data from {}", dir.display()));
                log::error!("{msg:#}");
                self.status_message = Some(format!("Error: {msg:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filter = ListingFilter::initial(&dataset, &self.config.filter_defaults());
        self.neighbourhoods = neighbourhood_options(&dataset.listings);
        self.price_range = price_bounds(&dataset.listings).unwrap_or((0.0, 0.0));
        self.color_map = Some(ColorMap::new(&self.neighbourhoods));
        self.outlines = dataset.boundaries.outlines();

        // The calendar trend does not depend on the filter.
        self.insights.monthly_availability = mean_availability_by_month(&dataset.calendar);

        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute everything that depends on the filter.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = self.filter.apply(&ds.listings);

        self.insights.histogram = histogram(&view.prices(), self.config.charts.histogram_bins);
        self.insights.neighbourhood_prices =
            neighbourhood_price_series(ds, &view, self.neighbourhood_scope);
        self.insights.map_points = view.map_points();
        self.insights.summary = Some(summarize(&view));
    }

    /// Number of listings passing the filter.
    pub fn visible_count(&self) -> usize {
        self.insights.summary.as_ref().map_or(0, |s| s.row_count)
    }
}
