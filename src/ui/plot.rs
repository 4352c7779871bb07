use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;
const SKY_BLUE: Color32 = Color32::from_rgb(135, 206, 235);
const CORAL: Color32 = Color32::from_rgb(255, 127, 80);
const GREEN: Color32 = Color32::from_rgb(0, 128, 0);

// ---------------------------------------------------------------------------
// Price distribution (filtered)
// ---------------------------------------------------------------------------

pub fn price_histogram(ui: &mut Ui, state: &AppState) {
    let bars: Vec<Bar> = state
        .insights
        .histogram
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .fill(SKY_BLUE)
                .stroke(Stroke::new(1.0, Color32::BLACK))
        })
        .collect();

    Plot::new("price_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Price")
        .y_axis_label("Frequency")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("listings"));
        });
}

// ---------------------------------------------------------------------------
// Average price by neighbourhood
// ---------------------------------------------------------------------------

pub fn neighbourhood_prices(ui: &mut Ui, state: &AppState) {
    let series = &state.insights.neighbourhood_prices;
    let names: Vec<String> = series.keys().cloned().collect();

    let bars: Vec<Bar> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, (name, mean))| {
            Bar::new(i as f64, *mean)
                .width(0.8)
                .name(name)
                .fill(CORAL)
        })
        .collect();

    Plot::new("neighbourhood_prices")
        .height(CHART_HEIGHT)
        .x_axis_label("Neighborhood")
        .y_axis_label("Average Price")
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            names.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Seasonal availability trend (full calendar)
// ---------------------------------------------------------------------------

pub fn availability_trend(ui: &mut Ui, state: &AppState) {
    let pts: Vec<[f64; 2]> = state
        .insights
        .monthly_availability
        .points
        .iter()
        .map(|&(month, mean)| [f64::from(month), mean])
        .collect();

    Plot::new("availability_trend")
        .height(CHART_HEIGHT)
        .x_axis_label("Month")
        .y_axis_label("Average Availability")
        .include_x(1.0)
        .include_x(12.0)
        .include_y(0.0)
        .include_y(1.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::from(pts.clone())).color(GREEN).width(2.0));
            plot_ui.points(Points::new(PlotPoints::from(pts)).radius(4.0).color(GREEN));
        });
}

// ---------------------------------------------------------------------------
// Scatter map of the filtered listings
// ---------------------------------------------------------------------------

pub fn listings_map(ui: &mut Ui, state: &AppState) {
    let centre = &state.config.map;
    let aspect = centre.latitude.to_radians().cos() as f32;
    let selected = state.filter.neighbourhood.as_str();

    let listing_points: Vec<[f64; 2]> = state
        .insights
        .map_points
        .iter()
        .map(|&(lat, lon, _price)| [lon, lat])
        .collect();

    Plot::new("listings_map")
        .height(CHART_HEIGHT * 1.6)
        .data_aspect(aspect)
        .include_x(centre.longitude)
        .include_y(centre.latitude)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (name, rings) in &state.outlines {
                let color = state
                    .color_map
                    .as_ref()
                    .map_or(Color32::GRAY, |cm| cm.color_for(name));
                let width = if name == selected { 2.5 } else { 1.0 };
                for ring in rings {
                    plot_ui.line(
                        Line::new(PlotPoints::from(ring.clone()))
                            .color(color)
                            .width(width),
                    );
                }
            }

            let highlight = state
                .color_map
                .as_ref()
                .map_or(Color32::RED, |cm| cm.highlight());
            plot_ui.points(
                Points::new(PlotPoints::from(listing_points))
                    .radius(3.0)
                    .color(highlight)
                    .name("listings"),
            );
        });
}
