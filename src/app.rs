use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct InsightsApp {
    pub state: AppState,
}

impl InsightsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for InsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a data folder to explore listings  (File → Open data folder…)");
                });
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("Boston Airbnb Market Insights");
    ui.label(
        "Explore trends in pricing, availability, and location for Airbnb listings in Boston.",
    );
    ui.add_space(8.0);

    ui.strong("Price Distribution");
    plot::price_histogram(ui, state);
    ui.add_space(8.0);

    ui.strong("Average Price by Neighborhood");
    plot::neighbourhood_prices(ui, state);
    ui.add_space(8.0);

    ui.strong("Seasonal Availability Trend");
    plot::availability_trend(ui, state);
    ui.add_space(8.0);

    ui.strong("Map of Airbnb Listings in Boston");
    plot::listings_map(ui, state);
    ui.add_space(8.0);

    ui.strong("Additional Insights");
    ui.label(format!(
        "Total listings in selected range: {}",
        state.visible_count()
    ));
    if let Some(report) = &state.insights.summary {
        table::summary_table(ui, report);
    }
}
