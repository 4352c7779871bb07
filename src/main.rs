mod app;
mod color;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::InsightsApp;
use bnb_insights::config::AppConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load().context("loading configuration")?;
    let mut state = AppState::new(config);
    state.load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Boston Airbnb Market Insights",
        options,
        Box::new(|_cc| Ok(Box::new(InsightsApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
