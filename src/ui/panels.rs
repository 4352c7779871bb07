use bnb_insights::data::aggregate::AggregateScope;
use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Listings");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let before = state.filter.clone();
    let (lo, hi) = state.price_range;

    ui.strong("Select price range");
    ui.add(
        egui::Slider::new(&mut state.filter.price_min, lo..=hi)
            .integer()
            .text("min"),
    );
    ui.add(
        egui::Slider::new(&mut state.filter.price_max, lo..=hi)
            .integer()
            .text("max"),
    );
    ui.add_space(6.0);

    ui.strong("Select availability (days)");
    ui.add(egui::Slider::new(&mut state.filter.availability_min, 0..=365).text("min"));
    ui.add(egui::Slider::new(&mut state.filter.availability_max, 0..=365).text("max"));
    ui.add_space(6.0);

    ui.strong("Select Neighborhood");
    egui::ComboBox::from_id_salt("neighbourhood")
        .selected_text(state.filter.neighbourhood.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &state.neighbourhoods {
                ui.selectable_value(&mut state.filter.neighbourhood, name.clone(), name.as_str());
            }
        });

    ui.add_space(6.0);

    let mut filtered_scope = state.neighbourhood_scope == AggregateScope::Filtered;
    let scope_changed = ui
        .checkbox(&mut filtered_scope, "Average price over filtered listings only")
        .changed();
    if scope_changed {
        state.neighbourhood_scope = if filtered_scope {
            AggregateScope::Filtered
        } else {
            AggregateScope::Full
        };
    }

    ui.separator();
    ui.label(format!("{} listings match", state.visible_count()));

    if scope_changed || state.filter != before {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings, {} calendar entries, {} neighbourhoods",
                ds.len(),
                ds.calendar.len(),
                ds.neighbourhoods.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open listings data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Opening data folder {}", dir.display());
        state.open_dir(dir);
    }
}
