use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rent_panda::data::filter::SuiteFilter;
use rent_panda::data::view::{ViewModel, PRICE_RANGE_WARNING};
use rent_panda::format::format_count;

use crate::state::{AppState, PriceInput, Selector};

const PRICE_STEP: f64 = 100.0;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the panel.
    let neighborhoods = dataset.neighborhoods.clone();
    let room_counts = dataset.room_counts.clone();
    let parking_counts = dataset.parking_counts.clone();
    let max_observed = dataset.max_price;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Neighborhoods ----
            let picked = state.criteria.neighborhoods.clone();
            if let Some(name) = multi_select(
                ui,
                "Neighborhoods",
                Selector::Neighborhoods,
                &neighborhoods,
                &picked,
                state,
            ) {
                state.toggle_neighborhood(&name);
            }
            ui.separator();

            // ---- Price range ----
            price_inputs(ui, state, max_observed);
            ui.separator();

            // ---- Rooms ----
            let picked = state.criteria.rooms.clone();
            if let Some(rooms) =
                multi_select(ui, "Rooms", Selector::Rooms, &room_counts, &picked, state)
            {
                state.toggle_rooms(rooms);
            }

            // ---- Suite ----
            ui.strong("Has a suite?");
            ui.horizontal(|ui: &mut Ui| {
                let mut suite = state.criteria.suite;
                for option in SuiteFilter::ALL {
                    ui.radio_value(&mut suite, option, option.to_string());
                }
                state.set_suite(suite);
            });
            ui.separator();

            // ---- Parking ----
            let picked = state.criteria.parking.clone();
            if let Some(parking) = multi_select(
                ui,
                "Parking spots",
                Selector::Parking,
                &parking_counts,
                &picked,
                state,
            ) {
                state.toggle_parking(parking);
            }
        });
}

/// Collapsible checkbox list with All / None buttons.  Returns the value
/// whose checkbox was clicked, if any.
fn multi_select<T: Clone + Ord + Display>(
    ui: &mut Ui,
    title: &str,
    selector: Selector,
    options: &BTreeSet<T>,
    selected: &BTreeSet<T>,
    state: &mut AppState,
) -> Option<T> {
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());
    let mut clicked = None;

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(selector != Selector::Neighborhoods)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(selector);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(selector);
                }
            });

            for val in options {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    clicked = Some(val.clone());
                }
            }
        });

    clicked
}

fn price_inputs(ui: &mut Ui, state: &mut AppState, max_observed: f64) {
    ui.strong("Price range (R$)");

    let mut min = state.price_input.min;
    let mut max = state.price_input.max;
    let mut changed = false;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Min");
        changed |= ui
            .add(
                egui::DragValue::new(&mut min)
                    .speed(PRICE_STEP)
                    .range(0.0..=max_observed),
            )
            .changed();
        ui.label("Max");
        changed |= ui
            .add(
                egui::DragValue::new(&mut max)
                    .speed(PRICE_STEP)
                    .range(0.0..=max_observed),
            )
            .changed();
    });

    if changed {
        state.price_input = PriceInput { min, max };
        state.refilter();
    }

    if state.price_clamped {
        ui.label(RichText::new(PRICE_RANGE_WARNING).color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = !matches!(state.view, ViewModel::Empty);
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.dataset() {
            ui.label(format!(
                "{} listings loaded, {} visible",
                format_count(ds.len()),
                format_count(state.filtered.len())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings")
        .add_filter("Supported files", &["csv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered listings")
        .set_file_name(state.export_file_name())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
