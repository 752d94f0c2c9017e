use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::view::Transform;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection controls
// ---------------------------------------------------------------------------

/// Render the metric / year / transform controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    // ---- Metric ----
    ui.strong("Metric");
    if state.columns.metrics.is_empty() {
        ui.label("No numeric columns found.");
    } else {
        let current = state.selection.metric.clone();
        let mut chosen = None;
        egui::ComboBox::from_id_salt("metric")
            .selected_text(&current)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for metric in &state.columns.metrics {
                    if ui.selectable_label(current == *metric, metric).clicked() {
                        chosen = Some(metric.clone());
                    }
                }
            });
        if let Some(metric) = chosen {
            state.set_metric(metric);
        }
    }
    ui.add_space(8.0);

    // ---- Year ----
    ui.strong("Year");
    let range = state.columns.years;
    let mut year = state.effective_year();
    if ui
        .add(egui::Slider::new(&mut year, range.min..=range.max).step_by(1.0))
        .changed()
    {
        state.set_year(year);
    }
    ui.add_space(8.0);

    // ---- Transform ----
    ui.strong("Transform");
    let mut transform = state.selection.transform;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for t in Transform::ALL {
            ui.radio_value(&mut transform, t, t.label());
        }
    });
    state.set_transform(transform);

    ui.separator();
    ui.label(format!(
        "{} values, {} entities",
        state.view.distribution.len(),
        state.view.entities.len()
    ));
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
        });

        ui.separator();

        ui.label(format!(
            "{}: {} rows, country = '{}', year = '{}'",
            state
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            state.dataset.len(),
            state.columns.country,
            state.columns.year,
        ));
        if state.columns.total.is_none() {
            ui.label(RichText::new("no total-emissions column").italics());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open emissions data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let result = crate::data::loader::load_file(&path)
            .and_then(|dataset| state.replace_dataset(&path, dataset));
        if let Err(e) = result {
            log::error!("Failed to open {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
