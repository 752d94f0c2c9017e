use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::state::AppState;

const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Histogram (upper half of the central panel)
// ---------------------------------------------------------------------------

/// Render the distribution of the current view as a 30-bin histogram.
pub fn histogram_plot(ui: &mut Ui, state: &AppState) {
    ui.strong(state.view.title("Histogram"));

    if state.view.is_empty() {
        ui.label("No values for this selection.");
    } else {
        ui.label(format!("{} values in {} bins", state.histogram.total(), state.histogram.bins.len()));
    }

    let bars: Vec<Bar> = state
        .histogram
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.3} – {:.3}", bin.start, bin.end))
        })
        .collect();

    Plot::new("histogram_plot")
        .x_axis_label(state.view.metric.as_str())
        .y_axis_label("count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("count"));
        });
}
