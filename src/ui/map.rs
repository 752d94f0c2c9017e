use eframe::egui::{self, Align2, Color32, FontId, Rect, ScrollArea, Sense, Stroke, Ui, Vec2, pos2};
use egui_extras::{Column, TableBuilder};

use crate::color::{ColorScale, sample};
use crate::state::AppState;

const TILE_SIZE: Vec2 = Vec2::new(56.0, 34.0);
const COLORBAR_STEPS: usize = 64;

// ---------------------------------------------------------------------------
// Choropleth tile map
// ---------------------------------------------------------------------------

/// One tile per entity, filled with the `YlOrRd` colour of its value.
pub fn choropleth(ui: &mut Ui, state: &AppState) {
    ui.strong(state.view.title("Choropleth"));

    let Some(scale) = state.color_scale() else {
        ui.label("No entities for this selection.");
        return;
    };

    color_bar(ui, &scale);
    ui.add_space(4.0);

    ScrollArea::vertical()
        .id_salt("choropleth_tiles")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.spacing_mut().item_spacing = Vec2::splat(2.0);
                for (entity, &value) in &state.view.entities {
                    let (rect, response) = ui.allocate_exact_size(TILE_SIZE, Sense::hover());
                    let fill = scale.color_for(value);
                    let painter = ui.painter();
                    painter.rect_filled(rect, 2.0, fill);
                    if response.hovered() {
                        painter.rect_stroke(
                            rect,
                            2.0,
                            Stroke::new(1.5, Color32::BLACK),
                            egui::StrokeKind::Inside,
                        );
                    }
                    painter.text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        abbreviate(entity),
                        FontId::proportional(10.0),
                        label_color(scale.normalize(value)),
                    );
                    response.on_hover_text(format!("{entity}\n{value:.4}"));
                }
            });
        });
}

/// Horizontal gradient with the scale's bounds underneath.
fn color_bar(ui: &mut Ui, scale: &ColorScale) {
    let width = ui.available_width().min(360.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, 12.0), Sense::hover());
    let step = rect.width() / COLORBAR_STEPS as f32;
    let painter = ui.painter();
    for i in 0..COLORBAR_STEPS {
        let x0 = rect.left() + i as f32 * step;
        let cell = Rect::from_min_max(pos2(x0, rect.top()), pos2(x0 + step + 0.5, rect.bottom()));
        painter.rect_filled(cell, 0.0, sample(i as f32 / (COLORBAR_STEPS - 1) as f32));
    }
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{:.3}", scale.min));
        ui.add_space((width - 120.0).max(0.0));
        ui.label(format!("{:.3}", scale.max));
    });
}

/// Dark text on the light end of the scale, white on the dark end.
fn label_color(t: f32) -> Color32 {
    if t < 0.6 { Color32::BLACK } else { Color32::WHITE }
}

fn abbreviate(name: &str) -> String {
    const MAX_CHARS: usize = 8;
    if name.chars().count() <= MAX_CHARS {
        name.to_string()
    } else {
        let head: String = name.chars().take(MAX_CHARS - 1).collect();
        format!("{head}…")
    }
}

// ---------------------------------------------------------------------------
// Entity table
// ---------------------------------------------------------------------------

/// Entities of the current view, highest value first.
pub fn entity_table(ui: &mut Ui, state: &AppState) {
    let mut rows: Vec<(&String, f64)> = state
        .view
        .entities
        .iter()
        .map(|(name, value)| (name, *value))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let scale = state.color_scale();

    TableBuilder::new(ui)
        .id_salt("entity_table")
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(state.columns.country.as_str());
            });
            header.col(|ui| {
                ui.strong(state.view.metric.as_str());
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let (name, value) = rows[row.index()];
                row.col(|ui| {
                    ui.label(name.as_str());
                });
                row.col(|ui| {
                    let mut text = egui::RichText::new(format!("{value:.4}")).monospace();
                    if let Some(scale) = &scale {
                        text = text.background_color(scale.color_for(value));
                        text = text.color(label_color(scale.normalize(value)));
                    }
                    ui.label(text);
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_abbreviated() {
        assert_eq!(abbreviate("Chad"), "Chad");
        assert_eq!(abbreviate("United Kingdom"), "United …");
        assert_eq!(abbreviate("Côte d'Ivoire").chars().count(), 8);
    }
}
