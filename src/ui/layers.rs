use crate::PainterApp;
use crate::canvas::LayerId;
use crate::template::builtin::OUTLINES;
use eframe::egui;

struct LayerRow {
    id: LayerId,
    label: String,
    visible: bool,
    locked: bool,
    lock_alpha: bool,
    active: bool,
}

enum LayerAction {
    Select(LayerId),
    ToggleVisibility(LayerId),
    ToggleAlphaLock(LayerId),
    Remove(LayerId),
}

/// Layer list, top layer first. The outline layer is driven by the lines toggle instead
/// of appearing in the list.
pub fn layers_panel(app: &mut PainterApp, ui: &mut egui::Ui) {
    let outlines_visible = app
        .session
        .stack()
        .find_by_name(OUTLINES)
        .map(|l| l.is_visible());

    ui.horizontal(|ui| {
        if ui.button("New Layer").clicked() {
            app.session.add_layer();
        }
        if let Some(visible) = outlines_visible {
            let text = if visible { "Hide lines" } else { "Show lines" };
            if ui.button(text).clicked() {
                app.session.toggle_outlines();
            }
        }
    });
    ui.separator();

    let active = app.session.stack().active_id();
    let rows: Vec<LayerRow> = app
        .session
        .stack()
        .descending()
        .into_iter()
        .filter(|l| l.name() != OUTLINES)
        .map(|l| LayerRow {
            id: l.id(),
            label: match &l.meta.icon {
                Some(icon) => format!("{icon} {}", l.name()),
                None => l.name().to_string(),
            },
            visible: l.is_visible(),
            locked: l.is_locked(),
            lock_alpha: l.lock_alpha(),
            active: Some(l.id()) == active,
        })
        .collect();

    let mut action = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for row in &rows {
            ui.horizontal(|ui| {
                let eye = if row.visible { "👁" } else { "–" };
                if ui.selectable_label(row.visible, eye).clicked() {
                    action = Some(LayerAction::ToggleVisibility(row.id));
                }

                if row.locked {
                    ui.add_enabled(false, egui::SelectableLabel::new(false, format!("🔒 {}", row.label)));
                    return;
                }
                if ui.selectable_label(row.active, &row.label).clicked() {
                    action = Some(LayerAction::Select(row.id));
                }
                if ui
                    .selectable_label(row.lock_alpha, "α")
                    .on_hover_text("Only paint where this layer already has color")
                    .clicked()
                {
                    action = Some(LayerAction::ToggleAlphaLock(row.id));
                }
                if ui.small_button("🗑").clicked() {
                    action = Some(LayerAction::Remove(row.id));
                }
            });
        }
    });

    match action {
        Some(LayerAction::Select(id)) => {
            app.session.select_layer(id);
        }
        Some(LayerAction::ToggleVisibility(id)) => {
            app.session.toggle_visibility(id);
        }
        Some(LayerAction::ToggleAlphaLock(id)) => {
            app.session.toggle_alpha_lock(id);
        }
        Some(LayerAction::Remove(id)) => {
            app.session.remove_layer(id);
        }
        None => {}
    }
}
