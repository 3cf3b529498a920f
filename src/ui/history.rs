use crate::PainterApp;
use crate::app::render_helper::color_image;
use crate::canvas::history::SnapshotId;
use eframe::egui::{self, TextureOptions};

/// Gallery of saved drawings, newest first. Clicking one brings it back.
pub fn history_panel(app: &mut PainterApp, ui: &mut egui::Ui) {
    let history = app.session.history();
    app.thumbnails.retain(|id, _| history.get(*id).is_some());

    if history.is_empty() {
        ui.label("Nothing saved yet. Drawings are saved when you pick another picture.");
        return;
    }

    let mut chosen: Option<SnapshotId> = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for snapshot in history.iter() {
            let texture = app.thumbnails.entry(snapshot.id()).or_insert_with(|| {
                ui.ctx().load_texture(
                    format!("snapshot_{}", snapshot.id().0),
                    color_image(snapshot.thumbnail()),
                    TextureOptions::LINEAR,
                )
            });
            let size = texture.size_vec2();
            if ui.add(egui::ImageButton::new((texture.id(), size))).clicked() {
                chosen = Some(snapshot.id());
            }
            ui.label(format!(
                "{} · {}",
                snapshot.template_id().unwrap_or("drawing"),
                snapshot.timestamp().format("%H:%M:%S")
            ));
            ui.add_space(6.0);
        }
    });

    if let Some(id) = chosen {
        app.session.restore(id);
    }
}
