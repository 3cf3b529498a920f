use crate::PainterApp;
use crate::session::Tool;
use eframe::egui;

pub const STAMPS: [&str; 20] = [
    "⭐", "❤️", "🎈", "🌸", "🦋", "🐶", "🐱", "🦄", "🦕", "🐸", "🥕", "🍎", "🍕", "🍦", "🍩", "🚗",
    "✈️", "🚀", "⚽", "🎨",
];

/// Glyph grid; picking one switches to the stamp tool.
pub fn stamps_panel(app: &mut PainterApp, ui: &mut egui::Ui) {
    let current = match app.session.tool() {
        Tool::Stamp(glyph) => Some(glyph.clone()),
        _ => None,
    };
    egui::Grid::new("stamps").num_columns(4).spacing([6.0, 6.0]).show(ui, |ui| {
        for (i, stamp) in STAMPS.iter().enumerate() {
            let selected = current.as_deref() == Some(*stamp);
            if ui
                .selectable_label(selected, egui::RichText::new(*stamp).size(28.0))
                .clicked()
            {
                app.session.set_tool(Tool::Stamp(stamp.to_string()));
            }
            if i % 4 == 3 {
                ui.end_row();
            }
        }
    });
    ui.separator();
    ui.label("Tap the picture to stick a stamp. Drag a stamp off the picture to remove it.");
}
