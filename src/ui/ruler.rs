use crate::PainterApp;
use eframe::egui;

pub fn ruler_panel(app: &mut PainterApp, ui: &mut egui::Ui) {
    ui.checkbox(&mut app.grid.visible, "Show grid");
    ui.add_enabled(
        app.grid.visible,
        egui::Slider::new(&mut app.grid.opacity, 0.0..=1.0).text("Opacity"),
    );
    ui.add_enabled(
        app.grid.visible,
        egui::Slider::new(&mut app.grid.spacing, 20.0..=200.0)
            .step_by(10.0)
            .text("Spacing"),
    );
}
