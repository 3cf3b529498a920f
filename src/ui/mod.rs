//! egui panels: the tool bar and the tabbed side panel.
pub mod history;
pub mod layers;
pub mod ruler;
pub mod stamps;
pub mod templates;
pub mod top_bar;

use crate::PainterApp;
use crate::app::painter::SidePanel;
use eframe::egui;

pub fn side_panel(app: &mut PainterApp, ctx: &egui::Context) {
    egui::SidePanel::left("side_panel")
        .default_width(230.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for tab in SidePanel::ALL {
                    ui.selectable_value(&mut app.panel, tab, tab.label());
                }
            });
            ui.separator();
            match app.panel {
                SidePanel::Templates => templates::templates_panel(app, ui),
                SidePanel::Layers => layers::layers_panel(app, ui),
                SidePanel::Stamps => stamps::stamps_panel(app, ui),
                SidePanel::History => history::history_panel(app, ui),
                SidePanel::Ruler => ruler::ruler_panel(app, ui),
            }
        });
}
