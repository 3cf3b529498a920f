use crate::PainterApp;
use eframe::egui;

pub fn templates_panel(app: &mut PainterApp, ui: &mut egui::Ui) {
    let mut chosen = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for template in app.library.iter() {
            let selected = app.session.template_id() == Some(template.id.as_str());
            let label = match &template.icon {
                Some(icon) => format!("{icon} {}", template.name),
                None => template.name.clone(),
            };
            if ui.selectable_label(selected, egui::RichText::new(label).size(18.0)).clicked() {
                chosen = Some(template.id.clone());
            }
        }
    });

    if let Some(template) = chosen.and_then(|id| app.library.get(&id)) {
        app.session.load_template(template);
    }
}
