use super::{input_handler, render_helper};
use crate::{
    canvas::history::SnapshotId,
    session::Session,
    styling, ui,
    template::TemplateLibrary,
    utils::exporter::{ExportFormat, save_flattened},
};
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Which tab the left side panel shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SidePanel {
    Templates,
    Layers,
    Stamps,
    History,
    Ruler,
}

impl SidePanel {
    pub const ALL: [SidePanel; 5] = [
        SidePanel::Templates,
        SidePanel::Layers,
        SidePanel::Stamps,
        SidePanel::History,
        SidePanel::Ruler,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SidePanel::Templates => "Pictures",
            SidePanel::Layers => "Layers",
            SidePanel::Stamps => "Stamps",
            SidePanel::History => "Gallery",
            SidePanel::Ruler => "Ruler",
        }
    }
}

/// Display-only ruler grid drawn over the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSettings {
    pub visible: bool,
    pub opacity: f32,
    /// Logical pixels between lines.
    pub spacing: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: false,
            opacity: 0.1,
            spacing: 50.0,
        }
    }
}

/// egui host around a [`Session`]: owns the textures, panels and background export.
pub struct PainterApp {
    pub(crate) session: Session,
    pub(crate) library: TemplateLibrary,

    pub(crate) canvas_texture: Option<egui::TextureHandle>,
    pub(crate) uploaded_revision: Option<u64>,
    pub(crate) thumbnails: HashMap<SnapshotId, egui::TextureHandle>,

    pub(crate) panel: SidePanel,
    pub(crate) mixing: bool,
    pub(crate) grid: GridSettings,
    pub(crate) first_frame: bool,

    pub(crate) export_message: Option<String>,
    pub(crate) export_task: Option<thread::JoinHandle<Result<String, String>>>,
}

impl PainterApp {
    /// Style the context and open `initial` (a template id) if it exists.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut session: Session,
        library: TemplateLibrary,
        initial: Option<&str>,
    ) -> Self {
        styling::apply_global_style(&cc.egui_ctx);

        match initial.and_then(|id| library.get(id)) {
            Some(template) => session.load_template(template),
            None => log::warn!("starting without a template"),
        }

        Self {
            session,
            library,
            canvas_texture: None,
            uploaded_revision: None,
            thumbnails: HashMap::new(),
            panel: SidePanel::Templates,
            mixing: false,
            grid: GridSettings::default(),
            first_frame: true,
            export_message: None,
            export_task: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Flatten on the UI thread, then encode and write on a worker thread.
    pub(crate) fn start_export(&mut self, path: PathBuf) {
        if self.export_task.is_some() {
            return;
        }
        let format = ExportFormat::from_path(&path);
        let flat = self.session.composite();
        self.export_message = Some("Saving...".to_string());
        self.export_task = Some(thread::spawn(move || {
            match save_flattened(&flat, &path, format) {
                Ok(()) => Ok(format!("Saved to {}", path.display())),
                Err(err) => Err(format!("Save failed: {err}")),
            }
        }));
    }

    fn poll_export(&mut self) {
        let finished = self.export_task.as_ref().is_some_and(|h| h.is_finished());
        if !finished {
            return;
        }
        let result = self
            .export_task
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_else(|| Err("Export thread panicked".to_string()));
        match result {
            Ok(msg) => {
                log::info!("{msg}");
                self.export_message = Some(msg);
            }
            Err(err) => {
                log::error!("{err}");
                self.export_message = Some(err);
            }
        }
    }
}

impl eframe::App for PainterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.session.pump_restores() > 0 {
            ctx.request_repaint();
        }
        self.poll_export();

        ui::top_bar::top_bar(self, ctx);
        ui::side_panel(self, ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_rgb(34, 38, 50)))
            .show(ctx, |ui| {
                render_helper::update_canvas_texture(self, ctx);
                let view = render_helper::draw_canvas(self, ui);
                input_handler::handle_input(self, ctx, &view);
            });

        if self.session.is_gesture_active() {
            ctx.request_repaint();
        } else if self.session.restores_pending() || self.export_task.is_some() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
