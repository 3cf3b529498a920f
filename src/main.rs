use clap::Parser;
use layer_painter::{
    Cli, PainterApp, Session,
    template::{Template, TemplateLibrary},
};

fn main() -> eframe::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match cli.painter_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}; falling back to defaults");
            Default::default()
        }
    };

    let mut library = TemplateLibrary::default();
    for path in &cli.template_file {
        match Template::load(path) {
            Ok(template) => {
                log::info!("added template {:?} from {}", template.id, path.display());
                library.insert(template);
            }
            Err(err) => log::error!("skipping template file: {err}"),
        }
    }

    let initial = match &cli.template {
        Some(id) => match library.require(id) {
            Ok(template) => Some(template.id.clone()),
            Err(err) => {
                log::warn!("{err}; opening the first template instead");
                library.first().map(|t| t.id.clone())
            }
        },
        None => library.first().map(|t| t.id.clone()),
    };

    let session = Session::new(config);
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Layer Painter",
        options,
        Box::new(move |cc| Ok(Box::new(PainterApp::new(cc, session, library, initial.as_deref())))),
    )
}
