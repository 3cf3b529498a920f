pub mod app;
pub mod brush_engine;
pub mod canvas;
pub mod config;
pub mod error;
pub mod session;
pub mod styling;
pub mod template;
pub mod ui;
pub mod utils;

pub use app::PainterApp;
pub use config::{Cli, PainterConfig};
pub use error::{PainterError, Result};
pub use session::{Session, Tool};
