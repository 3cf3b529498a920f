use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges of the engine: files, codecs and user-supplied text.
///
/// Drawing operations themselves never fail; they report "nothing happened" instead.
#[derive(Debug, Error)]
pub enum PainterError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid template: {0}")]
    TemplateFormat(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("unknown template {0:?}")]
    UnknownTemplate(String),
}

pub type Result<T, E = PainterError> = std::result::Result<T, E>;
