use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::brush_engine::fill::FillOptions;
use crate::error::{PainterError, Result};
use crate::utils::color::Color;

/// What a brush/eraser click on empty canvas does to the active layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyClick {
    /// Keep drawing on the current layer.
    #[default]
    Keep,
    /// Clear the active layer so nothing receives input until one is picked.
    Deselect,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Snapshots kept in the history gallery; older ones are dropped silently.
    pub history_capacity: usize,
    pub seed_tolerance: u8,
    pub span_tolerance: u8,
    pub brush_width: f32,
    pub default_color: Color,
    pub empty_click: EmptyClick,
    pub thumbnail_width: u32,
    pub fit_padding: f32,
    pub wheel_zoom_step: f32,
    pub sticker_size: f32,
    /// Random rotation applied to new stickers, +/- this many degrees.
    pub sticker_jitter_degrees: f32,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            seed_tolerance: 3,
            span_tolerance: 30,
            brush_width: 50.0,
            default_color: Color::BLACK,
            empty_click: EmptyClick::Keep,
            thumbnail_width: 160,
            fit_padding: 40.0,
            wheel_zoom_step: 0.1,
            sticker_size: 64.0,
            sticker_jitter_degrees: 15.0,
        }
    }
}

impl PainterConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PainterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml(&raw)?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn fill_options(&self, lock_alpha: bool) -> FillOptions {
        FillOptions {
            seed_tolerance: self.seed_tolerance,
            span_tolerance: self.span_tolerance,
            lock_alpha,
        }
    }
}

/// Layered coloring canvas.
#[derive(Parser, Debug, Default)]
#[command(name = "layer-painter", version, about = "Layered coloring canvas with templates")]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Template id to open at startup (defaults to the first built-in).
    #[arg(short, long, value_name = "ID")]
    pub template: Option<String>,

    /// Extra template described as JSON; added to the picker.
    #[arg(long, value_name = "FILE.json")]
    pub template_file: Vec<PathBuf>,
}

impl Cli {
    /// Config from `--config`, or defaults.
    pub fn painter_config(&self) -> Result<PainterConfig> {
        match &self.config {
            Some(path) => PainterConfig::load(path),
            None => Ok(PainterConfig::default()),
        }
    }
}
