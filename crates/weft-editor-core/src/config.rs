//! Editor configuration.
//!
//! Every field has a default, so a config file only needs the fields it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{EditorError, Result};
use crate::model::HeadingLevel;
use crate::variables::{Variable, validate_name};

pub const DEFAULT_IMAGE_STYLE: &str = "max-width: 100%; height: auto; cursor: move;";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shown on the rich surface while the content is empty.
    pub placeholder: String,
    /// Shown in the raw markup view while the content is empty.
    pub raw_placeholder: String,
    /// Host variables, offered before the built-in ones.
    pub variables: Vec<Variable>,
    pub font_sizes: Vec<SmolStr>,
    pub font_families: Vec<SmolStr>,
    pub colors: Vec<SmolStr>,
    pub heading_levels: Vec<HeadingLevel>,
    /// Inline style given to inserted images.
    pub image_style: String,
    /// Cropper output quality, in `(0, 1]`.
    pub jpeg_quality: f32,
    /// Largest edge of the crop preview, in pixels.
    pub preview_max_display: u32,
    pub preview: PreviewConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder: "Start typing...".into(),
            raw_placeholder: "Enter HTML here...".into(),
            variables: Vec::new(),
            font_sizes: ["12px", "14px", "16px", "18px", "20px", "24px", "28px", "32px"]
                .into_iter()
                .map(SmolStr::new_static)
                .collect(),
            font_families: [
                "Arial",
                "Georgia",
                "Times New Roman",
                "Helvetica",
                "Verdana",
                "Courier New",
            ]
            .into_iter()
            .map(SmolStr::new_static)
            .collect(),
            colors: [
                "#000000", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
                "#FFA500", "#800080", "#FFC0CB",
            ]
            .into_iter()
            .map(SmolStr::new_static)
            .collect(),
            heading_levels: (1..=6).filter_map(HeadingLevel::new).collect(),
            image_style: DEFAULT_IMAGE_STYLE.into(),
            jpeg_quality: 0.9,
            preview_max_display: 384,
            preview: PreviewConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EditorError::Config(format!("reading {}: {e}", path.display())))?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for variable in &self.variables {
            validate_name(&variable.name)?;
        }
        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            return Err(EditorError::Config(format!(
                "jpeg_quality must be in (0, 1], got {}",
                self.jpeg_quality
            )));
        }
        if self.preview_max_display == 0 {
            return Err(EditorError::Config("preview_max_display must be positive".into()));
        }
        Ok(())
    }

    /// JPEG quality on the encoder's 1-100 scale.
    pub fn jpeg_quality_percent(&self) -> u8 {
        (self.jpeg_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// Settings for the host's live preview pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Shown instead of an empty markup tree.
    pub empty_placeholder: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            empty_placeholder: "Your content will appear here...".into(),
        }
    }
}
