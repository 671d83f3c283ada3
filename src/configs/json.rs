use std::{fs, path::Path};

use serde::Deserialize;

use super::{Hyperparameters, LayerConfig, DEFAULT_INPUT_SHAPE};
use crate::{editor::LayerSequenceEditor, error::Result};

/// A model as submitted at the boundary, before it has been validated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDraft {
    #[serde(default = "default_input_shape")]
    pub input_shape: String,
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    #[serde(flatten)]
    pub hyperparameters: Hyperparameters,
}

fn default_input_shape() -> String {
    DEFAULT_INPUT_SHAPE.to_string()
}

impl ModelDraft {
    /// Hands the draft's layers over to a fresh editor.
    pub fn into_editor(self) -> (LayerSequenceEditor, String, Hyperparameters) {
        (
            LayerSequenceEditor::from_layers(self.layers),
            self.input_shape,
            self.hyperparameters,
        )
    }
}

/// Parses a [`ModelDraft`] from JSON text.
///
/// # Errors
/// Returns a `Json` error if the text is not a valid model payload.
pub fn from_str(content: &str) -> Result<ModelDraft> {
    Ok(serde_json::from_str(content)?)
}

/// Loads a [`ModelDraft`] from a JSON file.
///
/// # Errors
/// Returns an `Io` error if the file cannot be read, or a `Json` error if it
/// cannot be parsed.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelDraft> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    log::debug!("loaded model payload from {}", path.display());
    from_str(&content)
}
