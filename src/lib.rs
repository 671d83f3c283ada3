pub mod assembler;
pub mod codegen;
pub mod configs;
pub mod editor;
pub mod error;
pub mod format;
pub mod session;
pub mod validator;

pub use editor::LayerSequenceEditor;
pub use error::{BuilderError, Result};
pub use session::{ActionKind, BuilderSession, ModelBackend, TrainRequest, TrainingResult};
pub use validator::Violation;

use configs::{Hyperparameters, LayerConfig, ModelConfiguration};
use format::FormatAdvisory;

/// Everything a user should be told about a layer sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Structural problems; any of these blocks assembly.
    pub violations: Vec<Violation>,
    /// Malformed dimension-pair fields; informational only.
    pub advisories: Vec<FormatAdvisory>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// One line per violation, prefixed with the layer it points at if any.
    pub fn violation_lines(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|violation| match violation.index() {
                Some(index) => format!("layer {index}: {violation}"),
                None => violation.to_string(),
            })
            .collect()
    }
}

/// Runs the structural validator and the format checks over `layers`.
pub fn check(layers: &[LayerConfig]) -> Report {
    let report = Report {
        violations: validator::validate(layers),
        advisories: format::advisories(layers),
    };
    log::debug!(
        "check: {} violation(s), {} advisory(ies)",
        report.violations.len(),
        report.advisories.len()
    );
    report
}

/// Validates the editor's current sequence and snapshots it with the given
/// globals.
///
/// # Errors
/// Returns `InvalidConfiguration` listing every violation when the sequence
/// is not structurally valid.
pub fn build(
    editor: &LayerSequenceEditor,
    input_shape: &str,
    hyperparameters: Hyperparameters,
) -> Result<ModelConfiguration> {
    assembler::assemble_checked(input_shape, editor.layers(), hyperparameters)
}
