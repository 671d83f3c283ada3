use crate::{
    configs::{Hyperparameters, LayerConfig, ModelConfiguration},
    error::{BuilderError, Result},
    validator::{self, Violation},
};

/// Builds a configuration snapshot from already validated parts.
///
/// This performs no checks of its own; use [`assemble_checked`] unless the
/// sequence was validated just before.
pub fn assemble(
    input_shape: &str,
    layers: &[LayerConfig],
    hyperparameters: Hyperparameters,
) -> ModelConfiguration {
    ModelConfiguration::new(input_shape.to_string(), layers.to_vec(), hyperparameters)
}

/// Refuses to go further when earlier validation left violations behind.
///
/// # Errors
/// Returns `InvalidConfiguration` carrying `violations` if it is not empty.
pub fn ensure_valid(violations: Vec<Violation>) -> Result<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(BuilderError::InvalidConfiguration(violations))
    }
}

/// Validates `layers` and assembles a snapshot if no violation was found.
///
/// # Errors
/// Returns `InvalidConfiguration` with the full violation list otherwise; no
/// configuration is produced in that case.
pub fn assemble_checked(
    input_shape: &str,
    layers: &[LayerConfig],
    hyperparameters: Hyperparameters,
) -> Result<ModelConfiguration> {
    ensure_valid(validator::validate(layers))?;
    Ok(assemble(input_shape, layers, hyperparameters))
}
