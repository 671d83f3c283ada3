//! Structural checks over a finished layer sequence.
//!
//! The sequence is walked once, front to back. Each position is checked
//! against every positional rule on its own, so one layer can produce several
//! violations. Violations come out in scan order: the per-layer rules of
//! layer 0, then those of layer 1, and so on, with the final-layer rule last.

use std::fmt;

use crate::configs::{LayerConfig, LayerType};

/// A reason the sequence cannot be trained as it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Empty,
    FirstNotConv2D,
    ConvAfterDense { index: usize },
    DenseBeforeFlatten { index: usize },
    DropoutFirst,
    MaxPoolingWithoutFeatureMap { index: usize },
    BatchNormWithoutFeatureMap { index: usize },
    LastNotDense,
}

impl Violation {
    /// The layer the violation points at, if it is tied to one.
    pub fn index(&self) -> Option<usize> {
        match *self {
            Self::Empty | Self::LastNotDense => None,
            Self::FirstNotConv2D | Self::DropoutFirst => Some(0),
            Self::ConvAfterDense { index }
            | Self::DenseBeforeFlatten { index }
            | Self::MaxPoolingWithoutFeatureMap { index }
            | Self::BatchNormWithoutFeatureMap { index } => Some(index),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Empty => "model must have at least one layer",
            Self::FirstNotConv2D => "first layer must be Conv2D",
            Self::ConvAfterDense { .. } => "Conv2D cannot follow Dense",
            Self::DenseBeforeFlatten { .. } => "Dense layer must come after a Flatten layer",
            Self::DropoutFirst => "Dropout cannot be the first layer",
            Self::MaxPoolingWithoutFeatureMap { .. } => {
                "MaxPooling2D must follow Conv2D or BatchNormalization"
            }
            Self::BatchNormWithoutFeatureMap { .. } => {
                "BatchNormalization must follow Conv2D or MaxPooling2D"
            }
            Self::LastNotDense => "final layer must be Dense",
        };
        f.write_str(msg)
    }
}

/// Checks `layers` for structural violations.
///
/// # Returns
/// Every violation found, in scan order. An empty list means the sequence is
/// structurally valid.
pub fn validate(layers: &[LayerConfig]) -> Vec<Violation> {
    let Some(last) = layers.last() else {
        return vec![Violation::Empty];
    };

    let mut violations = Vec::new();
    let mut seen_flatten = false;
    let mut prev: Option<LayerType> = None;

    for (index, layer) in layers.iter().enumerate() {
        let kind = layer.layer_type();
        seen_flatten |= kind == LayerType::Flatten;

        if index == 0 && kind != LayerType::Conv2D {
            violations.push(Violation::FirstNotConv2D);
        }

        if kind == LayerType::Conv2D && prev == Some(LayerType::Dense) {
            violations.push(Violation::ConvAfterDense { index });
        }

        if kind == LayerType::Dense && !seen_flatten {
            violations.push(Violation::DenseBeforeFlatten { index });
        }

        if index == 0 && kind == LayerType::Dropout {
            violations.push(Violation::DropoutFirst);
        }

        // A pooling layer with nothing before it has no feature map either.
        if kind == LayerType::MaxPooling2D
            && !matches!(
                prev,
                Some(LayerType::Conv2D | LayerType::BatchNormalization)
            )
        {
            violations.push(Violation::MaxPoolingWithoutFeatureMap { index });
        }

        if kind == LayerType::BatchNormalization
            && prev.is_some_and(|p| !matches!(p, LayerType::Conv2D | LayerType::MaxPooling2D))
        {
            violations.push(Violation::BatchNormWithoutFeatureMap { index });
        }

        prev = Some(kind);
    }

    if last.layer_type() != LayerType::Dense {
        violations.push(Violation::LastNotDense);
    }

    log::debug!(
        "validated {} layer(s): {} violation(s)",
        layers.len(),
        violations.len()
    );
    violations
}

/// Renders violations as the messages shown to the user.
pub fn messages(violations: &[Violation]) -> Vec<String> {
    violations.iter().map(ToString::to_string).collect()
}
