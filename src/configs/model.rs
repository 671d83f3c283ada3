use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

use super::{non_zero, LayerConfig, LearningRate};
use crate::error::{BuilderError, Result};

pub const DEFAULT_INPUT_SHAPE: &str = "32, 32, 3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimizer {
    #[default]
    Adam,
    Sgd,
    Rmsprop,
}

impl Optimizer {
    /// The class name under `tf.keras.optimizers`.
    pub fn keras_name(self) -> &'static str {
        match self {
            Self::Adam => "Adam",
            Self::Sgd => "SGD",
            Self::Rmsprop => "RMSprop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    #[default]
    CategoricalCrossentropy,
    BinaryCrossentropy,
    MeanSquaredError,
}

impl Loss {
    pub fn name(self) -> &'static str {
        match self {
            Self::CategoricalCrossentropy => "categorical_crossentropy",
            Self::BinaryCrossentropy => "binary_crossentropy",
            Self::MeanSquaredError => "mean_squared_error",
        }
    }
}

/// Global training hyperparameters set next to the layer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperparameters {
    #[serde(default)]
    pub optimizer: Optimizer,
    #[serde(default)]
    pub loss: Loss,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: LearningRate,
    #[serde(default = "default_epochs")]
    pub epochs: NonZeroU32,
}

const DEFAULT_EPOCHS: NonZeroU32 = non_zero(10);

fn default_learning_rate() -> LearningRate {
    LearningRate::DEFAULT
}

fn default_epochs() -> NonZeroU32 {
    DEFAULT_EPOCHS
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            optimizer: Optimizer::default(),
            loss: Loss::default(),
            learning_rate: default_learning_rate(),
            epochs: default_epochs(),
        }
    }
}

/// Parsed form of the free-text input shape: height, width and channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputShape {
    pub height: NonZeroU32,
    pub width: NonZeroU32,
    pub channels: NonZeroU32,
}

impl InputShape {
    /// Parses text like `"32, 32, 3"`.
    ///
    /// # Errors
    /// Returns `InvalidInputShape` unless the text holds exactly three
    /// comma-separated positive integers.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || BuilderError::InvalidInputShape(text.to_string());

        let dims = text
            .split(',')
            .map(|part| part.trim().parse::<NonZeroU32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        match dims[..] {
            [height, width, channels] => Ok(Self {
                height,
                width,
                channels,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.height, self.width, self.channels)
    }
}

/// An immutable snapshot of everything needed to train or generate a model.
///
/// Built only by [`crate::assembler::assemble`]; every save, train or code
/// request carries its own snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfiguration {
    input_shape: String,
    layers: Vec<LayerConfig>,
    #[serde(flatten)]
    hyperparameters: Hyperparameters,
}

impl ModelConfiguration {
    pub(crate) fn new(
        input_shape: String,
        layers: Vec<LayerConfig>,
        hyperparameters: Hyperparameters,
    ) -> Self {
        Self {
            input_shape,
            layers,
            hyperparameters,
        }
    }

    pub fn input_shape(&self) -> &str {
        &self.input_shape
    }

    pub fn layers(&self) -> &[LayerConfig] {
        &self.layers
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyperparameters
    }

    pub fn optimizer(&self) -> Optimizer {
        self.hyperparameters.optimizer
    }

    pub fn loss(&self) -> Loss {
        self.hyperparameters.loss
    }

    pub fn learning_rate(&self) -> f32 {
        self.hyperparameters.learning_rate.get()
    }

    pub fn epochs(&self) -> u32 {
        self.hyperparameters.epochs.get()
    }
}
