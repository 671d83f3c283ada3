use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

use super::DropoutRate;

/// The closed set of layer kinds a model can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerType {
    Dense,
    Conv2D,
    MaxPooling2D,
    Flatten,
    BatchNormalization,
    Dropout,
}

impl LayerType {
    pub const ALL: [LayerType; 6] = [
        LayerType::Dense,
        LayerType::Conv2D,
        LayerType::MaxPooling2D,
        LayerType::Flatten,
        LayerType::BatchNormalization,
        LayerType::Dropout,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dense => "Dense",
            Self::Conv2D => "Conv2D",
            Self::MaxPooling2D => "MaxPooling2D",
            Self::Flatten => "Flatten",
            Self::BatchNormalization => "BatchNormalization",
            Self::Dropout => "Dropout",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown layer type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Sigmoid,
    Softmax,
    Tanh,
}

impl Activation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::Sigmoid => "sigmoid",
            Self::Softmax => "softmax",
            Self::Tanh => "tanh",
        }
    }
}

impl FromStr for Activation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relu" => Ok(Self::Relu),
            "sigmoid" => Ok(Self::Sigmoid),
            "softmax" => Ok(Self::Softmax),
            "tanh" => Ok(Self::Tanh),
            other => Err(format!("unknown activation: {other}")),
        }
    }
}

/// A single layer of the network, carrying exactly the fields of its kind.
///
/// Dimension-pair fields (`kernel_size`, `strides`, `pool_size`) are kept as the
/// raw text the user typed; malformed values are reported as advisories by
/// [`crate::format::advisories`], never rejected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerConfig {
    Dense {
        units: NonZeroU32,
        activation: Activation,
    },
    Conv2D {
        filters: NonZeroU32,
        kernel_size: String,
        strides: String,
        activation: Activation,
    },
    MaxPooling2D {
        pool_size: String,
    },
    Flatten,
    BatchNormalization,
    Dropout {
        rate: DropoutRate,
    },
}

impl LayerConfig {
    pub fn layer_type(&self) -> LayerType {
        match self {
            Self::Dense { .. } => LayerType::Dense,
            Self::Conv2D { .. } => LayerType::Conv2D,
            Self::MaxPooling2D { .. } => LayerType::MaxPooling2D,
            Self::Flatten => LayerType::Flatten,
            Self::BatchNormalization => LayerType::BatchNormalization,
            Self::Dropout { .. } => LayerType::Dropout,
        }
    }

    /// Writes `field` into this layer if the layer's kind has such a field.
    ///
    /// # Returns
    /// `true` if the value was written, `false` if the field does not belong to
    /// this kind of layer (the layer is left untouched).
    pub fn apply(&mut self, field: LayerField) -> bool {
        match (self, field) {
            (Self::Dense { units, .. }, LayerField::Units(v)) => *units = v,
            (Self::Conv2D { filters, .. }, LayerField::Filters(v)) => *filters = v,
            (Self::Conv2D { kernel_size, .. }, LayerField::KernelSize(v)) => *kernel_size = v,
            (Self::Conv2D { strides, .. }, LayerField::Strides(v)) => *strides = v,
            (Self::MaxPooling2D { pool_size }, LayerField::PoolSize(v)) => *pool_size = v,
            (
                Self::Dense { activation, .. } | Self::Conv2D { activation, .. },
                LayerField::Activation(v),
            ) => *activation = v,
            (Self::Dropout { rate }, LayerField::Rate(v)) => *rate = v,
            _ => return false,
        }
        true
    }
}

/// A single field edit, typed by the value it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerField {
    Units(NonZeroU32),
    Filters(NonZeroU32),
    KernelSize(String),
    Strides(String),
    PoolSize(String),
    Activation(Activation),
    Rate(DropoutRate),
}

impl LayerField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Units(_) => "units",
            Self::Filters(_) => "filters",
            Self::KernelSize(_) => "kernel_size",
            Self::Strides(_) => "strides",
            Self::PoolSize(_) => "pool_size",
            Self::Activation(_) => "activation",
            Self::Rate(_) => "rate",
        }
    }

    /// Maps a boundary field name and JSON value to a typed edit.
    ///
    /// Returns `None` for unknown names, values of the wrong shape, and values
    /// out of the field's range.
    pub fn from_raw(name: &str, value: &serde_json::Value) -> Option<Self> {
        let count = || {
            value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .and_then(NonZeroU32::new)
        };
        let text = || value.as_str().map(str::to_string);

        match name {
            "units" => count().map(Self::Units),
            "filters" => count().map(Self::Filters),
            "kernel_size" => text().map(Self::KernelSize),
            "strides" => text().map(Self::Strides),
            "pool_size" => text().map(Self::PoolSize),
            "activation" => value.as_str()?.parse().ok().map(Self::Activation),
            "rate" => value
                .as_f64()
                .and_then(|v| DropoutRate::new(v as f32))
                .map(Self::Rate),
            _ => None,
        }
    }
}
