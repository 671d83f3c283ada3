use std::num::NonZeroU32;

use super::{non_zero, Activation, DropoutRate, LayerConfig, LayerType};

const DENSE_UNITS: NonZeroU32 = non_zero(64);
const CONV_FILTERS: NonZeroU32 = non_zero(32);

/// Returns a fresh, fully populated layer of the given kind.
pub fn default_for(kind: LayerType) -> LayerConfig {
    match kind {
        LayerType::Dense => LayerConfig::Dense {
            units: DENSE_UNITS,
            activation: Activation::Relu,
        },
        LayerType::Conv2D => LayerConfig::Conv2D {
            filters: CONV_FILTERS,
            kernel_size: "3x3".into(),
            strides: "1x1".into(),
            activation: Activation::Relu,
        },
        LayerType::MaxPooling2D => LayerConfig::MaxPooling2D {
            pool_size: "2x2".into(),
        },
        LayerType::Flatten => LayerConfig::Flatten,
        LayerType::BatchNormalization => LayerConfig::BatchNormalization,
        LayerType::Dropout => LayerConfig::Dropout {
            rate: DropoutRate::DEFAULT,
        },
    }
}
