//! Keras source generation for an assembled configuration.

use crate::{
    configs::{InputShape, LayerConfig, ModelConfiguration},
    error::{BuilderError, Result},
    format::parse_dimension_pair,
};

const INDENT: &str = "    ";

/// Renders `config` as a Python module defining `build_model()`.
///
/// # Errors
/// Returns `InvalidInputShape` if the input shape does not parse, or
/// `InvalidDimensionPair` for the first malformed kernel, stride or pool size.
pub fn generate(config: &ModelConfiguration) -> Result<String> {
    let shape = InputShape::parse(config.input_shape())?;

    let mut lines = vec![
        "import tensorflow as tf".to_string(),
        String::new(),
        "def build_model():".to_string(),
        format!("{INDENT}model = tf.keras.Sequential()"),
        format!("{INDENT}model.add(tf.keras.layers.InputLayer(input_shape={shape}))"),
        String::new(),
    ];

    for (index, layer) in config.layers().iter().enumerate() {
        lines.push(format!("{INDENT}model.add(tf.keras.layers.{})", layer_call(index, layer)?));
        lines.push(String::new());
    }

    lines.extend([
        format!(
            "{INDENT}optimizer = tf.keras.optimizers.{}(learning_rate={})",
            config.optimizer().keras_name(),
            config.learning_rate()
        ),
        format!(
            "{INDENT}model.compile(optimizer=optimizer, loss='{}', metrics=['accuracy'])",
            config.loss().name()
        ),
        format!("{INDENT}return model"),
        String::new(),
        "# To build the model, call:".to_string(),
        "# model = build_model()".to_string(),
    ]);

    log::debug!("generated {} line(s) of model code", lines.len());
    Ok(lines.join("\n"))
}

fn layer_call(index: usize, layer: &LayerConfig) -> Result<String> {
    let call = match layer {
        LayerConfig::Dense { units, activation } => {
            format!("Dense(units={units}, activation='{}')", activation.name())
        }
        LayerConfig::Conv2D {
            filters,
            kernel_size,
            strides,
            activation,
        } => format!(
            "Conv2D(filters={filters}, kernel_size={}, strides={}, activation='{}')",
            tuple(index, "kernel_size", kernel_size)?,
            tuple(index, "strides", strides)?,
            activation.name()
        ),
        LayerConfig::MaxPooling2D { pool_size } => {
            format!("MaxPooling2D(pool_size={})", tuple(index, "pool_size", pool_size)?)
        }
        LayerConfig::Flatten => "Flatten()".to_string(),
        LayerConfig::BatchNormalization => "BatchNormalization()".to_string(),
        LayerConfig::Dropout { rate } => format!("Dropout(rate={rate})"),
    };
    Ok(call)
}

fn tuple(index: usize, field: &'static str, value: &str) -> Result<String> {
    let (h, w) =
        parse_dimension_pair(value).ok_or_else(|| BuilderError::InvalidDimensionPair {
            index,
            field,
            value: value.to_string(),
        })?;
    Ok(format!("({h}, {w})"))
}
