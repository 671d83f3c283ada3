//! Literal syntax checks for layer fields.
//!
//! These checks only produce advisories. A layer with a malformed
//! `kernel_size` can still be assembled and submitted.

use std::fmt;

use crate::configs::LayerConfig;

/// Whether `s` is one or more ASCII digits, a literal `x`, then one or more
/// ASCII digits, with nothing before or after.
pub fn is_dimension_pair(s: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    match s.split_once('x') {
        Some((height, width)) => all_digits(height) && all_digits(width),
        None => false,
    }
}

/// Splits a dimension pair like `"3x3"` into its two components.
///
/// Returns `None` if `s` is not a dimension pair or a component overflows `u32`.
pub fn parse_dimension_pair(s: &str) -> Option<(u32, u32)> {
    if !is_dimension_pair(s) {
        return None;
    }

    let (height, width) = s.split_once('x')?;
    Some((height.parse().ok()?, width.parse().ok()?))
}

/// A non-blocking note that a layer field is not a well formed dimension pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatAdvisory {
    pub index: usize,
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for FormatAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "layer {}: {} '{}' should look like 3x3",
            self.index, self.field, self.value
        )
    }
}

/// Lists the dimension-pair fields of a layer, in declaration order.
fn dimension_fields(layer: &LayerConfig) -> Vec<(&'static str, &str)> {
    match layer {
        LayerConfig::Conv2D {
            kernel_size,
            strides,
            ..
        } => vec![("kernel_size", kernel_size.as_str()), ("strides", strides.as_str())],
        LayerConfig::MaxPooling2D { pool_size } => vec![("pool_size", pool_size.as_str())],
        _ => Vec::new(),
    }
}

/// Collects an advisory for every malformed dimension-pair field in `layers`.
pub fn advisories(layers: &[LayerConfig]) -> Vec<FormatAdvisory> {
    layers
        .iter()
        .enumerate()
        .flat_map(|(index, layer)| {
            dimension_fields(layer)
                .into_iter()
                .filter(|(_, value)| !is_dimension_pair(value))
                .map(move |(field, value)| FormatAdvisory {
                    index,
                    field,
                    value: value.to_string(),
                })
        })
        .collect()
}
