//! Numeric values that are only meaningful inside a range.
//!
//! Out-of-range values cannot be constructed, so a configuration holding one
//! of these types never needs rechecking downstream.

use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

/// A `NonZeroU32` for constant defaults, checked at compile time.
pub(crate) const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("constant must be non-zero"),
    }
}

/// The fraction of units a Dropout layer drops, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct DropoutRate(f32);

impl DropoutRate {
    pub const DEFAULT: Self = Self(0.5);

    /// Returns `None` unless `0 < rate <= 1`. NaN is rejected.
    pub fn new(rate: f32) -> Option<Self> {
        (rate > 0.0 && rate <= 1.0).then_some(Self(rate))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for DropoutRate {
    type Error = String;

    fn try_from(rate: f32) -> Result<Self, Self::Error> {
        Self::new(rate).ok_or_else(|| format!("dropout rate {rate} must be in (0, 1]"))
    }
}

impl From<DropoutRate> for f32 {
    fn from(rate: DropoutRate) -> Self {
        rate.0
    }
}

impl fmt::Display for DropoutRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A strictly positive, finite optimizer step size.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct LearningRate(f32);

impl LearningRate {
    pub const DEFAULT: Self = Self(0.001);

    /// Returns `None` unless `lr` is finite and greater than zero.
    pub fn new(lr: f32) -> Option<Self> {
        (lr > 0.0 && lr.is_finite()).then_some(Self(lr))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for LearningRate {
    type Error = String;

    fn try_from(lr: f32) -> Result<Self, Self::Error> {
        Self::new(lr).ok_or_else(|| format!("learning rate {lr} must be positive"))
    }
}

impl From<LearningRate> for f32 {
    fn from(lr: LearningRate) -> Self {
        lr.0
    }
}

impl fmt::Display for LearningRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
