use std::{error::Error, fmt, io};

use crate::{session::ActionKind, validator::Violation};

/// The builder's result type.
pub type Result<T> = std::result::Result<T, BuilderError>;

/// All errors that can occur while building, checking or handing off a model.
#[derive(Debug)]
pub enum BuilderError {
    /// An editor operation received an index outside the sequence.
    IndexOutOfRange { index: usize, len: usize },
    /// Assembly was attempted while the sequence still has structural violations.
    InvalidConfiguration(Vec<Violation>),
    /// The free-text input shape is not three positive integers.
    InvalidInputShape(String),
    /// A dimension-pair field could not be turned into a pair of integers.
    InvalidDimensionPair {
        index: usize,
        field: &'static str,
        value: String,
    },
    /// A request of the same kind is still in flight.
    Busy(ActionKind),
    /// An external collaborator reported a failure.
    Backend { action: ActionKind, msg: String },
    /// A fire-and-forget hand-off was requested outside an async runtime.
    NoRuntime,
    Json(serde_json::Error),
    Io(io::Error),
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for {len} layer(s)")
            }
            Self::InvalidConfiguration(violations) => {
                let msgs: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "invalid configuration: {}", msgs.join("; "))
            }
            Self::InvalidInputShape(shape) => write!(
                f,
                "invalid input shape '{shape}': expected three positive integers"
            ),
            Self::InvalidDimensionPair {
                index,
                field,
                value,
            } => write!(
                f,
                "layer {index}: {field} '{value}' is not of the form HxW"
            ),
            Self::Busy(action) => write!(f, "a {action} request is already in flight"),
            Self::Backend { action, msg } => write!(f, "{action} failed: {msg}"),
            Self::NoRuntime => write!(f, "no async runtime available for hand-off"),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for BuilderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BuilderError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for BuilderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
