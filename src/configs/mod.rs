pub mod json;
mod layer;
mod model;
mod range;
mod registry;

pub use layer::{Activation, LayerConfig, LayerField, LayerType};
pub use model::{
    Hyperparameters, InputShape, Loss, ModelConfiguration, Optimizer, DEFAULT_INPUT_SHAPE,
};
pub(crate) use range::non_zero;
pub use range::{DropoutRate, LearningRate};
pub use registry::default_for;
