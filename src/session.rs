use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::{
    assembler,
    configs::{Hyperparameters, ModelConfiguration, DEFAULT_INPUT_SHAPE},
    editor::LayerSequenceEditor,
    error::{BuilderError, Result},
};

/// The kinds of request handed to external collaborators. At most one request
/// of each kind is in flight at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Save,
    Train,
    GenerateCode,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Save => "save",
            Self::Train => "train",
            Self::GenerateCode => "code generation",
        })
    }
}

/// A training request: the configuration plus the dataset to train on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    #[serde(flatten)]
    pub config: ModelConfiguration,
    pub dataset_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ValidationMetrics {
    pub loss: f64,
    pub accuracy: f64,
}

/// What the training backend reports back. Only displayed, never interpreted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingResult {
    pub message: String,
    #[serde(default)]
    pub validation: Option<ValidationMetrics>,
    #[serde(default)]
    pub request_data: serde_json::Value,
}

/// The external collaborators a session hands assembled configurations to.
///
/// Transport, retries and timeouts are the implementor's concern.
#[async_trait::async_trait]
pub trait ModelBackend: Send + Sync + 'static {
    /// Persists a configuration.
    async fn save_model(&self, config: ModelConfiguration) -> anyhow::Result<()>;

    /// Trains a configuration against a stored dataset.
    async fn train_model(&self, request: TrainRequest) -> anyhow::Result<TrainingResult>;

    /// Produces source code for a configuration.
    async fn get_model_code(&self, config: ModelConfiguration) -> anyhow::Result<String>;
}

#[derive(Debug, Default)]
struct InFlight {
    save: AtomicBool,
    train: AtomicBool,
    code: AtomicBool,
}

impl InFlight {
    fn flag(&self, kind: ActionKind) -> &AtomicBool {
        match kind {
            ActionKind::Save => &self.save,
            ActionKind::Train => &self.train,
            ActionKind::GenerateCode => &self.code,
        }
    }

    fn acquire(self: &Arc<Self>, kind: ActionKind) -> Result<InFlightGuard> {
        self.flag(kind)
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                log::warn!("rejected {kind} request: one is already in flight");
                BuilderError::Busy(kind)
            })?;

        Ok(InFlightGuard {
            flags: Arc::clone(self),
            kind,
        })
    }
}

/// Marks a request kind as in flight until dropped.
struct InFlightGuard {
    flags: Arc<InFlight>,
    kind: ActionKind,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flags.flag(self.kind).store(false, Ordering::Release);
    }
}

/// A model being built: the layer editor, the global fields, and the
/// collaborators the finished configuration is handed to.
///
/// Every hand-off validates the current sequence and assembles a fresh
/// snapshot first; collaborator failures never touch the editor.
pub struct BuilderSession<B> {
    editor: LayerSequenceEditor,
    input_shape: String,
    hyperparameters: Hyperparameters,
    backend: Arc<B>,
    in_flight: Arc<InFlight>,
}

impl<B: ModelBackend> BuilderSession<B> {
    /// Creates a `BuilderSession` with an empty sequence and default globals.
    pub fn new(backend: B) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<B>) -> Self {
        Self {
            editor: LayerSequenceEditor::new(),
            input_shape: DEFAULT_INPUT_SHAPE.to_string(),
            hyperparameters: Hyperparameters::default(),
            backend,
            in_flight: Arc::default(),
        }
    }

    pub fn editor(&self) -> &LayerSequenceEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut LayerSequenceEditor {
        &mut self.editor
    }

    pub fn input_shape(&self) -> &str {
        &self.input_shape
    }

    pub fn set_input_shape(&mut self, input_shape: impl Into<String>) {
        self.input_shape = input_shape.into();
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyperparameters
    }

    pub fn hyperparameters_mut(&mut self) -> &mut Hyperparameters {
        &mut self.hyperparameters
    }

    pub fn is_in_flight(&self, kind: ActionKind) -> bool {
        self.in_flight.flag(kind).load(Ordering::Acquire)
    }

    /// Validates the current sequence and assembles a snapshot of it.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the sequence has structural violations.
    pub fn snapshot(&self) -> Result<ModelConfiguration> {
        assembler::assemble_checked(
            &self.input_shape,
            self.editor.layers(),
            self.hyperparameters,
        )
    }

    /// Hands a snapshot to persistence without waiting for the outcome.
    ///
    /// Must be called from within a tokio runtime. The outcome is only logged.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration`, `Busy` if a save is still running, or
    /// `NoRuntime` outside a runtime.
    pub fn save(&self) -> Result<()> {
        let config = self.snapshot()?;
        let handle = Handle::try_current().map_err(|_| BuilderError::NoRuntime)?;
        let guard = self.in_flight.acquire(ActionKind::Save)?;
        let backend = Arc::clone(&self.backend);

        log::info!("saving model with {} layer(s)", config.layers().len());
        handle.spawn(async move {
            let _guard = guard;
            match backend.save_model(config).await {
                Ok(()) => log::info!("model saved"),
                Err(e) => log::warn!("save failed: {e:#}"),
            }
        });
        Ok(())
    }

    /// Submits a snapshot for training on `dataset_id` and waits for the result.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration`, `Busy` if a training request is still
    /// running, or `Backend` if the collaborator fails.
    pub async fn train(&self, dataset_id: u64) -> Result<TrainingResult> {
        let config = self.snapshot()?;
        let _guard = self.in_flight.acquire(ActionKind::Train)?;

        log::info!("training on dataset {dataset_id} for {} epoch(s)", config.epochs());
        let request = TrainRequest { config, dataset_id };
        let result = self
            .backend
            .train_model(request)
            .await
            .map_err(|e| backend_error(ActionKind::Train, e))?;

        log::info!("training finished: {}", result.message);
        Ok(result)
    }

    /// Asks the code generator for source text of a snapshot.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration`, `Busy` if a generation request is still
    /// running, or `Backend` if the collaborator fails.
    pub async fn model_code(&self) -> Result<String> {
        let config = self.snapshot()?;
        let _guard = self.in_flight.acquire(ActionKind::GenerateCode)?;

        log::info!("requesting model code");
        self.backend
            .get_model_code(config)
            .await
            .map_err(|e| backend_error(ActionKind::GenerateCode, e))
    }
}

fn backend_error(action: ActionKind, e: anyhow::Error) -> BuilderError {
    log::warn!("{action} failed: {e:#}");
    BuilderError::Backend {
        action,
        msg: format!("{e:#}"),
    }
}
