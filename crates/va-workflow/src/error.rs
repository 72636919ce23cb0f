use thiserror::Error;
use va_config::ConfigError;
use va_core::errors::CoreError;
use va_core::stage::MemoKind;
use va_genai::GenAiError;
use va_store::StoreError;

/// Errors surfaced by workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure. Domain rejections raised inside a store
    /// mutation surface as `Core` instead.
    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    GenAi(#[from] GenAiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A memo generation call failed. The stage keeps its prior content.
    #[error("{memo} generation failed: {message}")]
    Generation { memo: MemoKind, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(core) => Self::Core(core),
            other => Self::Store(other),
        }
    }
}

impl WorkflowError {
    /// The entity the caller asked for does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Core(CoreError::NotFound { .. })
                | Self::Store(StoreError::NotFound(_))
        )
    }
}
