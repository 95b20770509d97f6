// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Step already defined: {step_name}")]
  DuplicateStep { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No pipeline registered for context type {type_name}")]
  NotRegistered { type_name: String },

  #[error("Handler failed. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal pipeline error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for PipelineError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a PipelineError that was boxed into anyhow on the way up.
    match err.downcast::<PipelineError>() {
      Ok(inner) => inner,
      Err(other) => PipelineError::Handler { source: other },
    }
  }
}

/// Shorthand for wrapping foreign errors from inside handlers.
pub trait PipelineResultExt<T> {
  fn into_pipeline_err(self) -> Result<T, PipelineError>;
}

impl<T, E> PipelineResultExt<T> for Result<T, E>
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn into_pipeline_err(self) -> Result<T, PipelineError> {
    self.map_err(|e| PipelineError::Handler { source: AnyhowError::new(e) })
  }
}
