// core/src/core/handler.rs

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// Boxed asynchronous step handler.
///
/// A handler receives a clone of the run's [`ContextData`]. It must release any lock
/// guard before it awaits, and it resolves to a [`PipelineControl`] or the pipeline's
/// error type.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
