// core/src/lib.rs

//! A small asynchronous step-pipeline engine.
//!
//! A pipeline is an ordered list of named steps. Each step carries `before`, `on`
//! and `after` handlers that operate on a shared [`ContextData`]. Handlers may stop
//! the run early, fail it, or let it continue to the next step. The gateway's
//! checkout flow is expressed as one of these pipelines.
//!
//! ```text
//!   let mut p = Pipeline::<MyCtx, MyError>::new(&[("load", false, None), ("save", false, None)]);
//!   p.on_root("load", |ctx| Box::pin(async move { ...; Ok::<_, MyError>(PipelineControl::Continue) }));
//!   registry.register_pipeline(p);
//!   registry.run(ContextData::new(MyCtx::default())).await?;
//! ```

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{PipelineError, PipelineResultExt};

pub use crate::registry::PipelineRegistry;
