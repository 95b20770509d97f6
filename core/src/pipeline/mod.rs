// core/src/pipeline/mod.rs

//! The `Pipeline<T, E>` type: construction, step editing, hook registration and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
pub use hooks::Phase;
