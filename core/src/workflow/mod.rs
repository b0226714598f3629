// covenant/src/workflow/mod.rs

//! Ordered, named-step workflows over shared context data.
//!
//! Submission flows (registering, placing an order) are a sequence of steps:
//! validate, write, then notify. Steps flagged best-effort may fail without
//! failing the flow, which is how notification is kept fire-and-forget.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod registry;

pub use context_data::ContextData;
pub use control::{StepControl, WorkflowOutcome};
pub use definition::{Handler, Step, Workflow};
pub use registry::WorkflowRegistry;
