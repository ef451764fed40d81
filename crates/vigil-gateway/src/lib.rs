//! # Workflow Gateway
//!
//! Facade over the durable workflow engine the Vigil console drives.
//!
//! The console never talks to an engine directly: every interaction goes
//! through the [`WorkflowGateway`] trait — start an instance, await its
//! result, list instances, fetch step records, or deliver a signal to a
//! specific running instance. [`InMemoryEngine`] implements the trait on
//! top of the tokio runtime for local mode and tests.
//!
//! ## Example
//!
//! ```ignore
//! use vigil_gateway::{InMemoryEngine, WorkflowGateway, WorkflowKind};
//!
//! let engine = InMemoryEngine::new();
//! engine.register(WorkflowKind::Scan, |ctx, _input| async move {
//!     let findings = ctx.run_step("probe targets", async { vec!["finding"] }).await;
//!     Ok(serde_json::json!(findings))
//! });
//! ```

mod gateway;
mod memory;
mod types;

pub use gateway::{GatewayError, WorkflowGateway};
pub use memory::{InMemoryEngine, WorkflowContext, WorkflowFn};
pub use types::{
    StepStatus, WorkflowHandle, WorkflowKind, WorkflowStatus, WorkflowStep, WorkflowSummary,
};
