//! WorkflowGateway trait definition

use async_trait::async_trait;

use crate::types::{WorkflowHandle, WorkflowKind, WorkflowStep, WorkflowSummary};

/// Error type for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No instance exists for the handle
    #[error("workflow not found: {0}")]
    WorkflowNotFound(WorkflowHandle),

    /// The instance exists but has already concluded; signals can no longer
    /// be delivered to it
    #[error("workflow already concluded: {0}")]
    WorkflowConcluded(WorkflowHandle),

    /// The workflow body concluded with an error
    #[error("workflow failed: {0}")]
    WorkflowFailed(String),

    /// Engine-level failure (connectivity, rejection, unregistered type)
    #[error("engine error: {0}")]
    Engine(String),

    /// Payload could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Facade over the durable workflow engine
///
/// The console is written entirely against this trait. Implementations must
/// be callable from concurrently running command tasks; none of the methods
/// may block the caller beyond the semantics documented per method.
#[async_trait]
pub trait WorkflowGateway: Send + Sync {
    /// Start a durable workflow instance
    ///
    /// Returns as soon as the instance is durably started. Never waits for
    /// the workflow to make progress or complete.
    async fn start_workflow(
        &self,
        kind: WorkflowKind,
        input: serde_json::Value,
    ) -> Result<WorkflowHandle, GatewayError>;

    /// Wait for an instance to conclude and return its final payload
    ///
    /// Suspends the calling task (never the event loop) until the workflow
    /// reaches a terminal state. A failed workflow surfaces as
    /// [`GatewayError::WorkflowFailed`].
    async fn await_result(&self, handle: &WorkflowHandle)
        -> Result<serde_json::Value, GatewayError>;

    /// List known workflow instances in start order
    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, GatewayError>;

    /// Fetch the ordered step records of an instance
    async fn get_steps(&self, handle: &WorkflowHandle) -> Result<Vec<WorkflowStep>, GatewayError>;

    /// Deliver an asynchronous signal to a running instance
    ///
    /// Fails with [`GatewayError::WorkflowNotFound`] for an unknown handle
    /// and [`GatewayError::WorkflowConcluded`] once the instance has
    /// finished. Delivery says nothing about whether the workflow accepted
    /// or finished processing the signal.
    async fn send_signal(
        &self,
        handle: &WorkflowHandle,
        payload: &str,
        topic: &str,
    ) -> Result<(), GatewayError>;
}
