//! Workflow identity and listing types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier for a running workflow instance
///
/// Handles are minted by the engine at start time and are the only way to
/// address an instance afterwards (fetch its result, list its steps, or
/// deliver a signal). The engine remains the source of truth for the
/// instance's state; the console only holds the handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowHandle(String);

impl WorkflowHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkflowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkflowHandle {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Workflow types the console can start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Vulnerability scan; runs to completion on its own
    Scan,

    /// Issue filing; suspends awaiting a human approval signal
    Issue,
}

impl WorkflowKind {
    /// Stable engine-side name for this workflow type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan_workflow",
            Self::Issue => "issue_workflow",
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow instance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Instance created but its body has not run yet
    Pending,

    /// Body is executing
    Running,

    /// Body is suspended waiting for an external signal
    AwaitingSignal,

    /// Concluded successfully
    Completed,

    /// Concluded with an error
    Failed,
}

impl WorkflowStatus {
    /// Whether the instance has concluded
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::AwaitingSignal => write!(f, "awaiting_signal"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One row of a workflow listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: WorkflowHandle,
    pub kind: WorkflowKind,
    pub status: WorkflowStatus,
    pub started_at: DateTime<Utc>,
}

/// Status of a single step inside a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Running,
    Completed,
}

/// Ordered record of one unit of work performed inside a workflow
///
/// Steps are read-only from the console's perspective; the engine appends
/// them as the workflow body progresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub name: String,
    pub status: StepStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}
