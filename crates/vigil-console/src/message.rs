//! Command outcome messages consumed by the event loop

use vigil_gateway::{GatewayError, WorkflowHandle, WorkflowStep, WorkflowSummary};
use vigil_store::{Issue, Report, StoreError};

/// Error carried inside a failure message
///
/// Each variant labels the operation that failed, the way the console
/// reports it to the operator, and wraps the underlying gateway or store
/// error as its source.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("error listing workflows: {0}")]
    ListWorkflows(#[source] GatewayError),

    #[error("failed to start scan workflow: {0}")]
    StartScan(#[source] GatewayError),

    #[error("scan workflow failed: {0}")]
    ScanFailed(#[source] GatewayError),

    #[error("error getting workflow steps: {0}")]
    GetSteps(#[source] GatewayError),

    #[error("error listing reports pending for approval: {0}")]
    ListReports(#[source] StoreError),

    #[error("failed to start issue workflow: {0}")]
    StartIssue(#[source] GatewayError),

    #[error("failed to send approval: {0}")]
    SendApproval(#[source] GatewayError),

    #[error("error listing issues: {0}")]
    ListIssues(#[source] StoreError),

    #[error("error loading issue: {0}")]
    LoadIssue(#[source] StoreError),
}

impl CommandError {
    /// Whether re-issuing the command could plausibly succeed
    ///
    /// A signal to a stale or unknown handle means the approval opportunity
    /// has lapsed; the event loop treats that as non-retryable.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::SendApproval(
                GatewayError::WorkflowNotFound(_) | GatewayError::WorkflowConcluded(_)
            )
        )
    }
}

/// Closed union of command outcomes
///
/// Every command resolves to exactly one of these; the event loop matches
/// exhaustively and consumes each message exactly once. Variants carry
/// enough identity (handle, ids inside payloads) to be applied correctly
/// regardless of arrival order.
#[derive(Debug)]
pub enum Message {
    /// Result of listing workflow instances
    Workflows(Result<Vec<WorkflowSummary>, CommandError>),

    /// Final findings of a scan workflow run
    ScanCompleted(Result<Vec<String>, CommandError>),

    /// Step records of the selected workflow
    Steps(Result<Vec<WorkflowStep>, CommandError>),

    /// Reports with no issue filed yet
    PendingReports(Result<Vec<Report>, CommandError>),

    /// Issue workflow durably started; no result awaited, the workflow is
    /// suspended until an approval signal arrives
    IssueWorkflowStarted(Result<WorkflowHandle, CommandError>),

    /// Approval signal delivered ("Issue approved" / "Issue rejected")
    ApprovalDelivered(Result<String, CommandError>),

    /// Result of listing all issues
    Issues(Result<Vec<Issue>, CommandError>),

    /// Single issue loaded by id
    IssueLoaded(Result<Issue, CommandError>),
}
