//! Command factories
//!
//! A command is a deferred, no-argument unit of work: a boxed future bound
//! to its captured parameters. When polled it performs exactly one logical
//! blocking interaction with the gateway or store and resolves to exactly
//! one [`Message`] — success or failure, never zero, never more than one.
//! Commands never touch state owned by the event loop; every state
//! transition happens when the loop later processes the message.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::json;

use vigil_gateway::{WorkflowGateway, WorkflowHandle, WorkflowKind};
use vigil_store::ReportStore;

use crate::message::{CommandError, Message};

/// A deferred unit of work resolving to exactly one message
pub type Command = BoxFuture<'static, Message>;

/// List all workflow instances
pub fn list_workflows(gateway: Arc<dyn WorkflowGateway>) -> Command {
    async move {
        let result = gateway
            .list_workflows()
            .await
            .map_err(CommandError::ListWorkflows);
        Message::Workflows(result)
    }
    .boxed()
}

/// Start the scan workflow and wait for its findings
///
/// Unlike [`start_issue_workflow`], this command stays suspended until the
/// scan concludes and carries the final findings in its message.
pub fn start_scan(gateway: Arc<dyn WorkflowGateway>) -> Command {
    async move {
        let handle = match gateway
            .start_workflow(WorkflowKind::Scan, serde_json::Value::Null)
            .await
        {
            Ok(handle) => handle,
            Err(err) => return Message::ScanCompleted(Err(CommandError::StartScan(err))),
        };

        let result = match gateway.await_result(&handle).await {
            Ok(payload) => serde_json::from_value(payload)
                .map_err(|err| CommandError::ScanFailed(err.into())),
            Err(err) => Err(CommandError::ScanFailed(err)),
        };
        Message::ScanCompleted(result)
    }
    .boxed()
}

/// Fetch the step records of a workflow instance
pub fn workflow_steps(gateway: Arc<dyn WorkflowGateway>, handle: WorkflowHandle) -> Command {
    async move {
        let result = gateway
            .get_steps(&handle)
            .await
            .map_err(CommandError::GetSteps);
        Message::Steps(result)
    }
    .boxed()
}

/// List reports that still have no issue filed
pub fn pending_reports(store: Arc<dyn ReportStore>) -> Command {
    async move {
        let result = store
            .reports_pending_approval()
            .await
            .map_err(CommandError::ListReports);
        Message::PendingReports(result)
    }
    .boxed()
}

/// Start the issue workflow for a report
///
/// Returns as soon as the instance is durably started. The workflow
/// immediately suspends awaiting an approval signal, so no result is
/// awaited here; the handle in the message is what a later
/// [`send_issue_approval`] addresses.
pub fn start_issue_workflow(gateway: Arc<dyn WorkflowGateway>, report_id: i64) -> Command {
    async move {
        let result = gateway
            .start_workflow(WorkflowKind::Issue, json!({ "report_id": report_id }))
            .await
            .map_err(CommandError::StartIssue);
        Message::IssueWorkflowStarted(result)
    }
    .boxed()
}

/// Deliver the approval decision to a suspended issue workflow
///
/// Reports whether the signal was delivered, not whether the workflow
/// accepted or finished processing it.
pub fn send_issue_approval(
    gateway: Arc<dyn WorkflowGateway>,
    handle: WorkflowHandle,
    approved: bool,
) -> Command {
    async move {
        let decision = if approved { "approved" } else { "rejected" };

        let result = gateway
            .send_signal(&handle, decision, crate::workflows::ISSUE_APPROVAL)
            .await
            .map(|()| format!("Issue {decision}"))
            .map_err(CommandError::SendApproval);
        Message::ApprovalDelivered(result)
    }
    .boxed()
}

/// List every filed issue
pub fn list_issues(store: Arc<dyn ReportStore>) -> Command {
    async move {
        let result = store.all_issues().await.map_err(CommandError::ListIssues);
        Message::Issues(result)
    }
    .boxed()
}

/// Load a single issue by id
pub fn load_issue(store: Arc<dyn ReportStore>, issue_id: i64) -> Command {
    async move {
        let result = store
            .issue_by_id(issue_id)
            .await
            .map_err(CommandError::LoadIssue);
        Message::IssueLoaded(result)
    }
    .boxed()
}
