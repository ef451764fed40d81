//! Scan and issue workflow definitions
//!
//! These are the two workflow bodies the console registers with the engine.
//! The scan runs to completion on its own; the issue workflow files an
//! issue and suspends until a human decision arrives as a signal.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use vigil_gateway::{InMemoryEngine, WorkflowKind};
use vigil_store::{IssueStatus, ReportStore};

/// Topic carrying approval decisions to a suspended issue workflow
pub const ISSUE_APPROVAL: &str = "ISSUE_APPROVAL";

#[derive(Debug, Deserialize)]
struct IssueWorkflowInput {
    report_id: i64,
}

/// Register both workflow bodies on the engine
pub fn register_workflows(engine: &InMemoryEngine, store: Arc<dyn ReportStore>) {
    let scan_store = Arc::clone(&store);
    engine.register(WorkflowKind::Scan, move |ctx, _input| {
        let store = Arc::clone(&scan_store);
        async move {
            let reports = ctx
                .run_step("collect findings", store.reports_pending_approval())
                .await
                .map_err(|err| err.to_string())?;

            let findings = ctx
                .run_step("summarize findings", async {
                    reports
                        .iter()
                        .map(|report| format!("[{}] {}", report.severity, report.title))
                        .collect::<Vec<_>>()
                })
                .await;

            info!(count = findings.len(), "scan concluded");
            Ok(json!(findings))
        }
    });

    engine.register(WorkflowKind::Issue, move |mut ctx, input| {
        let store = Arc::clone(&store);
        async move {
            let input: IssueWorkflowInput =
                serde_json::from_value(input).map_err(|err| err.to_string())?;

            let report = ctx
                .run_step("load report", store.report_by_id(input.report_id))
                .await
                .map_err(|err| err.to_string())?;

            let issue = ctx
                .run_step(
                    "file issue",
                    store.create_issue(report.id, &report.title, &report.body),
                )
                .await
                .map_err(|err| err.to_string())?;

            info!(issue_id = issue.id, report_id = report.id, "awaiting approval");
            let decision = ctx
                .recv_signal(ISSUE_APPROVAL)
                .await
                .ok_or_else(|| "approval signal channel closed".to_string())?;

            let status = match decision.as_str() {
                "approved" => IssueStatus::Approved,
                _ => IssueStatus::Rejected,
            };
            ctx.run_step(
                "record decision",
                store.set_issue_status(issue.id, status),
            )
            .await
            .map_err(|err| err.to_string())?;

            info!(issue_id = issue.id, status = %status, "issue decision recorded");
            Ok(json!(decision))
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_gateway::WorkflowGateway;
    use vigil_store::{InMemoryStore, NewReport};

    async fn seeded_store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store
            .add_report(NewReport {
                title: "Outdated TLS on edge".to_string(),
                severity: "medium".to_string(),
                body: "# Outdated TLS\n\nupgrade required".to_string(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_scan_reports_pending_findings() {
        let store = seeded_store().await;
        let engine = InMemoryEngine::new();
        register_workflows(&engine, store);

        let handle = engine
            .start_workflow(WorkflowKind::Scan, serde_json::Value::Null)
            .await
            .unwrap();
        let result = engine.await_result(&handle).await.unwrap();

        let findings: Vec<String> = serde_json::from_value(result).unwrap();
        assert_eq!(findings, vec!["[medium] Outdated TLS on edge"]);
    }

    #[tokio::test]
    async fn test_issue_workflow_persists_decision() {
        let store = seeded_store().await;
        let engine = InMemoryEngine::new();
        register_workflows(&engine, Arc::clone(&store) as Arc<dyn ReportStore>);

        let handle = engine
            .start_workflow(WorkflowKind::Issue, json!({ "report_id": 1 }))
            .await
            .unwrap();

        // The workflow suspends after filing; issue exists before any decision
        tokio::task::yield_now().await;

        engine
            .send_signal(&handle, "rejected", ISSUE_APPROVAL)
            .await
            .unwrap();
        engine.await_result(&handle).await.unwrap();

        let issues = store.all_issues().await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].status, IssueStatus::Rejected);
    }

    #[tokio::test]
    async fn test_issue_workflow_unknown_report_fails() {
        let store = seeded_store().await;
        let engine = InMemoryEngine::new();
        register_workflows(&engine, store);

        let handle = engine
            .start_workflow(WorkflowKind::Issue, json!({ "report_id": 99 }))
            .await
            .unwrap();
        let err = engine.await_result(&handle).await.unwrap_err();

        assert!(err.to_string().contains("report not found"));
    }
}
