//! ReportStore trait definition

use async_trait::async_trait;

use crate::models::{Issue, IssueStatus, NewReport, Report};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Report not found
    #[error("report not found: {0}")]
    ReportNotFound(i64),

    /// Issue not found
    #[error("issue not found: {0}")]
    IssueNotFound(i64),

    /// Backend error
    #[error("store error: {0}")]
    Backend(String),
}

/// Accessor over persisted reports and issues
///
/// The console only reads through this trait; the write side is consumed by
/// the issue workflow, which persists the issue it files and the eventual
/// approval decision.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Reports with no issue filed yet, in creation order
    async fn reports_pending_approval(&self) -> Result<Vec<Report>, StoreError>;

    async fn report_by_id(&self, id: i64) -> Result<Report, StoreError>;

    /// All issues, in creation order
    async fn all_issues(&self) -> Result<Vec<Issue>, StoreError>;

    async fn issue_by_id(&self, id: i64) -> Result<Issue, StoreError>;

    /// Persist a new issue in `PendingApproval` state
    async fn create_issue(
        &self,
        report_id: i64,
        title: &str,
        body: &str,
    ) -> Result<Issue, StoreError>;

    /// Record the approval decision for an issue
    async fn set_issue_status(&self, id: i64, status: IssueStatus) -> Result<(), StoreError>;

    /// Seed a report (scan ingestion path)
    async fn add_report(&self, report: NewReport) -> Result<Report, StoreError>;
}
