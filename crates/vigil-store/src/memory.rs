//! In-memory implementation of ReportStore

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::models::{Issue, IssueStatus, NewReport, Report};
use crate::store::{ReportStore, StoreError};

#[derive(Default)]
struct Inner {
    // Vecs keep creation order, so repeated listings are stable
    reports: Vec<Report>,
    issues: Vec<Issue>,
    next_report_id: i64,
    next_issue_id: i64,
}

/// In-memory report/issue store
///
/// Provides the same semantics a database-backed accessor would, with
/// creation-ordered listings.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_count(&self) -> usize {
        self.inner.read().reports.len()
    }

    pub fn issue_count(&self) -> usize {
        self.inner.read().issues.len()
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn reports_pending_approval(&self) -> Result<Vec<Report>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .reports
            .iter()
            .filter(|report| !inner.issues.iter().any(|issue| issue.report_id == report.id))
            .cloned()
            .collect())
    }

    async fn report_by_id(&self, id: i64) -> Result<Report, StoreError> {
        self.inner
            .read()
            .reports
            .iter()
            .find(|report| report.id == id)
            .cloned()
            .ok_or(StoreError::ReportNotFound(id))
    }

    async fn all_issues(&self) -> Result<Vec<Issue>, StoreError> {
        Ok(self.inner.read().issues.clone())
    }

    async fn issue_by_id(&self, id: i64) -> Result<Issue, StoreError> {
        self.inner
            .read()
            .issues
            .iter()
            .find(|issue| issue.id == id)
            .cloned()
            .ok_or(StoreError::IssueNotFound(id))
    }

    async fn create_issue(
        &self,
        report_id: i64,
        title: &str,
        body: &str,
    ) -> Result<Issue, StoreError> {
        let mut inner = self.inner.write();
        if !inner.reports.iter().any(|report| report.id == report_id) {
            return Err(StoreError::ReportNotFound(report_id));
        }
        inner.next_issue_id += 1;
        let issue = Issue {
            id: inner.next_issue_id,
            report_id,
            title: title.to_string(),
            body: body.to_string(),
            status: IssueStatus::PendingApproval,
            created_at: Utc::now(),
        };
        inner.issues.push(issue.clone());
        debug!(issue_id = issue.id, report_id, "issue created");
        Ok(issue)
    }

    async fn set_issue_status(&self, id: i64, status: IssueStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let issue = inner
            .issues
            .iter_mut()
            .find(|issue| issue.id == id)
            .ok_or(StoreError::IssueNotFound(id))?;
        issue.status = status;
        debug!(issue_id = id, status = %status, "issue status updated");
        Ok(())
    }

    async fn add_report(&self, report: NewReport) -> Result<Report, StoreError> {
        let mut inner = self.inner.write();
        inner.next_report_id += 1;
        let report = Report {
            id: inner.next_report_id,
            title: report.title,
            severity: report.severity,
            body: report.body,
            created_at: Utc::now(),
        };
        inner.reports.push(report.clone());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(title: &str) -> NewReport {
        NewReport {
            title: title.to_string(),
            severity: "high".to_string(),
            body: format!("# {title}\n\ndetails"),
        }
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = InMemoryStore::new();

        assert!(store.reports_pending_approval().await.unwrap().is_empty());
        assert!(store.all_issues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_pending_until_issue_filed() {
        let store = InMemoryStore::new();
        let report = store.add_report(sample_report("SQLi in login")).await.unwrap();

        let pending = store.reports_pending_approval().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, report.id);

        store
            .create_issue(report.id, &report.title, &report.body)
            .await
            .unwrap();

        assert!(store.reports_pending_approval().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_issue_lifecycle() {
        let store = InMemoryStore::new();
        let report = store.add_report(sample_report("XSS in search")).await.unwrap();
        let issue = store
            .create_issue(report.id, &report.title, &report.body)
            .await
            .unwrap();

        assert_eq!(issue.status, IssueStatus::PendingApproval);

        store
            .set_issue_status(issue.id, IssueStatus::Approved)
            .await
            .unwrap();
        let loaded = store.issue_by_id(issue.id).await.unwrap();
        assert_eq!(loaded.status, IssueStatus::Approved);
    }

    #[tokio::test]
    async fn test_missing_lookups_fail() {
        let store = InMemoryStore::new();

        assert!(matches!(
            store.report_by_id(7).await.unwrap_err(),
            StoreError::ReportNotFound(7)
        ));
        assert!(matches!(
            store.issue_by_id(7).await.unwrap_err(),
            StoreError::IssueNotFound(7)
        ));
        assert!(matches!(
            store.create_issue(7, "t", "b").await.unwrap_err(),
            StoreError::ReportNotFound(7)
        ));
    }

    #[tokio::test]
    async fn test_listings_are_creation_ordered() {
        let store = InMemoryStore::new();
        let first = store.add_report(sample_report("first")).await.unwrap();
        let second = store.add_report(sample_report("second")).await.unwrap();

        let a = store.reports_pending_approval().await.unwrap();
        let b = store.reports_pending_approval().await.unwrap();

        assert_eq!(a[0].id, first.id);
        assert_eq!(a[1].id, second.id);
        assert_eq!(
            a.iter().map(|r| r.id).collect::<Vec<_>>(),
            b.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }
}
