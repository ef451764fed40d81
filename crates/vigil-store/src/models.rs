//! Report and issue entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed scan finding awaiting a decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub severity: String,
    /// Finding body, markdown
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for seeding a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub severity: String,
    pub body: String,
}

/// Issue lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Created inside a running issue workflow, decision outstanding
    PendingApproval,
    Approved,
    Rejected,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PendingApproval => write!(f, "pending_approval"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A filed issue tied to a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub report_id: i64,
    pub title: String,
    /// Issue body, markdown
    pub body: String,
    pub status: IssueStatus,
    pub created_at: DateTime<Utc>,
}
