//! # Report/Issue Store Accessor
//!
//! Read-mostly accessor over persisted scan reports and filed issues. The
//! console lists reports awaiting a decision and browses issues; the issue
//! workflow persists the issue it files and the eventual approval decision.

mod memory;
mod models;
mod store;

pub use memory::InMemoryStore;
pub use models::{Issue, IssueStatus, NewReport, Report};
pub use store::{ReportStore, StoreError};
