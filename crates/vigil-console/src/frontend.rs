//! Line-oriented front end
//!
//! Parses operator input lines into [`Action`]s. This is the thinnest
//! possible interface over the bridge; anything richer (layout, keymaps)
//! belongs to a dedicated interface layer, not here.

use vigil_gateway::WorkflowHandle;

use crate::app::Action;

pub const HELP: &str = "\
Commands:
  workflows            list workflow instances
  scan                 run a vulnerability scan and show findings
  steps <handle>       show the steps of a workflow instance
  reports              list reports pending approval
  file <report-id>     start the issue workflow for a report
  approve | reject     decide the issue awaiting approval
  issues               list all issues
  show <issue-id>      show one issue
  quit                 exit";

/// Parse one input line into an action
///
/// Returns `None` for blank or unrecognized input.
pub fn parse_line(line: &str) -> Option<Action> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    let arg = parts.next();

    match (verb, arg) {
        ("workflows", None) => Some(Action::ListWorkflows),
        ("scan", None) => Some(Action::StartScan),
        ("steps", Some(handle)) => Some(Action::ShowSteps(WorkflowHandle::from(handle))),
        ("reports", None) => Some(Action::ListReports),
        ("file", Some(id)) => id.parse().ok().map(Action::FileIssue),
        ("approve", None) => Some(Action::Decide(true)),
        ("reject", None) => Some(Action::Decide(false)),
        ("issues", None) => Some(Action::ListIssues),
        ("show", Some(id)) => id.parse().ok().map(Action::ShowIssue),
        ("quit", None) | ("exit", None) => Some(Action::Quit),
        _ => None,
    }
}
