//! Event-loop model
//!
//! `App` is the single writer of all interface state. It turns user actions
//! into dispatched commands, consumes each command's one message on its own
//! turn, and decides which follow-up commands (if any) to issue. Commands
//! run as independent tokio tasks and may suspend on the gateway or store,
//! but the loop itself never blocks on them.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use vigil_gateway::{WorkflowGateway, WorkflowHandle, WorkflowSummary};
use vigil_store::{Issue, Report, ReportStore};

use crate::commands::{self, Command};
use crate::config::ConsoleConfig;
use crate::message::Message;
use crate::render::Renderer;

/// User intent surfaced by the front end
#[derive(Debug, Clone)]
pub enum Action {
    ListWorkflows,
    StartScan,
    ShowSteps(WorkflowHandle),
    ListReports,
    FileIssue(i64),
    /// Approve or reject the issue currently awaiting a decision
    Decide(bool),
    ListIssues,
    ShowIssue(i64),
    Quit,
}

/// The console model
pub struct App {
    gateway: Arc<dyn WorkflowGateway>,
    store: Arc<dyn ReportStore>,
    renderer: Arc<dyn Renderer>,
    width: usize,

    msg_tx: mpsc::UnboundedSender<Message>,
    msg_rx: mpsc::UnboundedReceiver<Message>,

    pub workflows: Vec<WorkflowSummary>,
    pub findings: Vec<String>,
    pub reports: Vec<Report>,
    pub issues: Vec<Issue>,
    pub selected_workflow: Option<WorkflowHandle>,
    pub selected_issue: Option<Issue>,
    /// Handle of the issue workflow waiting for the operator's decision
    pub awaiting_decision: Option<WorkflowHandle>,
    pub last_output: String,
}

impl App {
    pub fn new(
        gateway: Arc<dyn WorkflowGateway>,
        store: Arc<dyn ReportStore>,
        renderer: Arc<dyn Renderer>,
        config: &ConsoleConfig,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            store,
            renderer,
            width: config.width,
            msg_tx,
            msg_rx,
            workflows: Vec::new(),
            findings: Vec::new(),
            reports: Vec::new(),
            issues: Vec::new(),
            selected_workflow: None,
            selected_issue: None,
            awaiting_decision: None,
            last_output: String::new(),
        }
    }

    /// Spawn a command; its single message lands on this loop's channel
    pub fn dispatch(&self, command: Command) {
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let message = command.await;
            if tx.send(message).is_err() {
                warn!("event loop gone, dropping command message");
            }
        });
    }

    /// Receive the next completed command's message
    pub async fn next_message(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    /// Map a user action to a dispatched command
    ///
    /// Returns `false` when the action ends the session.
    pub fn handle_action(&mut self, action: Action) -> bool {
        debug!(?action, "handling action");
        match action {
            Action::ListWorkflows => {
                self.dispatch(commands::list_workflows(Arc::clone(&self.gateway)));
            }
            Action::StartScan => {
                self.show("Scan started, waiting for findings...");
                self.dispatch(commands::start_scan(Arc::clone(&self.gateway)));
            }
            Action::ShowSteps(handle) => {
                self.selected_workflow = Some(handle.clone());
                self.dispatch(commands::workflow_steps(Arc::clone(&self.gateway), handle));
            }
            Action::ListReports => {
                self.dispatch(commands::pending_reports(Arc::clone(&self.store)));
            }
            Action::FileIssue(report_id) => {
                self.dispatch(commands::start_issue_workflow(
                    Arc::clone(&self.gateway),
                    report_id,
                ));
            }
            Action::Decide(approved) => match self.awaiting_decision.take() {
                Some(handle) => {
                    self.dispatch(commands::send_issue_approval(
                        Arc::clone(&self.gateway),
                        handle,
                        approved,
                    ));
                }
                None => self.show("No issue is awaiting a decision."),
            },
            Action::ListIssues => {
                self.dispatch(commands::list_issues(Arc::clone(&self.store)));
            }
            Action::ShowIssue(issue_id) => {
                self.dispatch(commands::load_issue(Arc::clone(&self.store), issue_id));
            }
            Action::Quit => return false,
        }
        true
    }

    /// Apply one message to the model
    ///
    /// Exhaustive over the message union; every command outcome, success or
    /// failure, passes through here exactly once.
    pub fn process(&mut self, message: Message) {
        match message {
            Message::Workflows(Ok(workflows)) => {
                self.workflows = workflows;
                let mut text = String::from("# Workflows\n");
                for wf in &self.workflows {
                    text.push_str(&format!("- {} {} ({})\n", wf.id, wf.kind, wf.status));
                }
                self.show(&text);
            }
            Message::ScanCompleted(Ok(findings)) => {
                self.findings = findings;
                let mut text = String::from("# Scan findings\n");
                if self.findings.is_empty() {
                    text.push_str("- nothing found\n");
                }
                for finding in &self.findings {
                    text.push_str(&format!("- {finding}\n"));
                }
                self.show(&text);
            }
            Message::Steps(Ok(steps)) => {
                let mut text = String::from("# Workflow steps\n");
                for step in &steps {
                    text.push_str(&format!("- {} [{:?}]\n", step.name, step.status));
                }
                self.show(&text);
            }
            Message::PendingReports(Ok(reports)) => {
                self.reports = reports;
                let mut text = String::from("# Reports pending approval\n");
                for report in &self.reports {
                    text.push_str(&format!(
                        "- #{} [{}] {}\n",
                        report.id, report.severity, report.title
                    ));
                }
                self.show(&text);
            }
            Message::IssueWorkflowStarted(Ok(handle)) => {
                self.awaiting_decision = Some(handle.clone());
                self.show(&format!(
                    "Issue workflow started: {handle}\nApprove issue? (approve/reject)"
                ));
            }
            Message::ApprovalDelivered(Ok(confirmation)) => {
                self.show(&confirmation);
            }
            Message::Issues(Ok(issues)) => {
                self.issues = issues;
                let mut text = String::from("# Issues\n");
                for issue in &self.issues {
                    text.push_str(&format!(
                        "- #{} [{}] {}\n",
                        issue.id, issue.status, issue.title
                    ));
                }
                self.show(&text);
            }
            Message::IssueLoaded(Ok(issue)) => {
                let text = format!("# {}\n\n{}\n\nstatus: {}", issue.title, issue.body, issue.status);
                self.selected_issue = Some(issue);
                self.show(&text);
            }
            Message::Workflows(Err(err))
            | Message::ScanCompleted(Err(err))
            | Message::Steps(Err(err))
            | Message::PendingReports(Err(err))
            | Message::IssueWorkflowStarted(Err(err))
            | Message::ApprovalDelivered(Err(err))
            | Message::Issues(Err(err))
            | Message::IssueLoaded(Err(err)) => {
                warn!(error = %err, retryable = err.is_retryable(), "command failed");
                self.show(&err.to_string());
            }
        }
    }

    /// Run the loop until the action stream ends or the operator quits
    pub async fn run(mut self, mut actions: mpsc::UnboundedReceiver<Action>) {
        loop {
            tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => {
                        if !self.handle_action(action) {
                            break;
                        }
                    }
                    None => break,
                },
                Some(message) = self.msg_rx.recv() => self.process(message),
            }
        }
    }

    // Rendering failure only degrades presentation; the raw text still goes out
    fn show(&mut self, text: &str) {
        let rendered = match self.renderer.render(text, self.width) {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(error = %err, "renderer failed, falling back to raw text");
                text.to_string()
            }
        };
        println!("{rendered}");
        self.last_output = rendered;
    }
}
