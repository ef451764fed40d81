//! In-memory implementation of WorkflowGateway for local mode and testing

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::gateway::{GatewayError, WorkflowGateway};
use crate::types::{
    StepStatus, WorkflowHandle, WorkflowKind, WorkflowStatus, WorkflowStep, WorkflowSummary,
};

/// Terminal outcome of a workflow body
type Outcome = Result<serde_json::Value, String>;

/// Registered workflow body
///
/// Bodies receive a [`WorkflowContext`] for step recording and signal
/// receipt, plus the start input. They run on the tokio runtime as their
/// own task; suspending inside a body never blocks the caller of
/// `start_workflow`.
pub type WorkflowFn =
    Arc<dyn Fn(WorkflowContext, serde_json::Value) -> BoxFuture<'static, Outcome> + Send + Sync>;

struct Signal {
    topic: String,
    payload: String,
}

/// Internal instance state
struct Instance {
    kind: WorkflowKind,
    status: WorkflowStatus,
    started_at: chrono::DateTime<Utc>,
    steps: Vec<WorkflowStep>,
    signal_tx: mpsc::UnboundedSender<Signal>,
    done_rx: watch::Receiver<Option<Outcome>>,
}

#[derive(Default)]
struct Instances {
    by_id: HashMap<WorkflowHandle, Instance>,
    // Start order, so listings are stable between mutations
    order: Vec<WorkflowHandle>,
}

#[derive(Default)]
struct Shared {
    instances: RwLock<Instances>,
}

impl Shared {
    fn set_status(&self, handle: &WorkflowHandle, status: WorkflowStatus) {
        if let Some(inst) = self.instances.write().by_id.get_mut(handle) {
            inst.status = status;
        }
    }

    fn begin_step(&self, handle: &WorkflowHandle, name: &str) -> Option<usize> {
        let mut instances = self.instances.write();
        let inst = instances.by_id.get_mut(handle)?;
        inst.steps.push(WorkflowStep {
            name: name.to_string(),
            status: StepStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
        });
        Some(inst.steps.len() - 1)
    }

    fn finish_step(&self, handle: &WorkflowHandle, index: usize) {
        let mut instances = self.instances.write();
        if let Some(step) = instances
            .by_id
            .get_mut(handle)
            .and_then(|inst| inst.steps.get_mut(index))
        {
            step.status = StepStatus::Completed;
            step.finished_at = Some(Utc::now());
        }
    }
}

/// Execution context handed to a workflow body
pub struct WorkflowContext {
    shared: Arc<Shared>,
    handle: WorkflowHandle,
    signals: mpsc::UnboundedReceiver<Signal>,
}

impl WorkflowContext {
    /// Handle of the instance this body runs as
    pub fn handle(&self) -> &WorkflowHandle {
        &self.handle
    }

    /// Run one unit of work, recording it as a step
    pub async fn run_step<T, F>(&self, name: &str, work: F) -> T
    where
        F: Future<Output = T>,
    {
        let index = self.shared.begin_step(&self.handle, name);
        let out = work.await;
        if let Some(index) = index {
            self.shared.finish_step(&self.handle, index);
        }
        out
    }

    /// Suspend until a signal arrives on `topic`
    ///
    /// The instance reports `awaiting_signal` while suspended. Signals on
    /// other topics are dropped. Returns `None` if the engine went away.
    pub async fn recv_signal(&mut self, topic: &str) -> Option<String> {
        self.shared
            .set_status(&self.handle, WorkflowStatus::AwaitingSignal);
        loop {
            match self.signals.recv().await {
                Some(signal) if signal.topic == topic => {
                    self.shared.set_status(&self.handle, WorkflowStatus::Running);
                    return Some(signal.payload);
                }
                Some(signal) => {
                    warn!(
                        handle = %self.handle,
                        topic = %signal.topic,
                        expected = topic,
                        "dropping signal on unexpected topic"
                    );
                }
                None => return None,
            }
        }
    }
}

/// In-memory workflow engine
///
/// Runs registered workflow bodies as tokio tasks and provides the same
/// gateway semantics a remote engine would: starting returns immediately,
/// results are awaited separately, and signals are routed to a specific
/// running instance.
///
/// # Example
///
/// ```ignore
/// let engine = Arc::new(InMemoryEngine::new());
/// engine.register(WorkflowKind::Scan, |ctx, _input| async move {
///     ctx.run_step("scan", async { /* ... */ }).await;
///     Ok(serde_json::json!([]))
/// });
/// let handle = engine.start_workflow(WorkflowKind::Scan, serde_json::Value::Null).await?;
/// ```
pub struct InMemoryEngine {
    shared: Arc<Shared>,
    behaviors: RwLock<HashMap<WorkflowKind, WorkflowFn>>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            behaviors: RwLock::new(HashMap::new()),
        }
    }

    /// Register the body executed for a workflow kind
    ///
    /// Later registrations for the same kind replace earlier ones.
    pub fn register<F, Fut>(&self, kind: WorkflowKind, body: F)
    where
        F: Fn(WorkflowContext, serde_json::Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        info!(workflow_type = %kind, "registered workflow type");
        self.behaviors
            .write()
            .insert(kind, Arc::new(move |ctx, input| Box::pin(body(ctx, input))));
    }

    /// Number of known instances
    pub fn workflow_count(&self) -> usize {
        self.shared.instances.read().by_id.len()
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowGateway for InMemoryEngine {
    #[instrument(skip_all, fields(kind = %kind))]
    async fn start_workflow(
        &self,
        kind: WorkflowKind,
        input: serde_json::Value,
    ) -> Result<WorkflowHandle, GatewayError> {
        let body = self
            .behaviors
            .read()
            .get(&kind)
            .cloned()
            .ok_or_else(|| GatewayError::Engine(format!("no workflow registered for {kind}")))?;

        let handle = WorkflowHandle::new(Uuid::now_v7().to_string());
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = watch::channel(None);

        {
            let mut instances = self.shared.instances.write();
            instances.by_id.insert(
                handle.clone(),
                Instance {
                    kind,
                    status: WorkflowStatus::Pending,
                    started_at: Utc::now(),
                    steps: Vec::new(),
                    signal_tx,
                    done_rx,
                },
            );
            instances.order.push(handle.clone());
        }

        info!(%handle, "starting new workflow");

        let ctx = WorkflowContext {
            shared: Arc::clone(&self.shared),
            handle: handle.clone(),
            signals: signal_rx,
        };
        let shared = Arc::clone(&self.shared);
        let task_handle = handle.clone();
        tokio::spawn(async move {
            shared.set_status(&task_handle, WorkflowStatus::Running);
            let outcome = body(ctx, input).await;
            let status = match &outcome {
                Ok(_) => WorkflowStatus::Completed,
                Err(err) => {
                    warn!(handle = %task_handle, error = %err, "workflow failed");
                    WorkflowStatus::Failed
                }
            };
            shared.set_status(&task_handle, status);
            // Receivers observe the last value even after the sender drops
            let _ = done_tx.send(Some(outcome));
            debug!(handle = %task_handle, status = %status, "workflow concluded");
        });

        Ok(handle)
    }

    async fn await_result(
        &self,
        handle: &WorkflowHandle,
    ) -> Result<serde_json::Value, GatewayError> {
        let mut done_rx = {
            let instances = self.shared.instances.read();
            instances
                .by_id
                .get(handle)
                .ok_or_else(|| GatewayError::WorkflowNotFound(handle.clone()))?
                .done_rx
                .clone()
        };

        let outcome = done_rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| GatewayError::Engine("engine shut down".to_string()))?
            .clone();

        match outcome {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) => Err(GatewayError::WorkflowFailed(err)),
            None => Err(GatewayError::Engine("missing workflow outcome".to_string())),
        }
    }

    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, GatewayError> {
        let instances = self.shared.instances.read();
        Ok(instances
            .order
            .iter()
            .filter_map(|id| {
                instances.by_id.get(id).map(|inst| WorkflowSummary {
                    id: id.clone(),
                    kind: inst.kind,
                    status: inst.status,
                    started_at: inst.started_at,
                })
            })
            .collect())
    }

    async fn get_steps(&self, handle: &WorkflowHandle) -> Result<Vec<WorkflowStep>, GatewayError> {
        let instances = self.shared.instances.read();
        instances
            .by_id
            .get(handle)
            .map(|inst| inst.steps.clone())
            .ok_or_else(|| GatewayError::WorkflowNotFound(handle.clone()))
    }

    #[instrument(skip_all, fields(handle = %handle, topic))]
    async fn send_signal(
        &self,
        handle: &WorkflowHandle,
        payload: &str,
        topic: &str,
    ) -> Result<(), GatewayError> {
        let signal_tx = {
            let instances = self.shared.instances.read();
            let inst = instances
                .by_id
                .get(handle)
                .ok_or_else(|| GatewayError::WorkflowNotFound(handle.clone()))?;
            if inst.status.is_terminal() {
                return Err(GatewayError::WorkflowConcluded(handle.clone()));
            }
            inst.signal_tx.clone()
        };

        signal_tx
            .send(Signal {
                topic: topic.to_string(),
                payload: payload.to_string(),
            })
            // Mailbox closed means the body finished between the status
            // check and the send
            .map_err(|_| GatewayError::WorkflowConcluded(handle.clone()))?;

        debug!(%handle, topic, "signal delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine_with_echo() -> InMemoryEngine {
        let engine = InMemoryEngine::new();
        engine.register(WorkflowKind::Scan, |ctx, input| async move {
            ctx.run_step("echo", async {}).await;
            Ok(input)
        });
        engine
    }

    #[tokio::test]
    async fn test_start_and_await_result() {
        let engine = engine_with_echo();

        let handle = engine
            .start_workflow(WorkflowKind::Scan, json!(["a", "b"]))
            .await
            .unwrap();
        let result = engine.await_result(&handle).await.unwrap();

        assert_eq!(result, json!(["a", "b"]));

        let steps = engine.get_steps(&handle).await.unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "echo");
        assert_eq!(steps[0].status, StepStatus::Completed);
        assert!(steps[0].finished_at.is_some());
    }

    #[tokio::test]
    async fn test_failed_workflow_surfaces_error() {
        let engine = InMemoryEngine::new();
        engine.register(WorkflowKind::Scan, |_ctx, _input| async move {
            Err("boom".to_string())
        });

        let handle = engine
            .start_workflow(WorkflowKind::Scan, json!(null))
            .await
            .unwrap();
        let err = engine.await_result(&handle).await.unwrap_err();

        assert!(matches!(err, GatewayError::WorkflowFailed(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_unregistered_kind_rejected() {
        let engine = InMemoryEngine::new();
        let err = engine
            .start_workflow(WorkflowKind::Issue, json!(null))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Engine(_)));
    }

    #[tokio::test]
    async fn test_signal_resumes_suspended_workflow() {
        let engine = InMemoryEngine::new();
        engine.register(WorkflowKind::Issue, |mut ctx, _input| async move {
            match ctx.recv_signal("APPROVAL").await {
                Some(decision) => Ok(json!(decision)),
                None => Err("signal channel closed".to_string()),
            }
        });

        let handle = engine
            .start_workflow(WorkflowKind::Issue, json!(null))
            .await
            .unwrap();

        // Give the body a chance to reach the suspension point
        tokio::task::yield_now().await;

        engine
            .send_signal(&handle, "approved", "APPROVAL")
            .await
            .unwrap();
        let result = engine.await_result(&handle).await.unwrap();
        assert_eq!(result, json!("approved"));
    }

    #[tokio::test]
    async fn test_signal_to_unknown_handle_fails() {
        let engine = InMemoryEngine::new();
        let missing = WorkflowHandle::from("wf-missing");

        let err = engine
            .send_signal(&missing, "approved", "APPROVAL")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::WorkflowNotFound(h) if h == missing));
    }

    #[tokio::test]
    async fn test_signal_after_conclusion_fails() {
        let engine = engine_with_echo();

        let handle = engine
            .start_workflow(WorkflowKind::Scan, json!(null))
            .await
            .unwrap();
        engine.await_result(&handle).await.unwrap();

        let err = engine
            .send_signal(&handle, "approved", "APPROVAL")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::WorkflowConcluded(_)));
    }

    #[tokio::test]
    async fn test_listing_is_start_ordered_and_stable() {
        let engine = engine_with_echo();

        let first = engine
            .start_workflow(WorkflowKind::Scan, json!(1))
            .await
            .unwrap();
        let second = engine
            .start_workflow(WorkflowKind::Scan, json!(2))
            .await
            .unwrap();
        engine.await_result(&first).await.unwrap();
        engine.await_result(&second).await.unwrap();

        let a = engine.list_workflows().await.unwrap();
        let b = engine.list_workflows().await.unwrap();

        assert_eq!(a.len(), 2);
        assert_eq!(a[0].id, first);
        assert_eq!(a[1].id, second);
        assert_eq!(
            a.iter().map(|w| w.id.clone()).collect::<Vec<_>>(),
            b.iter().map(|w| w.id.clone()).collect::<Vec<_>>()
        );
    }
}
