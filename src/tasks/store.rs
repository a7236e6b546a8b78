//! Task lifecycle store — the client's view of server-side jobs.
//!
//! All lifecycle commands are fire-and-reconcile, never optimistic: a
//! command only triggers the server-side transition, and the local
//! collection is refreshed by a delayed full fetch. The only source of
//! truth for a task's status is the most recent successful fetch.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::api::JobApi;
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::tasks::{NewTask, Task, TaskStatus, TaskType};

/// Holds the task collection and issues lifecycle commands.
pub struct TaskStore {
    api: Arc<dyn JobApi>,
    notifier: Arc<dyn Notifier>,
    reconcile_delay: Duration,
    tasks: Arc<RwLock<Vec<Task>>>,
    loading: Arc<AtomicBool>,
}

impl TaskStore {
    pub fn new(
        api: Arc<dyn JobApi>,
        notifier: Arc<dyn Notifier>,
        reconcile_delay: Duration,
    ) -> Self {
        Self {
            api,
            notifier,
            reconcile_delay,
            tasks: Arc::new(RwLock::new(Vec::new())),
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Snapshot of the full collection.
    pub async fn tasks(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Tasks still waiting to be picked up.
    pub async fn pending_tasks(&self) -> Vec<Task> {
        self.filtered(|t| t.status == TaskStatus::Pending).await
    }

    /// Tasks currently being worked on.
    pub async fn processing_tasks(&self) -> Vec<Task> {
        self.filtered(|t| t.status == TaskStatus::Processing).await
    }

    /// Tasks that reached a terminal state, successful or not.
    pub async fn finished_tasks(&self) -> Vec<Task> {
        self.filtered(|t| t.status.is_finished()).await
    }

    async fn filtered(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .filter(|t| predicate(t))
            .cloned()
            .collect()
    }

    /// Fetch the full collection, optionally filtered server-side.
    ///
    /// Replaces the local collection wholesale on success; on failure the
    /// collection is left unchanged and the error is re-raised.
    pub async fn fetch_tasks(&self, filter: Option<TaskStatus>) -> Result<(), ApiError> {
        refresh(self.api.as_ref(), &self.tasks, &self.loading, filter).await
    }

    /// Submit a new task. Returns the server's representation; does not
    /// refresh the local collection.
    pub async fn create_task(
        &self,
        source_path: impl Into<String>,
        task_type: TaskType,
        auto_classify: bool,
    ) -> Result<Task, ApiError> {
        let new_task = NewTask {
            source_path: source_path.into(),
            task_type,
            auto_classify,
        };
        self.api.create_task(&new_task).await.map_err(|e| {
            tracing::error!("Failed to create task: {e}");
            e
        })
    }

    /// Pause a task, then reconcile after the configured delay.
    pub async fn pause_task(&self, id: &str) -> Result<JoinHandle<()>, ApiError> {
        self.lifecycle_command(self.api.pause_task(id), "Task paused", "pause")
            .await
    }

    /// Resume a paused task, then reconcile after the configured delay.
    pub async fn resume_task(&self, id: &str) -> Result<JoinHandle<()>, ApiError> {
        self.lifecycle_command(self.api.resume_task(id), "Task resumed", "resume")
            .await
    }

    /// Cancel a task, then reconcile after the configured delay.
    pub async fn cancel_task(&self, id: &str) -> Result<JoinHandle<()>, ApiError> {
        self.lifecycle_command(self.api.cancel_task(id), "Task cancelled", "cancel")
            .await
    }

    /// Run one lifecycle command. On success, notify and schedule the
    /// reconciliation fetch; on failure, notify with the server detail
    /// and re-raise so the caller can still branch on it.
    async fn lifecycle_command(
        &self,
        command: impl Future<Output = Result<(), ApiError>>,
        success_message: &str,
        action: &str,
    ) -> Result<JoinHandle<()>, ApiError> {
        match command.await {
            Ok(()) => {
                self.notifier.success(success_message);
                Ok(self.schedule_reconcile())
            }
            Err(e) => {
                tracing::error!("Failed to {action} task: {e}");
                self.notifier
                    .error(&format!("Failed to {action} task: {}", e.user_detail()));
                Err(e)
            }
        }
    }

    /// Schedule the post-command re-fetch. The delay tolerates the
    /// server applying the command asynchronously; an immediate fetch
    /// would often still see the old status.
    fn schedule_reconcile(&self) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let tasks = Arc::clone(&self.tasks);
        let loading = Arc::clone(&self.loading);
        let delay = self.reconcile_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = refresh(api.as_ref(), &tasks, &loading, None).await {
                tracing::warn!("Reconciliation fetch failed: {e}");
            }
        })
    }
}

/// One fetch cycle with the loading flag held for its duration. The flag
/// is cleared before the result is inspected, on success and failure alike.
async fn refresh(
    api: &dyn JobApi,
    tasks: &RwLock<Vec<Task>>,
    loading: &AtomicBool,
    filter: Option<TaskStatus>,
) -> Result<(), ApiError> {
    loading.store(true, Ordering::SeqCst);
    let result = api.list_tasks(filter).await;
    loading.store(false, Ordering::SeqCst);

    match result {
        Ok(list) => {
            *tasks.write().await = list;
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to fetch tasks: {e}");
            Err(e)
        }
    }
}
