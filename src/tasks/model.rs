//! Task data model — background processing jobs tracked by the client.

use serde::{Deserialize, Serialize};

/// Status of a background task.
///
/// Transitions are server-driven; the client only ever reads these four
/// values back from a fetch and never mutates a status locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Queued, not yet picked up by the engine.
    Pending,
    /// Currently being worked on.
    Processing,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl TaskStatus {
    /// Whether the task has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Wire value, used as the `status` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of processing a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Extract an archive.
    Extract,
    /// Run the content filter.
    Filter,
    /// Fetch and attach metadata.
    Metadata,
    /// Rename according to the configured scheme.
    Rename,
    /// Full pipeline: extract, filter, metadata, rename.
    AutoProcess,
    /// Full pipeline on an already-extracted folder.
    ProcessExistingFolder,
}

impl Default for TaskType {
    fn default() -> Self {
        Self::AutoProcess
    }
}

/// One background job as reported by the job-management API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque task identifier.
    pub id: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub source_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Completion percentage, 0–100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub current_step: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Request body for creating a task (`POST /api/tasks`).
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub source_path: String,
    pub task_type: TaskType,
    pub auto_classify: bool,
}

impl NewTask {
    /// A new task with the server defaults: full auto-processing with
    /// classification enabled.
    pub fn auto_process(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            task_type: TaskType::default(),
            auto_classify: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_values_are_snake_case() {
        assert_eq!(
            serde_json::to_value(TaskStatus::Pending).unwrap(),
            serde_json::json!("pending")
        );
        assert_eq!(
            serde_json::to_value(TaskStatus::Processing).unwrap(),
            serde_json::json!("processing")
        );
        let status: TaskStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(status, TaskStatus::Failed);
    }

    #[test]
    fn unknown_status_is_rejected() {
        // The local view only ever holds the four enumerated values.
        let result = serde_json::from_str::<TaskStatus>("\"paused\"");
        assert!(result.is_err());
    }

    #[test]
    fn finished_covers_completed_and_failed() {
        assert!(TaskStatus::Completed.is_finished());
        assert!(TaskStatus::Failed.is_finished());
        assert!(!TaskStatus::Pending.is_finished());
        assert!(!TaskStatus::Processing.is_finished());
    }

    #[test]
    fn new_task_body_matches_wire_format() {
        let body = NewTask::auto_process("D:\\incoming\\RJ123456.zip");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "source_path": "D:\\incoming\\RJ123456.zip",
                "task_type": "auto_process",
                "auto_classify": true,
            })
        );
    }

    #[test]
    fn task_deserializes_from_server_response() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "a1b2c3",
            "type": "extract",
            "status": "processing",
            "source_path": "/library/in/RJ123456.zip",
            "output_path": null,
            "progress": 40,
            "current_step": "extracting",
            "error_message": null,
        }))
        .unwrap();
        assert_eq!(task.task_type, TaskType::Extract);
        assert_eq!(task.status, TaskStatus::Processing);
        assert_eq!(task.progress, 40);
    }
}
