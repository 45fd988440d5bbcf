//! Minimal task vocabulary: enough to let a request opt into task-augmented
//! execution (`task: TaskMetadata { ttl }`) and to describe where a task sits
//! in its lifecycle. `tasks/get`, `tasks/cancel`, `tasks/list`, and the full
//! `Task` record are out of scope here — the queued-response routing hook
//! only needs status and an id.
//!
//! ```text
//! Working -> Completed       (success)
//! Working -> Failed          (error)
//! Working -> Cancelled       (user/system cancellation)
//! Working -> InputRequired   (needs user input)
//! InputRequired -> Working   (input received, resuming)
//! ```

use serde::{Deserialize, Serialize};

/// Opaque task identifier, assigned by the server when a task-augmented
/// request is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task status per MCP 2025-11-25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Working,
    InputRequired,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    /// True once the task has left `Working`/`InputRequired` for good.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

/// Task metadata for task-augmented requests. Added to a request's params
/// (e.g. `CallToolParams`, `CreateMessageParams`, `ElicitCreateParams`) to
/// indicate the operation should run as a task instead of blocking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetadata {
    /// Time-to-live in milliseconds — how long the server should keep the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl TaskMetadata {
    pub fn new() -> Self {
        Self { ttl: None }
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

impl Default for TaskMetadata {
    fn default() -> Self {
        Self::new()
    }
}
