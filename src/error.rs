//! Error types for scheduler operations.
//!
//! Every fallible operation returns [`SchedulerResult<T>`]. Errors surface synchronously to the
//! caller of whichever operation triggered them; the scheduler never retries or swallows them.

use crate::types::TaskId;

/// Boxed error produced by a fallible task callable (see [`crate::Scheduler::try_add`]).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while registering, executing, or reading tasks
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchedulerError {
    /// Registering the task would close a dependency cycle. Nothing was added.
    #[error(
        "Task #{task_id} would close a dependency cycle: {}\n\
         \n\
         The task was not added and the dependency graph is unchanged.",
        format_cycle(.cycle)
    )]
    CycleDetected { task_id: TaskId, cycle: Vec<TaskId> },

    /// The stored result has a different type than the one requested
    #[error("Task #{task_id} produced a `{found}`, but a `{expected}` was requested")]
    TypeMismatch {
        task_id: TaskId,
        expected: &'static str,
        found: &'static str,
    },

    /// No task is registered under this id
    #[error("No task is registered under id #{task_id}")]
    InvalidTaskId { task_id: TaskId },

    /// The task's callable returned an error
    #[error("Task #{task_id} failed: {source}")]
    TaskFailed {
        task_id: TaskId,
        #[source]
        source: BoxError,
    },

    /// The task's callable panicked
    #[error("Task #{task_id} panicked during execution: {panic_message}")]
    TaskPanicked {
        task_id: TaskId,
        panic_message: String,
    },

    /// The task was forced again while its own callable was still running
    #[error("Task #{task_id} was requested while it is still executing")]
    TaskInProgress { task_id: TaskId },
}

impl SchedulerError {
    /// The id of the task this error is about.
    pub fn task_id(&self) -> TaskId {
        match self {
            SchedulerError::CycleDetected { task_id, .. }
            | SchedulerError::TypeMismatch { task_id, .. }
            | SchedulerError::InvalidTaskId { task_id }
            | SchedulerError::TaskFailed { task_id, .. }
            | SchedulerError::TaskPanicked { task_id, .. }
            | SchedulerError::TaskInProgress { task_id } => *task_id,
        }
    }
}

fn format_cycle(cycle: &[TaskId]) -> String {
    cycle
        .iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
