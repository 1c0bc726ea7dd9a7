//! Internal task node types.
//!
//! Provides type erasure to store tasks with different callables, argument lists, and output
//! types in a single arena. The public API stays typed; erasure is purely an implementation
//! detail.
//!
//! - **TypedNode\<F, A, O\>**: stores a callable and its unresolved arguments with full type
//!   information
//! - **ExecutableNode**: trait for executing type-erased nodes

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::args::Arguments;
use crate::error::{BoxError, SchedulerError, SchedulerResult};
use crate::invoke::Invoke;
use crate::scheduler::Scheduler;
use crate::types::TaskId;
use crate::value::ErasedValue;

/// Maps a callable's raw output to a stored value or a task failure.
///
/// Picked once at registration: [`Scheduler::add`] stores every output as-is, while
/// [`Scheduler::try_add`] unwraps a `Result` and reports its error.
pub(crate) type Completion<O> = fn(O) -> Result<ErasedValue, BoxError>;

/// Internal trait for executing heterogeneous tasks.
///
/// This is the only place where type erasure occurs. The `TypedNode` behind it knows its
/// concrete argument and output types; the scheduler only ever sees `dyn ExecutableNode`.
pub(crate) trait ExecutableNode {
    /// Resolve the stored arguments against `scheduler`, call the task, and return its output.
    ///
    /// Executed-state bookkeeping is the scheduler's job; a node may be executed again after a
    /// failed attempt.
    fn execute(&mut self, scheduler: &Scheduler<'_>) -> SchedulerResult<ErasedValue>;

    /// Name of the stored callable's type, for diagnostics.
    fn callable_name(&self) -> &'static str;
}

/// Fully-typed storage for a single task.
pub(crate) struct TypedNode<F, A, O> {
    pub(crate) id: TaskId,
    pub(crate) callable: F,
    pub(crate) arguments: A,
    pub(crate) completion: Completion<O>,
}

impl<F, A, O> TypedNode<F, A, O> {
    pub(crate) fn new(id: TaskId, callable: F, arguments: A, completion: Completion<O>) -> Self {
        Self {
            id,
            callable,
            arguments,
            completion,
        }
    }
}

impl<F, A, O> ExecutableNode for TypedNode<F, A, O>
where
    A: Arguments,
    F: Invoke<A::Resolved, Output = O>,
{
    fn execute(&mut self, scheduler: &Scheduler<'_>) -> SchedulerResult<ErasedValue> {
        #[cfg(feature = "tracing")]
        trace!(
            task_id = self.id.0,
            dependency_count = self.arguments.dependencies().len(),
            "resolving arguments"
        );

        // Dependencies are forced here, recursively, before the callable runs
        let resolved = self.arguments.resolve(scheduler)?;

        let output = self.callable.invoke(resolved);

        (self.completion)(output).map_err(|source| SchedulerError::TaskFailed {
            task_id: self.id,
            source,
        })
    }

    fn callable_name(&self) -> &'static str {
        std::any::type_name::<F>()
    }
}

/// Completion for infallible callables: store the output unchanged.
pub(crate) fn store_output<O: 'static>(output: O) -> Result<ErasedValue, BoxError> {
    Ok(ErasedValue::new(output))
}

/// Completion for fallible callables: store the `Ok` value, report the `Err`.
pub(crate) fn store_ok<T, E>(output: Result<T, E>) -> Result<ErasedValue, BoxError>
where
    T: 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    output.map(ErasedValue::new).map_err(BoxError::from)
}
