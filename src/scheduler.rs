//! Task scheduler: registration, lazy forcing, and eager execution.
//!
//! Provides [`Scheduler`] for registering deferred computations whose arguments may refer to
//! the results of other computations, and for executing them on demand or all at once.
//!
//! Uses Mutex for interior mutability so every operation takes `&self`: a task's arguments
//! resolve by calling back into the scheduler while it is executing that task.

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::{debug, error, trace};

use crate::args::Arguments;
use crate::error::{SchedulerError, SchedulerResult};
use crate::graph::DependencyGraph;
use crate::invoke::Invoke;
use crate::node::{self, ExecutableNode, TypedNode};
use crate::types::{FutureResult, TaskId};
use crate::value::ErasedValue;

/// One slot of the task arena.
struct TaskEntry<'env> {
    /// `None` only while the task is executing.
    node: Option<Box<dyn ExecutableNode + 'env>>,
    /// Filled exactly once, after the first successful execution.
    result: Option<ErasedValue>,
}

impl TaskEntry<'_> {
    fn executed(&self) -> bool {
        self.result.is_some()
    }
}

/// Register deferred computations and execute them lazily or all at once.
///
/// A `Scheduler` owns every task added to it. A task is a callable plus a tuple of arguments;
/// any argument may be a [`FutureResult`] naming another task, in which case that task's result
/// is substituted when this task runs.
///
/// # Workflow
///
/// 1. Create a scheduler with [`Scheduler::new`]
/// 2. Add tasks with [`Scheduler::add`] (or [`Scheduler::try_add`] for fallible callables)
/// 3. Refer to earlier results with [`Scheduler::future_result`]
/// 4. Run everything with [`Scheduler::execute_all`], or let [`Scheduler::get_result`] run just
///    what one result needs
///
/// Every task runs at most once. Results are memoized and copied out on each read.
///
/// # Examples
///
/// ```
/// use lazydag::Scheduler;
///
/// let scheduler = Scheduler::new();
///
/// let sum = scheduler.add(|a: i32, b: i32| a + b, (2, 3))?;
/// let product = scheduler.add(
///     |a: i32, b: i32| a * b,
///     (4, scheduler.future_result::<i32>(sum)),
/// )?;
///
/// scheduler.execute_all()?;
///
/// assert_eq!(scheduler.get_result::<i32>(sum)?, 5);
/// assert_eq!(scheduler.get_result::<i32>(product)?, 20);
/// # Ok::<(), lazydag::SchedulerError>(())
/// ```
///
/// # Borrowed state
///
/// The `'env` lifetime lets callables and [`crate::Ref`] arguments borrow from the surrounding
/// scope. The borrow lasts until the scheduler is dropped:
///
/// ```
/// use lazydag::Scheduler;
///
/// struct Counter { hits: u32 }
///
/// impl Counter {
///     fn hit(&mut self, by: u32) -> u32 { self.hits += by; self.hits }
/// }
///
/// let mut counter = Counter { hits: 0 };
/// {
///     let scheduler = Scheduler::new();
///     let id = scheduler.add(|by: u32| counter.hit(by), (2u32,)).unwrap();
///     assert_eq!(scheduler.get_result::<u32>(id).unwrap(), 2);
///     assert_eq!(scheduler.get_result::<u32>(id).unwrap(), 2);
/// }
/// assert_eq!(counter.hits, 2);
/// ```
pub struct Scheduler<'env> {
    tasks: Mutex<Vec<TaskEntry<'env>>>,
    graph: Mutex<DependencyGraph>,
}

impl Default for Scheduler<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'env> Scheduler<'env> {
    /// Create an empty scheduler.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazydag::Scheduler;
    ///
    /// let scheduler = Scheduler::new();
    /// assert!(scheduler.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            graph: Mutex::new(DependencyGraph::new()),
        }
    }

    /// Register a task and return its id.
    ///
    /// `args` is a tuple (up to 8 elements) spread positionally into `callable` when the task
    /// runs. Every [`FutureResult`] in `args` becomes a dependency: the referenced task runs
    /// first and its result takes the handle's place. Other arguments are passed through as
    /// clones.
    ///
    /// Nothing runs yet.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::CycleDetected`] if the new task's dependencies would close a
    /// cycle (including a task depending on its own id). The task is not added and the
    /// dependency graph is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazydag::Scheduler;
    ///
    /// fn area(w: f64, h: f64) -> f64 { w * h }
    ///
    /// let scheduler = Scheduler::new();
    /// let width = scheduler.add(|x: f64| x * 2.0, (1.5,))?;
    /// let rect = scheduler.add(area, (scheduler.future_result::<f64>(width), 4.0))?;
    ///
    /// assert_eq!(scheduler.get_result::<f64>(rect)?, 12.0);
    /// # Ok::<(), lazydag::SchedulerError>(())
    /// ```
    pub fn add<F, A>(&self, callable: F, args: A) -> SchedulerResult<TaskId>
    where
        A: Arguments + 'env,
        F: Invoke<A::Resolved> + 'env,
        F::Output: 'static,
    {
        self.register(callable, args, node::store_output::<F::Output>)
    }

    /// Register a fallible task and return its id.
    ///
    /// Like [`Scheduler::add`], but `callable` returns `Result<T, E>`. On `Ok` the task's result
    /// is the `T`; on `Err` whichever operation forced the task fails with
    /// [`SchedulerError::TaskFailed`] carrying the callable's error as its source, and the task
    /// stays unexecuted.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::CycleDetected`] exactly as [`Scheduler::add`] does.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazydag::{Scheduler, SchedulerError};
    ///
    /// let scheduler = Scheduler::new();
    /// let parsed = scheduler.try_add(|s: &str| s.parse::<i32>(), ("forty-two",))?;
    ///
    /// match scheduler.get_result::<i32>(parsed) {
    ///     Err(SchedulerError::TaskFailed { source, .. }) => {
    ///         assert!(source.downcast_ref::<std::num::ParseIntError>().is_some());
    ///     }
    ///     other => panic!("unexpected: {other:?}"),
    /// }
    /// # Ok::<(), SchedulerError>(())
    /// ```
    pub fn try_add<F, A, T, E>(&self, callable: F, args: A) -> SchedulerResult<TaskId>
    where
        A: Arguments + 'env,
        F: Invoke<A::Resolved, Output = Result<T, E>> + 'env,
        T: 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.register(callable, args, node::store_ok::<T, E>)
    }

    fn register<F, A, O>(
        &self,
        callable: F,
        args: A,
        completion: node::Completion<O>,
    ) -> SchedulerResult<TaskId>
    where
        A: Arguments + 'env,
        F: Invoke<A::Resolved, Output = O> + 'env,
        O: 'env,
    {
        let dependencies: HashSet<TaskId> = args.dependencies().into_iter().collect();

        let mut tasks = self.tasks.lock();
        let id = TaskId(tasks.len());

        #[cfg(feature = "tracing")]
        debug!(
            task_id = id.0,
            callable = std::any::type_name::<F>(),
            dependency_ids = ?{
                let mut ids: Vec<usize> = dependencies.iter().map(|dep| dep.0).collect();
                ids.sort_unstable();
                ids
            },
            "adding task"
        );

        if let Err(cycle) = self.graph.lock().insert(id, dependencies) {
            #[cfg(feature = "tracing")]
            error!(
                task_id = id.0,
                cycle = ?cycle.iter().map(|dep| dep.0).collect::<Vec<_>>(),
                "rejected task that would close a dependency cycle"
            );

            return Err(SchedulerError::CycleDetected { task_id: id, cycle });
        }

        tasks.push(TaskEntry {
            node: Some(Box::new(TypedNode::new(id, callable, args, completion))),
            result: None,
        });

        Ok(id)
    }

    /// Issue a typed forward reference to the task `id`.
    ///
    /// Neither the id nor the type is checked here: the id may name a task that has not been
    /// added yet, and `T` is verified when the handle is resolved. Issuing a handle records no
    /// dependency; passing it to [`Scheduler::add`] does.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazydag::{Scheduler, TaskId};
    ///
    /// let scheduler = Scheduler::new();
    ///
    /// // Refer to the task that will be added at index 1
    /// let later = scheduler.future_result::<i32>(TaskId(1));
    /// let doubled = scheduler.add(|x: i32| x * 2, (later,))?;
    /// scheduler.add(|| 21, ())?;
    ///
    /// assert_eq!(scheduler.get_result::<i32>(doubled)?, 42);
    /// # Ok::<(), lazydag::SchedulerError>(())
    /// ```
    pub fn future_result<T>(&self, id: impl Into<TaskId>) -> FutureResult<T> {
        FutureResult::new(id.into())
    }

    /// Return a copy of the result of task `id`, executing it (and, recursively, whatever it
    /// depends on) first if it has not run yet.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::InvalidTaskId`] if no task has this id
    /// - [`SchedulerError::TypeMismatch`] if the result is not a `T`; nothing is modified
    /// - [`SchedulerError::TaskFailed`] or [`SchedulerError::TaskPanicked`] if this task or one
    ///   of its dependencies failed while being forced
    ///
    /// # Examples
    ///
    /// ```
    /// use lazydag::{Scheduler, SchedulerError};
    ///
    /// let scheduler = Scheduler::new();
    /// let id = scheduler.add(|| 2.5f32, ())?;
    ///
    /// assert_eq!(scheduler.get_result::<f32>(id)?, 2.5);
    /// assert!(matches!(
    ///     scheduler.get_result::<i32>(id),
    ///     Err(SchedulerError::TypeMismatch { .. })
    /// ));
    /// # Ok::<(), SchedulerError>(())
    /// ```
    pub fn get_result<T: Clone + 'static>(&self, id: impl Into<TaskId>) -> SchedulerResult<T> {
        let id = id.into();
        let value = self.force(id)?;

        value.downcast::<T>().ok_or(SchedulerError::TypeMismatch {
            task_id: id,
            expected: std::any::type_name::<T>(),
            found: value.type_name(),
        })
    }

    /// Execute task `id` if it has not run yet, without reading its result.
    ///
    /// Useful for tasks whose callable returns `()`.
    ///
    /// # Errors
    ///
    /// Same as [`Scheduler::get_result`], minus the type check.
    pub fn execute(&self, id: impl Into<TaskId>) -> SchedulerResult<()> {
        self.force(id.into()).map(|_| ())
    }

    /// Execute every task that has not run yet, in ascending id order.
    ///
    /// A task's dependencies may already have been forced out of order by an earlier task in
    /// the scan; they are not run again.
    ///
    /// # Errors
    ///
    /// Stops at the first failing task and returns its error. Tasks after it in the scan are
    /// left unexecuted; results already produced are kept.
    pub fn execute_all(&self) -> SchedulerResult<()> {
        let count = self.len();

        #[cfg(feature = "tracing")]
        debug!(task_count = count, "executing all tasks");

        for index in 0..count {
            self.force(TaskId(index))?;
        }

        #[cfg(feature = "tracing")]
        debug!(task_count = count, "all tasks executed");

        Ok(())
    }

    /// Whether task `id` has already run successfully.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidTaskId`] if no task has this id.
    pub fn is_executed(&self, id: impl Into<TaskId>) -> SchedulerResult<bool> {
        let id = id.into();
        self.tasks
            .lock()
            .get(id.0)
            .map(TaskEntry::executed)
            .ok_or(SchedulerError::InvalidTaskId { task_id: id })
    }

    /// The ids task `id` depends on, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidTaskId`] if no task has this id.
    pub fn dependencies(&self, id: impl Into<TaskId>) -> SchedulerResult<Vec<TaskId>> {
        let id = id.into();
        let graph = self.graph.lock();
        let mut deps: Vec<TaskId> = graph
            .dependencies(id)
            .ok_or(SchedulerError::InvalidTaskId { task_id: id })?
            .iter()
            .copied()
            .collect();
        deps.sort_unstable();
        Ok(deps)
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Whether no task has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run task `id` unless it already has a result, and return that result.
    ///
    /// The node is taken out of its slot while it runs so no lock is held across user code:
    /// resolving its arguments re-enters the scheduler to force dependencies. It is put back
    /// afterwards whatever the outcome, and the result slot is only filled on success.
    fn force(&self, id: TaskId) -> SchedulerResult<ErasedValue> {
        let mut node = {
            let mut tasks = self.tasks.lock();
            let entry = tasks
                .get_mut(id.0)
                .ok_or(SchedulerError::InvalidTaskId { task_id: id })?;

            if let Some(result) = &entry.result {
                #[cfg(feature = "tracing")]
                trace!(task_id = id.0, "result already memoized");

                return Ok(result.clone());
            }

            entry
                .node
                .take()
                .ok_or(SchedulerError::TaskInProgress { task_id: id })?
        };

        #[cfg(feature = "tracing")]
        trace!(
            task_id = id.0,
            callable = node.callable_name(),
            "executing task"
        );

        // Panics become errors so the node can be restored and the task retried
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| node.execute(self)))
            .unwrap_or_else(|payload| {
                let panic_message = if let Some(s) = payload.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };

                Err(SchedulerError::TaskPanicked {
                    task_id: id,
                    panic_message,
                })
            });

        let mut tasks = self.tasks.lock();
        let entry = &mut tasks[id.0];
        entry.node = Some(node);

        match outcome {
            Ok(value) => {
                entry.result = Some(value.clone());
                Ok(value)
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                error!(task_id = id.0, error = %err, "task execution failed");

                Err(err)
            }
        }
    }
}

impl fmt::Debug for Scheduler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (task_count, executed_count) = {
            let tasks = self.tasks.lock();
            let executed = tasks.iter().filter(|entry| entry.executed()).count();
            (tasks.len(), executed)
        };

        f.debug_struct("Scheduler")
            .field("tasks", &task_count)
            .field("executed", &executed_count)
            .field("edges", &self.graph.lock().edge_count())
            .finish()
    }
}
