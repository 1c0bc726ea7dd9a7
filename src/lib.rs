//! Lazy Task Scheduler
//!
//! A small, synchronous scheduler for deferred computations. Register a callable together with
//! its arguments; any argument may be a typed forward reference to another task's result. The
//! scheduler derives the dependency graph from those references, rejects cycles the moment they
//! would be created, and runs each task exactly once, either all at once or on demand.
//!
//! # Features
//!
//! - **Eager cycle rejection**: [`Scheduler::add`] refuses a task whose dependencies would close a
//!   cycle and leaves the graph untouched, so execution never has to check.
//! - **Lazy, memoized execution**: [`Scheduler::get_result`] runs only what the requested result
//!   needs; every task's callable is invoked at most once no matter how many dependents reach it.
//! - **Typed results from type-erased storage**: results of any `'static + Clone` type live side
//!   by side; reading one with the wrong type is an error, never a panic.
//! - **Any call shape**: closures, free functions, and method paths of up to 8 arguments, with
//!   receivers passed by value or through [`Ref`].
//! - **Borrowing callables**: the scheduler's lifetime lets tasks borrow (even mutably) from the
//!   surrounding scope.
//!
//! # Quick Start
//!
//! ```
//! use lazydag::Scheduler;
//!
//! let scheduler = Scheduler::new();
//!
//! let a = scheduler.add(|x: f64, y: f64| x + y, (1.0, 2.0))?;
//! let b = scheduler.add(|x: f64, y: f64| x * y, (3.0, 4.0))?;
//! let total = scheduler.add(
//!     |x: f64, y: f64, z: f64| x + y + z,
//!     (
//!         scheduler.future_result::<f64>(a),
//!         scheduler.future_result::<f64>(b),
//!         5.0,
//!     ),
//! )?;
//!
//! // Runs `a` and `b` first, then `total`
//! assert_eq!(scheduler.get_result::<f64>(total)?, 20.0);
//! # Ok::<(), lazydag::SchedulerError>(())
//! ```
//!
//! # Core Concepts
//!
//! ## Task
//!
//! A task is a callable plus a tuple of arguments, identified by the [`TaskId`] returned from
//! [`Scheduler::add`]. Ids are handed out in insertion order and are never reused.
//!
//! ## FutureResult
//!
//! A [`FutureResult<T>`] is a typed reference to a task's eventual result. Passed as an
//! argument, it makes the new task depend on the referenced one and is replaced by its `T`
//! result at execution time. It can also be resolved directly with [`FutureResult::get`].
//!
//! Handles carry no pointer to the scheduler; they are always resolved against one explicitly.
//!
//! ## Arguments
//!
//! Arguments are passed as a tuple and spread positionally into the callable:
//!
//! - [`FutureResult<T>`]: a dependency, resolved to `T`
//! - [`Ref<T>`]: a borrowed value, resolved to `&T` (method receivers, large inputs)
//! - [`Value<T>`]: any `Clone` value, passed by clone
//! - numbers, `bool`, `char`, `String`, `&str`: passed by clone as-is
//!
//! ```
//! use lazydag::{Ref, Scheduler};
//!
//! struct Rect { w: u32, h: u32 }
//!
//! impl Rect {
//!     fn scaled_area(&self, k: u32) -> u32 { self.w * self.h * k }
//! }
//!
//! let rect = Rect { w: 2, h: 3 };
//! let scheduler = Scheduler::new();
//!
//! let width = scheduler.add(|r: &Rect| r.w, (Ref(&rect),))?;
//! let area = scheduler.add(
//!     Rect::scaled_area,
//!     (Ref(&rect), scheduler.future_result::<u32>(width)),
//! )?;
//!
//! assert_eq!(scheduler.get_result::<u32>(area)?, 12);
//! # Ok::<(), lazydag::SchedulerError>(())
//! ```
//!
//! Closures need their parameter types written out: the argument tuple decides what the
//! callable receives, so the compiler cannot infer them from the call site.
//!
//! ## Cycle rejection
//!
//! A handle can name a task that has not been added yet. If adding that task later would
//! close a loop, the add fails:
//!
//! ```
//! use lazydag::{Scheduler, SchedulerError, TaskId};
//!
//! let scheduler = Scheduler::new();
//!
//! // Task 0 depends on task 1, which does not exist yet
//! let first = scheduler.add(|x: i32| x + 1, (scheduler.future_result::<i32>(TaskId(1)),))?;
//!
//! // Task 1 depending on task 0 would close the loop 1 -> 0 -> 1
//! let err = scheduler
//!     .add(|x: i32| x * 2, (scheduler.future_result::<i32>(first),))
//!     .unwrap_err();
//! assert!(matches!(err, SchedulerError::CycleDetected { .. }));
//! assert_eq!(scheduler.len(), 1);
//! # Ok::<(), SchedulerError>(())
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`SchedulerResult<T>`] (an alias for
//! `Result<T, SchedulerError>`):
//!
//! - [`Scheduler::add`] fails with [`SchedulerError::CycleDetected`]
//! - [`Scheduler::get_result`] fails with [`SchedulerError::InvalidTaskId`],
//!   [`SchedulerError::TypeMismatch`], or the failure of whichever task it had to run
//! - [`Scheduler::execute_all`] returns the first task failure
//!
//! Fallible callables are registered with [`Scheduler::try_add`]; their errors come back as
//! [`SchedulerError::TaskFailed`] with the callable's error as the source. Panicking callables
//! come back as [`SchedulerError::TaskPanicked`]. Either way the task stays unexecuted and is
//! attempted again the next time it is needed.
//!
//! # Optional Tracing Support
//!
//! Enable the `tracing` feature to get events through the `tracing` crate. Without the feature
//! the instrumentation is compiled out entirely.
//!
//! - **DEBUG**: task registration, `execute_all` start/completion
//! - **TRACE**: individual task execution, memoized hits
//! - **ERROR**: rejected cycles, task failures and panics
//!
//! ```bash
//! RUST_LOG=lazydag=trace cargo run --features tracing
//! ```

// Module declarations
mod args;
mod error;
mod graph;
mod invoke;
mod node;
mod scheduler;
mod types;
mod value;

// Public re-exports
pub use args::{Argument, Arguments};
pub use error::{BoxError, SchedulerError, SchedulerResult};
pub use invoke::Invoke;
pub use scheduler::Scheduler;
pub use types::{FutureResult, Ref, TaskId, Value};
