//! Core type definitions for task identifiers and handles.
//!
//! This module defines the fundamental types used throughout the scheduler: task ids,
//! forward-reference handles, and the argument wrappers accepted by [`crate::Scheduler::add`].

use std::fmt;
use std::marker::PhantomData;

use crate::error::SchedulerResult;
use crate::scheduler::Scheduler;

/// Stable task identifier.
///
/// Ids are assigned in insertion order starting at zero and are never reused, so an id doubles
/// as the task's index in the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub usize);

impl TaskId {
    /// The insertion index behind this id.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<usize> for TaskId {
    fn from(index: usize) -> Self {
        TaskId(index)
    }
}

/// Typed forward reference to a task's eventual result.
///
/// A `FutureResult<T>` is obtained from [`Scheduler::future_result`] and does one of two things:
/// 1. Passed as an argument to [`Scheduler::add`], it records a dependency edge and is replaced
///    by the task's `T` result when the dependent task runs.
/// 2. Resolved directly with [`FutureResult::get`], it forces the task if needed and returns a
///    copy of its result.
///
/// The handle holds no reference to the scheduler that issued it; resolution always takes the
/// scheduler as an explicit argument. The type `T` is only checked at resolution time, so a
/// handle may name a task that has not been registered yet.
///
/// Handles are cheap to clone and copy.
///
/// # Examples
///
/// ```
/// use lazydag::Scheduler;
///
/// let scheduler = Scheduler::new();
/// let sum = scheduler.add(|a: i32, b: i32| a + b, (2, 3)).unwrap();
///
/// let handle = scheduler.future_result::<i32>(sum);
/// assert_eq!(handle.get(&scheduler).unwrap(), 5);
/// ```
pub struct FutureResult<T> {
    pub(crate) id: TaskId,
    pub(crate) _phantom: PhantomData<fn() -> T>,
}

impl<T> FutureResult<T> {
    pub(crate) fn new(id: TaskId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// The id of the task this handle refers to.
    pub fn id(&self) -> TaskId {
        self.id
    }
}

impl<T: Clone + 'static> FutureResult<T> {
    /// Resolve the handle against `scheduler`, executing the task first if it has not run yet.
    ///
    /// Equivalent to `scheduler.get_result::<T>(self.id())`.
    pub fn get(&self, scheduler: &Scheduler<'_>) -> SchedulerResult<T> {
        scheduler.get_result(self.id)
    }
}

impl<T> Clone for FutureResult<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FutureResult<T> {}

impl<T> fmt::Debug for FutureResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureResult")
            .field("id", &self.id)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> From<FutureResult<T>> for TaskId {
    fn from(handle: FutureResult<T>) -> Self {
        handle.id
    }
}

/// Reference wrapper for passing a borrowed value as a task argument.
///
/// The task receives `&T`. This is how a method receiver is passed by reference:
///
/// ```
/// use lazydag::{Ref, Scheduler};
///
/// struct Offset { base: i32 }
///
/// impl Offset {
///     fn apply(&self, x: i32) -> i32 { x + self.base }
/// }
///
/// let offset = Offset { base: 3 };
/// let scheduler = Scheduler::new();
/// let id = scheduler.add(Offset::apply, (Ref(&offset), 4)).unwrap();
///
/// assert_eq!(scheduler.get_result::<i32>(id).unwrap(), 7);
/// ```
///
/// Mutation goes through a closure that captures `&mut` instead; the scheduler's lifetime keeps
/// the borrow alive until it is dropped.
pub struct Ref<'r, T: ?Sized>(pub &'r T);

impl<T: ?Sized> Clone for Ref<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Ref<'_, T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Ref<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.0).finish()
    }
}

/// Wrapper for passing any `Clone` value as a plain task argument.
///
/// Common std types (numbers, `bool`, `char`, `String`, `&str`) can be passed as-is; anything
/// else is wrapped in `Value`. The task receives a clone of the inner value on each execution
/// attempt.
///
/// ```
/// use lazydag::{Scheduler, Value};
///
/// #[derive(Clone)]
/// struct Point { x: i32, y: i32 }
///
/// let scheduler = Scheduler::new();
/// let id = scheduler
///     .add(|p: Point| p.x * p.y, (Value(Point { x: 3, y: 4 }),))
///     .unwrap();
///
/// assert_eq!(scheduler.get_result::<i32>(id).unwrap(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Value<T>(pub T);
