//! Argument resolution for registered tasks.
//!
//! A task's arguments are captured as a tuple when the task is added. Each element implements
//! [`Argument`]: plain values resolve to a clone of themselves, [`Ref`] resolves to the borrowed
//! reference, and [`FutureResult`] resolves to the referenced task's result (forcing that task if
//! it has not run yet). The tuple as a whole implements [`Arguments`], which yields the
//! dependency ids at registration time and the resolved tuple at execution time.
//!
//! Both traits are implemented for tuples of up to 8 elements.

use crate::error::SchedulerResult;
use crate::scheduler::Scheduler;
use crate::types::{FutureResult, Ref, TaskId, Value};

/// A single task argument that can be resolved right before the task runs.
///
/// Implemented for [`FutureResult<T>`], [`Ref<T>`], [`Value<T>`], and common std value types.
pub trait Argument {
    /// What the callable receives in this argument's position.
    type Output;

    /// The task this argument waits on, if any.
    fn dependency(&self) -> Option<TaskId> {
        None
    }

    /// Produce the value handed to the callable.
    fn resolve(&self, scheduler: &Scheduler<'_>) -> SchedulerResult<Self::Output>;
}

impl<T: Clone + 'static> Argument for FutureResult<T> {
    type Output = T;

    fn dependency(&self) -> Option<TaskId> {
        Some(self.id)
    }

    fn resolve(&self, scheduler: &Scheduler<'_>) -> SchedulerResult<T> {
        scheduler.get_result(self.id)
    }
}

impl<'r, T: ?Sized> Argument for Ref<'r, T> {
    type Output = &'r T;

    fn resolve(&self, _scheduler: &Scheduler<'_>) -> SchedulerResult<&'r T> {
        Ok(self.0)
    }
}

impl<T: Clone> Argument for Value<T> {
    type Output = T;

    fn resolve(&self, _scheduler: &Scheduler<'_>) -> SchedulerResult<T> {
        Ok(self.0.clone())
    }
}

impl<'r> Argument for &'r str {
    type Output = &'r str;

    fn resolve(&self, _scheduler: &Scheduler<'_>) -> SchedulerResult<&'r str> {
        Ok(*self)
    }
}

/// Implements [`Argument`] for std types that are passed through by clone.
macro_rules! impl_plain_argument {
    ($($T:ty),+ $(,)?) => {
        $(
            impl Argument for $T {
                type Output = $T;

                #[inline]
                fn resolve(&self, _scheduler: &Scheduler<'_>) -> SchedulerResult<$T> {
                    Ok(self.clone())
                }
            }
        )+
    };
}

impl_plain_argument!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String, (),
);

/// The full argument tuple of a task.
pub trait Arguments {
    /// The tuple the callable is invoked with.
    type Resolved;

    /// Ids of every task referenced by a [`FutureResult`] in the tuple, in argument order.
    fn dependencies(&self) -> Vec<TaskId>;

    /// Resolve every argument, left to right. Stops at the first failing argument.
    fn resolve(&self, scheduler: &Scheduler<'_>) -> SchedulerResult<Self::Resolved>;
}

impl Arguments for () {
    type Resolved = ();

    fn dependencies(&self) -> Vec<TaskId> {
        Vec::new()
    }

    fn resolve(&self, _scheduler: &Scheduler<'_>) -> SchedulerResult<()> {
        Ok(())
    }
}

/// Implements [`Arguments`] for one tuple size.
///
/// Rust lacks variadic generics, so each arity needs its own implementation.
macro_rules! impl_arguments {
    ($($T:ident),+) => {
        impl<$($T: Argument),+> Arguments for ($($T,)+) {
            type Resolved = ($($T::Output,)+);

            #[allow(non_snake_case)]
            fn dependencies(&self) -> Vec<TaskId> {
                let ($($T,)+) = self;
                [$($T.dependency(),)+].into_iter().flatten().collect()
            }

            #[allow(non_snake_case)]
            fn resolve(&self, scheduler: &Scheduler<'_>) -> SchedulerResult<Self::Resolved> {
                let ($($T,)+) = self;
                Ok(($($T.resolve(scheduler)?,)+))
            }
        }
    };
}

impl_arguments!(A1);
impl_arguments!(A1, A2);
impl_arguments!(A1, A2, A3);
impl_arguments!(A1, A2, A3, A4);
impl_arguments!(A1, A2, A3, A4, A5);
impl_arguments!(A1, A2, A3, A4, A5, A6);
impl_arguments!(A1, A2, A3, A4, A5, A6, A7);
impl_arguments!(A1, A2, A3, A4, A5, A6, A7, A8);
