//! Uniform call adapter for task callables.
//!
//! [`Invoke<Args>`] spreads a tuple of resolved arguments into a callable positionally. It is
//! implemented for every `FnMut` of arity 0 through 8, which covers all the call shapes a task
//! needs:
//!
//! - closures and free functions: `|a: i32, b: i32| a + b`, `i32::pow`
//! - methods with a by-reference receiver: `Point::norm` with a `Ref(&point)` first argument
//! - methods with a by-value receiver: `String::len` with a `String` first argument
//! - field access: `|p: &Point| p.x` with a `Ref(&point)` argument
//!
//! The decision of how to call a task is made once, when the task is added, by the
//! `F: Invoke<Args>` bound; execution just calls [`Invoke::invoke`].

/// Call `self` with the elements of `Args` as positional arguments.
pub trait Invoke<Args> {
    /// What the call returns.
    type Output;

    /// Perform the call.
    fn invoke(&mut self, args: Args) -> Self::Output;
}

/// Implements [`Invoke`] for `FnMut` of one arity.
macro_rules! impl_invoke {
    ($($A:ident),*) => {
        impl<F, R, $($A),*> Invoke<($($A,)*)> for F
        where
            F: FnMut($($A),*) -> R,
        {
            type Output = R;

            #[inline]
            #[allow(non_snake_case)]
            fn invoke(&mut self, ($($A,)*): ($($A,)*)) -> R {
                self($($A),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A1);
impl_invoke!(A1, A2);
impl_invoke!(A1, A2, A3);
impl_invoke!(A1, A2, A3, A4);
impl_invoke!(A1, A2, A3, A4, A5);
impl_invoke!(A1, A2, A3, A4, A5, A6);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7, A8);
