//! Type-erased result slot.
//!
//! Results of different types live side by side in the scheduler's task arena. Each one is held
//! as an `Rc<dyn Any>` together with the name of its concrete type, so a failed downcast can
//! report what was actually stored.

use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;

/// A single type-erased value.
///
/// Cloning an `ErasedValue` only bumps a reference count; the stored value itself is cloned when
/// it is extracted with [`ErasedValue::downcast`].
#[derive(Clone)]
pub(crate) struct ErasedValue {
    value: Rc<dyn Any>,
    type_name: &'static str,
}

impl ErasedValue {
    pub(crate) fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Rc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Name of the stored value's concrete type.
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the stored value as `T`, or `None` if it holds something else.
    pub(crate) fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Copy the stored value out as `T`, or `None` if it holds something else.
    pub(crate) fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}
