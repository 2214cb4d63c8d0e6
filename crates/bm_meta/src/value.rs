use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::info::TypeRef;

/// A dynamically typed value read from, or written into, a slot.
///
/// This is a `Box<dyn Any>` that remembers the [`TypeRef`] it was created from,
/// so a type mismatch can be reported by name.
///
/// # Examples
///
/// ```
/// use bm_meta::Value;
///
/// let value = Value::new(String::from("hello"));
/// assert!(value.is::<String>());
/// assert_eq!(value.type_name(), "String");
///
/// let s = value.take::<String>().unwrap();
/// assert_eq!(s, "hello");
/// ```
pub struct Value {
    ty: TypeRef,
    inner: Box<dyn Any>,
}

impl Value {
    /// Boxes `value`.
    #[inline]
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            ty: TypeRef::of::<T>(),
            inner: Box::new(value),
        }
    }

    /// Returns the type of the contained value.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Returns the short name of the contained type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut()
    }

    /// Unboxes the value, or gives it back if it is not a `T`.
    pub fn take<T: Any>(self) -> Result<T, Self> {
        let ty = self.ty;
        self.inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|inner| Self { ty, inner })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.ty.path()).finish()
    }
}
