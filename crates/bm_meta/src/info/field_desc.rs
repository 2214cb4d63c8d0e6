use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::Value;
use crate::info::{CallError, TypeRef};

type FieldRead = dyn Fn(&dyn Any) -> Option<Value> + Send + Sync;
type FieldWrite = dyn Fn(&mut dyn Any, Value) -> Result<(), CallError> + Send + Sync;

/// The declared visibility of a field.
///
/// Only [`Public`](Self::Public) fields can be read through a handle whose
/// accessibility flag is off; see [`FieldHandle`](crate::access::FieldHandle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    /// Visible inside the declaring crate or module only.
    Restricted,
    Private,
}

impl Visibility {
    #[inline]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// A field declared directly on a type.
///
/// Reads produce an owned [`Value`], so the stored read function usually clones.
/// Built-in types can describe derived state (a `String`'s length) the same way.
///
/// # Examples
///
/// ```
/// use bm_meta::info::{FieldDesc, Visibility};
///
/// struct Account { balance: u64 }
///
/// let field = FieldDesc::new(
///     "balance",
///     Visibility::Private,
///     |a: &Account| a.balance,
///     |a: &mut Account, v: u64| a.balance = v,
/// );
/// assert_eq!(field.name(), "balance");
/// assert!(field.is_writable());
/// ```
#[derive(Clone)]
pub struct FieldDesc {
    name: &'static str,
    visibility: Visibility,
    owner: TypeRef,
    ty: TypeRef,
    read: Arc<FieldRead>,
    write: Option<Arc<FieldWrite>>,
}

impl FieldDesc {
    /// Creates a readable and writable field of `T` holding a `V`.
    pub fn new<T, V, G, S>(name: &'static str, visibility: Visibility, get: G, set: S) -> Self
    where
        T: 'static,
        V: 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let write = move |target: &mut dyn Any, value: Value| -> Result<(), CallError> {
            let value = value
                .take::<V>()
                .map_err(|_| CallError::Argument { index: 0 })?;
            let target = target.downcast_mut::<T>().ok_or(CallError::Target)?;
            set(target, value);
            Ok(())
        };

        Self {
            write: Some(Arc::new(write)),
            ..Self::read_only(name, visibility, get)
        }
    }

    /// Creates a field of `T` that can only be read.
    pub fn read_only<T, V, G>(name: &'static str, visibility: Visibility, get: G) -> Self
    where
        T: 'static,
        V: 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        let read = move |target: &dyn Any| target.downcast_ref::<T>().map(|t| Value::new(get(t)));

        Self {
            name,
            visibility,
            owner: TypeRef::of::<T>(),
            ty: TypeRef::of::<V>(),
            read: Arc::new(read),
            write: None,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The type declaring this field.
    #[inline]
    pub const fn owner(&self) -> TypeRef {
        self.owner
    }

    /// The type of the field value.
    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Reads the field, `None` if `target` is not the declaring type.
    ///
    /// Ignores visibility; handles enforce it.
    #[inline]
    pub(crate) fn read_raw(&self, target: &dyn Any) -> Option<Value> {
        (self.read)(target)
    }

    /// Writes the field, `None` if the field is read-only.
    #[inline]
    pub(crate) fn write_raw(
        &self,
        target: &mut dyn Any,
        value: Value,
    ) -> Option<Result<(), CallError>> {
        self.write.as_ref().map(|write| write(target, value))
    }
}

impl fmt::Debug for FieldDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDesc")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("owner", &self.owner)
            .field("ty", &self.ty)
            .field("writable", &self.is_writable())
            .finish()
    }
}
