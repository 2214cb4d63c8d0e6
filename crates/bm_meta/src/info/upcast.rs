use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::info::TypeRef;

type UpcastRef = dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync;
type UpcastMut = dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync;

/// Projects a value onto the part of it that plays the superclass.
///
/// Rust types inherit by embedding: a `GrandChild` holds a `Child`, which holds
/// a `Base`. An `Upcast` erases the two projections `&T -> &S` and
/// `&mut T -> &mut S` so handles resolved on an ancestor can reach their
/// declaring type from an instance of the start type.
///
/// Applying an upcast to a value that is not a `T` yields `None`.
#[derive(Clone)]
pub struct Upcast {
    from: TypeRef,
    to: TypeRef,
    up_ref: Arc<UpcastRef>,
    up_mut: Arc<UpcastMut>,
}

// Pins the higher-ranked signature onto the closures below.
fn erase_ref<F>(f: F) -> F
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any>,
{
    f
}

fn erase_mut<F>(f: F) -> F
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>,
{
    f
}

impl Upcast {
    /// Creates the upcast from `T` to its embedded superclass `S`.
    pub fn new<T, S, R, M>(project: R, project_mut: M) -> Self
    where
        T: 'static,
        S: 'static,
        R: Fn(&T) -> &S + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut S + Send + Sync + 'static,
    {
        let up_ref = erase_ref(move |value| {
            value
                .downcast_ref::<T>()
                .map(|this| project(this) as &dyn Any)
        });
        let up_mut = erase_mut(move |value| {
            value
                .downcast_mut::<T>()
                .map(|this| project_mut(this) as &mut dyn Any)
        });

        Self {
            from: TypeRef::of::<T>(),
            to: TypeRef::of::<S>(),
            up_ref: Arc::new(up_ref),
            up_mut: Arc::new(up_mut),
        }
    }

    /// The subclass this upcast starts from.
    #[inline]
    pub const fn from(&self) -> TypeRef {
        self.from
    }

    /// The superclass this upcast projects onto.
    #[inline]
    pub const fn to(&self) -> TypeRef {
        self.to
    }

    #[inline]
    pub fn apply<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.up_ref)(value)
    }

    #[inline]
    pub fn apply_mut<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.up_mut)(value)
    }
}

impl fmt::Debug for Upcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Upcast({} -> {})", self.from, self.to)
    }
}

/// Applies a chain of upcasts, from the start type to the declaring type.
pub(crate) fn apply_chain<'a>(chain: &[Upcast], mut value: &'a dyn Any) -> Option<&'a dyn Any> {
    for upcast in chain {
        value = upcast.apply(value)?;
    }
    Some(value)
}

pub(crate) fn apply_chain_mut<'a>(
    chain: &[Upcast],
    mut value: &'a mut dyn Any,
) -> Option<&'a mut dyn Any> {
    for upcast in chain {
        value = upcast.apply_mut(value)?;
    }
    Some(value)
}
