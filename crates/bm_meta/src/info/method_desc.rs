use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use thiserror::Error;

use crate::Value;
use crate::info::TypeRef;

type CallResult = Result<Option<Value>, CallError>;
type MethodBody = dyn Fn(&mut dyn Any, Vec<Value>) -> CallResult + Send + Sync;

// -----------------------------------------------------------------------------
// CallError

/// Why a type-erased body refused a call.
///
/// This is the low-level rejection only. It never leaves the crate unannotated:
/// the invoker turns it into a [`MetaError`](crate::MetaError) naming the method.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    #[error("target is not an instance of the declaring type")]
    Target,
    #[error("wrong number of arguments: expected {expected}, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("argument {index} has the wrong type")]
    Argument { index: usize },
}

fn take_args<const N: usize>(args: Vec<Value>) -> Result<[Value; N], CallError> {
    args.try_into().map_err(|args: Vec<Value>| CallError::Arity {
        expected: N,
        found: args.len(),
    })
}

fn take_arg<A: Any>(arg: Value, index: usize) -> Result<A, CallError> {
    arg.take::<A>().map_err(|_| CallError::Argument { index })
}

// -----------------------------------------------------------------------------
// MethodDesc

/// A method declared directly on a type.
///
/// Interface methods have no body; they are bound to a concrete implementation
/// when a class implementing the interface is introspected.
///
/// # Examples
///
/// ```
/// use bm_meta::info::MethodDesc;
/// use bm_meta::Value;
///
/// struct Counter { n: u32 }
///
/// let get = MethodDesc::getter("getN", |c: &Counter| c.n);
/// let set = MethodDesc::setter("setN", |c: &mut Counter, n: u32| c.n = n);
/// assert_eq!(get.params().len(), 0);
/// assert_eq!(set.params()[0].name(), "u32");
/// assert!(set.returns().is_none());
/// ```
#[derive(Clone)]
pub struct MethodDesc {
    name: &'static str,
    owner: TypeRef,
    params: Box<[TypeRef]>,
    returns: Option<TypeRef>,
    body: Option<Arc<MethodBody>>,
}

impl MethodDesc {
    /// Creates a method from an erased body.
    ///
    /// The body receives the target and exactly the arguments given by the caller;
    /// it must report mismatches through [`CallError`] rather than panicking.
    pub fn with_body<T, B>(
        name: &'static str,
        params: &[TypeRef],
        returns: Option<TypeRef>,
        body: B,
    ) -> Self
    where
        T: ?Sized + 'static,
        B: Fn(&mut dyn Any, Vec<Value>) -> Result<Option<Value>, CallError> + Send + Sync + 'static,
    {
        Self {
            name,
            owner: TypeRef::of::<T>(),
            params: params.into(),
            returns,
            body: Some(Arc::new(body)),
        }
    }

    /// Creates a method without a body, declared on the interface `I`.
    pub fn abstract_method<I: ?Sized + 'static>(
        name: &'static str,
        params: &[TypeRef],
        returns: Option<TypeRef>,
    ) -> Self {
        Self {
            name,
            owner: TypeRef::of::<I>(),
            params: params.into(),
            returns,
            body: None,
        }
    }

    /// A zero-argument method returning an `R`.
    pub fn getter<T, R, F>(name: &'static str, f: F) -> Self
    where
        T: 'static,
        R: 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        let body = move |target: &mut dyn Any, args: Vec<Value>| -> CallResult {
            let this = target.downcast_ref::<T>().ok_or(CallError::Target)?;
            take_args::<0>(args)?;
            Ok(Some(Value::new(f(this))))
        };
        Self::with_body::<T, _>(name, &[], Some(TypeRef::of::<R>()), body)
    }

    /// A one-argument method returning nothing.
    pub fn setter<T, A, F>(name: &'static str, f: F) -> Self
    where
        T: 'static,
        A: 'static,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        let body = move |target: &mut dyn Any, args: Vec<Value>| -> CallResult {
            let this = target.downcast_mut::<T>().ok_or(CallError::Target)?;
            let [arg] = take_args::<1>(args)?;
            f(this, take_arg::<A>(arg, 0)?);
            Ok(None)
        };
        Self::with_body::<T, _>(name, &[TypeRef::of::<A>()], None, body)
    }

    /// A zero-argument method returning nothing.
    pub fn action<T, F>(name: &'static str, f: F) -> Self
    where
        T: 'static,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let body = move |target: &mut dyn Any, args: Vec<Value>| -> CallResult {
            let this = target.downcast_mut::<T>().ok_or(CallError::Target)?;
            take_args::<0>(args)?;
            f(this);
            Ok(None)
        };
        Self::with_body::<T, _>(name, &[], None, body)
    }

    /// A one-argument method returning an `R`.
    pub fn function<T, A, R, F>(name: &'static str, f: F) -> Self
    where
        T: 'static,
        A: 'static,
        R: 'static,
        F: Fn(&mut T, A) -> R + Send + Sync + 'static,
    {
        let body = move |target: &mut dyn Any, args: Vec<Value>| -> CallResult {
            let this = target.downcast_mut::<T>().ok_or(CallError::Target)?;
            let [arg] = take_args::<1>(args)?;
            Ok(Some(Value::new(f(this, take_arg::<A>(arg, 0)?))))
        };
        Self::with_body::<T, _>(name, &[TypeRef::of::<A>()], Some(TypeRef::of::<R>()), body)
    }

    /// An abstract zero-argument method of `I` returning an `R`.
    #[inline]
    pub fn abstract_getter<I: ?Sized + 'static, R: 'static>(name: &'static str) -> Self {
        Self::abstract_method::<I>(name, &[], Some(TypeRef::of::<R>()))
    }

    /// An abstract one-argument method of `I` returning nothing.
    #[inline]
    pub fn abstract_setter<I: ?Sized + 'static, A: 'static>(name: &'static str) -> Self {
        Self::abstract_method::<I>(name, &[TypeRef::of::<A>()], None)
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The type declaring this method.
    #[inline]
    pub const fn owner(&self) -> TypeRef {
        self.owner
    }

    #[inline]
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    #[inline]
    pub const fn returns(&self) -> Option<TypeRef> {
        self.returns
    }

    #[inline]
    pub const fn is_abstract(&self) -> bool {
        self.body.is_none()
    }

    /// Returns `true` if this method takes exactly the given parameter types.
    pub fn has_params(&self, params: &[TypeRef]) -> bool {
        *self.params == *params
    }

    /// Calls the body, `None` for an abstract method.
    #[inline]
    pub(crate) fn call_raw(
        &self,
        target: &mut dyn Any,
        args: Vec<Value>,
    ) -> Option<Result<Option<Value>, CallError>> {
        self.body.as_ref().map(|body| body(target, args))
    }
}

impl fmt::Debug for MethodDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDesc")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{CallError, MethodDesc};
    use crate::Value;
    use alloc::vec;
    use alloc::vec::Vec;

    struct Counter {
        n: u32,
    }

    trait Countable {}

    #[test]
    fn getter_and_setter_bodies() {
        let get = MethodDesc::getter("getN", |c: &Counter| c.n);
        let set = MethodDesc::setter("setN", |c: &mut Counter, n: u32| c.n = n);
        let mut counter = Counter { n: 1 };

        let res = set.call_raw(&mut counter, vec![Value::new(5_u32)]).unwrap();
        assert!(res.unwrap().is_none());

        let res = get.call_raw(&mut counter, Vec::new()).unwrap().unwrap();
        assert_eq!(res.unwrap().take::<u32>().unwrap(), 5);
    }

    #[test]
    fn bodies_reject_mismatches() {
        let set = MethodDesc::setter("setN", |c: &mut Counter, n: u32| c.n = n);
        let mut counter = Counter { n: 1 };

        let res = set.call_raw(&mut counter, vec![Value::new("5")]).unwrap();
        assert_eq!(res.unwrap_err(), CallError::Argument { index: 0 });

        let res = set.call_raw(&mut counter, Vec::new()).unwrap();
        assert_eq!(res.unwrap_err(), CallError::Arity { expected: 1, found: 0 });

        let res = set.call_raw(&mut 3_u8, vec![Value::new(5_u32)]).unwrap();
        assert_eq!(res.unwrap_err(), CallError::Target);
        assert_eq!(counter.n, 1);
    }

    #[test]
    fn abstract_methods_have_no_body() {
        let get = MethodDesc::abstract_getter::<dyn Countable, u32>("getN");
        assert!(get.is_abstract());
        assert_eq!(get.owner().name(), "Countable");
        assert!(get.call_raw(&mut Counter { n: 0 }, Vec::new()).is_none());
    }

    #[test]
    fn action_and_function() {
        let reset = MethodDesc::action("reset", |c: &mut Counter| c.n = 0);
        let add = MethodDesc::function("add", |c: &mut Counter, by: u32| {
            c.n += by;
            c.n
        });
        let mut counter = Counter { n: 4 };

        let res = add.call_raw(&mut counter, vec![Value::new(2_u32)]).unwrap();
        assert_eq!(res.unwrap().unwrap().take::<u32>().unwrap(), 6);

        reset.call_raw(&mut counter, Vec::new()).unwrap().unwrap();
        assert_eq!(counter.n, 0);
    }
}
