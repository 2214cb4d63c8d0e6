use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::info::{CallError, TypeRef, apply_chain_mut};
use crate::{MetaError, Value};

use super::Method;

fn type_list(types: &[TypeRef]) -> Box<str> {
    types
        .iter()
        .map(TypeRef::path)
        .collect::<Vec<_>>()
        .join(", ")
        .into_boxed_str()
}

/// Calls `method` on `target` with `args`.
///
/// `target` may be an instance of the type the method was resolved on or of
/// the declaring type itself.
///
/// # Errors
///
/// - [`MetaError::AbstractMethod`] if the method has no implementation.
/// - [`MetaError::IllegalTarget`] if `target` is not a suitable instance.
/// - [`MetaError::IllegalObjectType`] if the arguments do not match the
///   parameters, naming the expected and actual argument types.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use bm_meta::access::{Introspect, invoke};
/// use bm_meta::info::TypeDesc;
/// use bm_meta::registry::TypeRegistry;
/// use bm_meta::{ErrorKind, Value};
///
/// struct Counter { n: u32 }
///
/// let mut registry = TypeRegistry::new();
/// registry.insert(
///     TypeDesc::class::<Counter>()
///         .setter("setN", |c: &mut Counter, n: u32| c.n = n)
///         .build(),
/// );
///
/// let set = registry.find_method(TypeId::of::<Counter>(), "setN(u32)").unwrap();
/// let mut counter = Counter { n: 0 };
/// invoke(&set, &mut counter, vec![Value::new(5_u32)]).unwrap();
/// assert_eq!(counter.n, 5);
///
/// let err = invoke(&set, &mut counter, vec![Value::new("five")]).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvocationType);
/// ```
pub fn invoke(
    method: &Method,
    target: &mut dyn Any,
    args: Vec<Value>,
) -> Result<Option<Value>, MetaError> {
    let desc = method.desc();
    let illegal_target = || MetaError::IllegalTarget {
        member: desc.name(),
        expected: desc.owner().name(),
    };

    if desc.is_abstract() {
        return Err(MetaError::AbstractMethod {
            owner: desc.owner().name(),
            method: desc.name(),
        });
    }

    let actual: Vec<TypeRef> = args.iter().map(Value::ty).collect();
    let this = if (*target).type_id() == desc.owner().id() {
        target
    } else {
        apply_chain_mut(method.upcasts(), target).ok_or_else(illegal_target)?
    };

    log::trace!("invoking {method:?} with {} argument(s)", actual.len());
    match desc.call_raw(this, args) {
        Some(Ok(returned)) => Ok(returned),
        Some(Err(CallError::Target)) => Err(illegal_target()),
        Some(Err(CallError::Arity { .. } | CallError::Argument { .. })) => {
            Err(MetaError::IllegalObjectType {
                method: desc.name(),
                expected: type_list(desc.params()),
                actual: type_list(&actual),
            })
        }
        None => Err(MetaError::AbstractMethod {
            owner: desc.owner().name(),
            method: desc.name(),
        }),
    }
}
