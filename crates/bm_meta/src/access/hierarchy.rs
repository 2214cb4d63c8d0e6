use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use bm_utils::hash::HashSet;

use crate::MetaError;
use crate::info::{TypeDesc, Upcast};
use crate::registry::TypeSource;

/// One class of a superclass chain, with the upcasts that reach it from the start type.
#[derive(Clone)]
pub(crate) struct ClassStep<'a> {
    pub desc: &'a TypeDesc,
    pub upcasts: Arc<[Upcast]>,
}

#[inline]
pub(crate) fn lookup<S: TypeSource + ?Sized>(
    source: &S,
    ty: TypeId,
) -> Result<&TypeDesc, MetaError> {
    source.type_desc(ty).ok_or(MetaError::UnknownType(ty))
}

/// Returns `start` followed by its superclasses, most derived first.
///
/// The walk stops at the first superclass that is not registered.
pub(crate) fn class_chain<'a, S: TypeSource + ?Sized>(
    source: &'a S,
    start: &'a TypeDesc,
) -> Vec<ClassStep<'a>> {
    let mut steps: Vec<ClassStep<'a>> = Vec::new();
    let mut upcasts: Vec<Upcast> = Vec::new();
    let mut current = start;

    loop {
        steps.push(ClassStep {
            desc: current,
            upcasts: Arc::from(upcasts.as_slice()),
        });

        let Some(link) = current.superclass() else {
            break;
        };
        let Some(next) = source.type_desc(link.ty().id()) else {
            log::warn!(
                "superclass `{}` of `{}` is not registered, its members are skipped",
                link.ty(),
                current.ty(),
            );
            break;
        };
        if steps.iter().any(|step| step.desc.id() == next.id()) {
            log::warn!("superclass cycle through `{}`", next.ty());
            break;
        }

        upcasts.push(link.upcast().clone());
        current = next;
    }

    steps
}

/// Returns every interface implemented anywhere along `chain`, breadth first.
///
/// Each interface appears once even when reached along several routes.
pub(crate) fn interface_closure<'a, S: TypeSource + ?Sized>(
    source: &'a S,
    chain: &[ClassStep<'a>],
) -> Vec<&'a TypeDesc> {
    let mut visited: HashSet<TypeId> = chain.iter().map(|step| step.desc.id()).collect();
    let mut queue: VecDeque<_> = chain
        .iter()
        .flat_map(|step| step.desc.interfaces().iter().copied())
        .collect();
    let mut found = Vec::new();

    while let Some(ty) = queue.pop_front() {
        if !visited.insert(ty.id()) {
            continue;
        }
        match source.type_desc(ty.id()) {
            Some(desc) => {
                queue.extend(desc.interfaces().iter().copied());
                found.push(desc);
            }
            None => log::warn!("interface `{ty}` is not registered, its members are skipped"),
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::{class_chain, interface_closure, lookup};
    use crate::fixtures::{self, BaseBean, ChildBean, ChildChildIf, GrandChild, TestClass};
    use crate::info::TypeRef;

    #[test]
    fn chain_is_most_derived_first() {
        let registry = fixtures::registry();
        let start = lookup(&registry, TypeId::of::<GrandChild>()).unwrap();
        let chain = class_chain(&registry, start);

        let names: Vec<_> = chain.iter().map(|step| step.desc.name()).collect();
        assert_eq!(names, ["GrandChild", "ChildBean", "BaseBean"]);
        assert_eq!(chain[0].upcasts.len(), 0);
        assert_eq!(chain[2].upcasts.len(), 2);

        let grand = GrandChild::new("a", "b", "c");
        let base = crate::info::apply_chain(&chain[2].upcasts, &grand).unwrap();
        assert_eq!(base.downcast_ref::<BaseBean>().unwrap().a, "a");
        assert!(chain[1].desc.ty().is::<ChildBean>());
    }

    #[test]
    fn interfaces_are_collected_transitively() {
        let registry = fixtures::registry();
        let start = lookup(&registry, TypeId::of::<dyn ChildChildIf>()).unwrap();
        let chain = class_chain(&registry, start);
        let names: Vec<_> = interface_closure(&registry, &chain)
            .iter()
            .map(|desc| desc.name())
            .collect();
        assert_eq!(names, ["ChildIf", "ParentIf"]);

        let start = lookup(&registry, TypeId::of::<TestClass>()).unwrap();
        let chain = class_chain(&registry, start);
        assert_eq!(interface_closure(&registry, &chain).len(), 2);
    }

    #[test]
    fn unknown_type() {
        let registry = fixtures::registry();
        let err = lookup(&registry, TypeId::of::<[u8; 3]>()).unwrap_err();
        assert_eq!(err, crate::MetaError::UnknownType(TypeRef::of::<[u8; 3]>().id()));
    }
}
