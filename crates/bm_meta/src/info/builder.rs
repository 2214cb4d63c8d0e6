use core::marker::PhantomData;

use crate::info::{
    FieldDesc, MethodDesc, SuperLink, TypeDesc, TypeKind, TypeRef, Upcast, Visibility,
};

/// Builds a [`TypeDesc`] for `T`.
///
/// Created by [`TypeDesc::class`] or [`TypeDesc::interface`]. Members that need
/// a value of `T` (fields, bodies, the superclass projection) are only available
/// for sized types; interfaces declare abstract methods.
pub struct TypeDescBuilder<T: ?Sized> {
    desc: TypeDesc,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized + 'static> TypeDescBuilder<T> {
    pub(crate) fn new(kind: TypeKind) -> Self {
        Self {
            desc: TypeDesc::empty(TypeRef::of::<T>(), kind),
            _marker: PhantomData,
        }
    }

    /// Adds a directly implemented (or, for an interface, extended) interface.
    pub fn implements<I: ?Sized + 'static>(mut self) -> Self {
        self.desc.push_interface(TypeRef::of::<I>());
        self
    }

    /// Adds a method declared by `T`.
    pub fn method(mut self, method: MethodDesc) -> Self {
        debug_assert!(
            method.owner().is::<T>(),
            "method `{}` is declared on `{}`, not on `{}`",
            method.name(),
            method.owner(),
            self.desc.ty(),
        );
        self.desc.push_method(method);
        self
    }

    /// Adds an abstract zero-argument method returning an `R`.
    pub fn abstract_getter<R: 'static>(self, name: &'static str) -> Self {
        self.method(MethodDesc::abstract_getter::<T, R>(name))
    }

    /// Adds an abstract one-argument method taking an `A`.
    pub fn abstract_setter<A: 'static>(self, name: &'static str) -> Self {
        self.method(MethodDesc::abstract_setter::<T, A>(name))
    }

    #[inline]
    pub fn build(self) -> TypeDesc {
        self.desc
    }
}

impl<T: 'static> TypeDescBuilder<T> {
    /// Sets the superclass `S`, embedded in `T` and reached through the projections.
    pub fn extends<S, R, M>(mut self, project: R, project_mut: M) -> Self
    where
        S: 'static,
        R: Fn(&T) -> &S + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut S + Send + Sync + 'static,
    {
        let upcast = Upcast::new::<T, S, R, M>(project, project_mut);
        self.desc.set_superclass(SuperLink::new(upcast));
        self
    }

    /// Adds a readable and writable field.
    pub fn field<V, G, S>(
        mut self,
        name: &'static str,
        visibility: Visibility,
        get: G,
        set: S,
    ) -> Self
    where
        V: 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.desc
            .push_field(FieldDesc::new::<T, V, G, S>(name, visibility, get, set));
        self
    }

    /// Adds a field that can only be read.
    pub fn read_only_field<V, G>(
        mut self,
        name: &'static str,
        visibility: Visibility,
        get: G,
    ) -> Self
    where
        V: 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.desc
            .push_field(FieldDesc::read_only::<T, V, G>(name, visibility, get));
        self
    }

    /// Adds a zero-argument method returning an `R`.
    pub fn getter<R, F>(self, name: &'static str, f: F) -> Self
    where
        R: 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.method(MethodDesc::getter::<T, R, F>(name, f))
    }

    /// Adds a one-argument method taking an `A`.
    pub fn setter<A, F>(self, name: &'static str, f: F) -> Self
    where
        A: 'static,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        self.method(MethodDesc::setter::<T, A, F>(name, f))
    }

    /// Adds a zero-argument method returning nothing.
    pub fn action<F>(self, name: &'static str, f: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.method(MethodDesc::action::<T, F>(name, f))
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{TypeDesc, TypeKind, Visibility};

    trait Shape {}

    struct Base {
        id: u32,
    }

    struct Square {
        base: Base,
        side: f64,
    }

    #[test]
    fn builds_class() {
        let desc = TypeDesc::class::<Square>()
            .extends(|s: &Square| &s.base, |s: &mut Square| &mut s.base)
            .implements::<dyn Shape>()
            .implements::<dyn Shape>()
            .field("side", Visibility::Public, |s: &Square| s.side, |s: &mut Square, v| s.side = v)
            .getter("getSide", |s: &Square| s.side)
            .setter("setSide", |s: &mut Square, v: f64| s.side = v)
            .build();

        assert_eq!(desc.kind(), TypeKind::Class);
        assert!(desc.is_introspectable());
        assert_eq!(desc.interfaces().len(), 1);
        assert_eq!(desc.methods_named("getSide").count(), 1);
        assert_eq!(desc.field("side").unwrap().ty().name(), "f64");

        let link = desc.superclass().unwrap();
        let square = Square {
            base: Base { id: 4 },
            side: 1.0,
        };
        let base = link.upcast().apply(&square).unwrap();
        assert_eq!(base.downcast_ref::<Base>().unwrap().id, 4);
    }

    #[test]
    fn builds_interface() {
        let desc = TypeDesc::interface::<dyn Shape>()
            .abstract_getter::<f64>("getArea")
            .abstract_setter::<f64>("setArea")
            .build();

        assert_eq!(desc.kind(), TypeKind::Interface);
        assert!(desc.methods().iter().all(|m| m.is_abstract()));
        assert_eq!(desc.name(), "Shape");
    }

    #[test]
    fn terminal_kinds() {
        assert!(!TypeDesc::primitive::<u8>().is_introspectable());
        let seq = TypeDesc::sequence::<alloc::vec::Vec<u8>, u8>();
        assert_eq!(seq.kind(), TypeKind::Sequence { element: crate::info::TypeRef::of::<u8>() });
    }
}
