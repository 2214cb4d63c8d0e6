use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use crate::info::{FieldDesc, MethodDesc, TypeDescBuilder, TypeRef, Upcast};

// -----------------------------------------------------------------------------
// TypeKind

/// What kind of type a [`TypeDesc`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A terminal value type; never introspected further.
    Primitive,
    Class,
    Interface,
    /// An indexable collection whose elements are `element`.
    Sequence { element: TypeRef },
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Class => f.pad("Class"),
            Self::Interface => f.pad("Interface"),
            Self::Sequence { .. } => f.pad("Sequence"),
        }
    }
}

// -----------------------------------------------------------------------------
// SuperLink

/// The superclass of a class, with the [`Upcast`] reaching it.
#[derive(Debug, Clone)]
pub struct SuperLink {
    ty: TypeRef,
    upcast: Upcast,
}

impl SuperLink {
    #[inline]
    pub(crate) fn new(upcast: Upcast) -> Self {
        Self {
            ty: upcast.to(),
            upcast,
        }
    }

    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub const fn upcast(&self) -> &Upcast {
        &self.upcast
    }
}

// -----------------------------------------------------------------------------
// TypeDesc

/// Everything the resolvers need to know about one registered type.
///
/// Only the members declared by the type itself are stored here; inherited
/// members are found by walking [`superclass`](Self::superclass) and
/// [`interfaces`](Self::interfaces) through a [`TypeSource`](crate::registry::TypeSource).
///
/// # Examples
///
/// ```
/// use bm_meta::info::{TypeDesc, TypeKind, Visibility};
///
/// trait Named {}
///
/// struct Base { id: u32 }
/// struct User { base: Base, name: String }
///
/// let desc = TypeDesc::class::<User>()
///     .extends(|u: &User| &u.base, |u: &mut User| &mut u.base)
///     .implements::<dyn Named>()
///     .field("name", Visibility::Private, |u: &User| u.name.clone(), |u: &mut User, v| u.name = v)
///     .getter("getName", |u: &User| u.name.clone())
///     .build();
///
/// assert_eq!(desc.kind(), TypeKind::Class);
/// assert_eq!(desc.superclass().unwrap().ty().name(), "Base");
/// assert_eq!(desc.interfaces()[0].name(), "Named");
/// assert!(desc.field("name").is_some());
/// assert_eq!(desc.methods().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TypeDesc {
    ty: TypeRef,
    kind: TypeKind,
    superclass: Option<SuperLink>,
    interfaces: Vec<TypeRef>,
    fields: Vec<Arc<FieldDesc>>,
    methods: Vec<Arc<MethodDesc>>,
}

impl TypeDesc {
    pub(crate) fn empty(ty: TypeRef, kind: TypeKind) -> Self {
        Self {
            ty,
            kind,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Starts describing the class `T`.
    #[inline]
    pub fn class<T: 'static>() -> TypeDescBuilder<T> {
        TypeDescBuilder::new(TypeKind::Class)
    }

    /// Starts describing the interface `I`, usually a `dyn Trait`.
    #[inline]
    pub fn interface<I: ?Sized + 'static>() -> TypeDescBuilder<I> {
        TypeDescBuilder::new(TypeKind::Interface)
    }

    /// Describes a terminal value type.
    #[inline]
    pub fn primitive<T: 'static>() -> Self {
        Self::empty(TypeRef::of::<T>(), TypeKind::Primitive)
    }

    /// Describes a collection `C` of `E`s, reachable through indexed path segments.
    #[inline]
    pub fn sequence<C: 'static, E: 'static>() -> Self {
        Self::empty(
            TypeRef::of::<C>(),
            TypeKind::Sequence {
                element: TypeRef::of::<E>(),
            },
        )
    }

    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.ty.id()
    }

    /// The short type name, see [`TypeRef::name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns `true` for classes and interfaces, the types a path can walk through.
    #[inline]
    pub const fn is_introspectable(&self) -> bool {
        matches!(self.kind, TypeKind::Class | TypeKind::Interface)
    }

    #[inline]
    pub const fn superclass(&self) -> Option<&SuperLink> {
        self.superclass.as_ref()
    }

    /// Directly implemented interfaces of a class, or extended interfaces of an interface.
    #[inline]
    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    #[inline]
    pub fn fields(&self) -> &[Arc<FieldDesc>] {
        &self.fields
    }

    #[inline]
    pub fn methods(&self) -> &[Arc<MethodDesc>] {
        &self.methods
    }

    /// Returns the field declared on this type with the given name.
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDesc>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the methods declared on this type with the given name.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<MethodDesc>> {
        self.methods.iter().filter(move |m| m.name() == name)
    }

    pub(crate) fn set_superclass(&mut self, link: SuperLink) {
        self.superclass = Some(link);
    }

    pub(crate) fn push_interface(&mut self, ty: TypeRef) {
        if !self.interfaces.contains(&ty) {
            self.interfaces.push(ty);
        }
    }

    pub(crate) fn push_field(&mut self, field: FieldDesc) {
        self.fields.push(Arc::new(field));
    }

    pub(crate) fn push_method(&mut self, method: MethodDesc) {
        self.methods.push(Arc::new(method));
    }
}
