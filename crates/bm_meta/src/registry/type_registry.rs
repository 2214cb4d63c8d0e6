use core::any::TypeId;

use bm_utils::TypeIdMap;
use bm_utils::hash::{HashMap, HashSet};

use crate::info::TypeDesc;

// -----------------------------------------------------------------------------
// TypeSource

/// A provider of type metadata.
///
/// This is the only capability the resolvers in [`access`](crate::access) need.
/// [`TypeRegistry`] is the provided implementation; anything that can map a
/// [`TypeId`] to a [`TypeDesc`] may stand in for it.
pub trait TypeSource {
    /// Returns the descriptor of the type, or `None` if it is unknown.
    fn type_desc(&self, type_id: TypeId) -> Option<&TypeDesc>;
}

impl<S: TypeSource + ?Sized> TypeSource for &S {
    #[inline]
    fn type_desc(&self, type_id: TypeId) -> Option<&TypeDesc> {
        (**self).type_desc(type_id)
    }
}

// -----------------------------------------------------------------------------
// Described

/// A type that can produce its own [`TypeDesc`].
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use bm_meta::info::TypeDesc;
/// use bm_meta::registry::{Described, TypeRegistry};
///
/// struct Tag { label: String }
///
/// impl Described for Tag {
///     fn describe() -> TypeDesc {
///         TypeDesc::class::<Tag>()
///             .getter("getLabel", |t: &Tag| t.label.clone())
///             .build()
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Tag>();
/// assert!(registry.contains(TypeId::of::<Tag>()));
/// ```
pub trait Described: 'static {
    fn describe() -> TypeDesc;

    /// Registers the types this type refers to, such as its superclass.
    ///
    /// Called once, right after the type itself was registered.
    fn register_dependencies(_registry: &mut TypeRegistry) {}

    #[doc(hidden)]
    fn __register(registry: &mut TypeRegistry) {
        registry.register::<Self>();
    }
}

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of described types.
///
/// Types are keyed by [`TypeId`] and additionally indexed by full type path and
/// by short type name. Short names that collide are marked ambiguous and are no
/// longer resolvable by name.
///
/// # Example
///
/// ```
/// use bm_meta::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let desc = registry.get_with_type_name("String").unwrap();
/// assert_eq!(desc.ty().path(), "alloc::string::String");
/// ```
pub struct TypeRegistry {
    type_desc_table: TypeIdMap<TypeDesc>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_desc_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Create a type registry with the built-in types.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `&'static str`
    /// - `String`, as a class with the private fields `vec` and `len`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        super::builtin::register_builtins(&mut registry);
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        desc: &TypeDesc,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = desc.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        type_path_to_id.insert(ty.path(), ty.id());
    }

    /// Inserts the descriptor unless its type is already registered.
    ///
    /// Returns `true` if the descriptor was inserted.
    pub fn try_insert(&mut self, desc: TypeDesc) -> bool {
        self.type_desc_table.try_insert(desc.id(), || {
            Self::add_new_type_indices(
                &desc,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            desc
        })
    }

    /// Inserts or **overwrites** the descriptor of a type.
    ///
    /// Overwriting keeps the existing name indices.
    pub fn insert(&mut self, desc: TypeDesc) {
        if !self.type_desc_table.contains(&desc.id()) {
            Self::add_new_type_indices(
                &desc,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
        }
        self.type_desc_table.insert(desc.id(), desc);
    }

    /// Registers `T` if it has not been registered yet, then its dependencies.
    pub fn register<T: Described + ?Sized>(&mut self) {
        if self.try_insert(T::describe()) {
            T::register_dependencies(self);
        }
    }

    /// Registers every type submitted with [`auto_register!`](crate::auto_register).
    ///
    /// Returns `false` if the `auto_register` feature is disabled.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_types(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_desc_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeDesc> {
        self.type_desc_table.get(&type_id)
    }

    /// Returns the descriptor of the type with the given full path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeDesc> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the descriptor of the type with the given short name,
    /// `None` if the name is ambiguous.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeDesc> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the short name matches several registered types.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns an iterator over the registered descriptors, in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeDesc> {
        self.type_desc_table.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_desc_table.len()
    }
}

impl TypeSource for TypeRegistry {
    #[inline]
    fn type_desc(&self, type_id: TypeId) -> Option<&TypeDesc> {
        self.get(type_id)
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

#[cfg(feature = "std")]
pub use arc::TypeRegistryArc;

#[cfg(feature = "std")]
mod arc {
    use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

    use super::TypeRegistry;

    /// A [`TypeRegistry`] shared between threads.
    ///
    /// Lookups only need the read lock, so concurrent resolution never contends.
    #[derive(Clone, Default)]
    pub struct TypeRegistryArc {
        /// The wrapped [`TypeRegistry`].
        pub internal: Arc<RwLock<TypeRegistry>>,
    }

    impl TypeRegistryArc {
        /// Takes a read lock on the underlying [`TypeRegistry`].
        pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
            self.internal.read().unwrap_or_else(PoisonError::into_inner)
        }

        /// Takes a write lock on the underlying [`TypeRegistry`].
        pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
            self.internal
                .write()
                .unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl core::fmt::Debug for TypeRegistryArc {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            self.read().type_path_to_id.keys().fmt(f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Described, TypeRegistry, TypeSource};
    use crate::info::{TypeDesc, TypeKind};
    use core::any::TypeId;

    mod foo {
        pub struct Item;
    }

    mod bar {
        pub struct Item;
    }

    struct Base;

    struct Derived {
        base: Base,
    }

    impl Described for Base {
        fn describe() -> TypeDesc {
            TypeDesc::class::<Base>().build()
        }
    }

    impl Described for Derived {
        fn describe() -> TypeDesc {
            TypeDesc::class::<Derived>()
                .extends(|d: &Derived| &d.base, |d: &mut Derived| &mut d.base)
                .build()
        }

        fn register_dependencies(registry: &mut TypeRegistry) {
            registry.register::<Base>();
        }
    }

    #[test]
    fn builtins() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeId::of::<u8>()));
        assert!(registry.contains(TypeId::of::<&'static str>()));
        assert_eq!(
            registry.get(TypeId::of::<i32>()).unwrap().kind(),
            TypeKind::Primitive
        );
        assert_eq!(registry.get_with_type_name("String").unwrap().kind(), TypeKind::Class);
        assert!(TypeRegistry::empty().type_desc(TypeId::of::<u8>()).is_none());
    }

    #[test]
    fn register_with_dependencies() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Derived>();
        assert!(registry.contains(TypeId::of::<Base>()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn ambiguous_names() {
        let mut registry = TypeRegistry::empty();
        registry.insert(TypeDesc::class::<foo::Item>().build());
        assert!(registry.get_with_type_name("Item").is_some());

        assert!(registry.try_insert(TypeDesc::class::<bar::Item>().build()));
        assert!(registry.is_ambiguous("Item"));
        assert!(registry.get_with_type_name("Item").is_none());
        assert!(registry.get_with_type_path(core::any::type_name::<bar::Item>()).is_some());

        assert!(!registry.try_insert(TypeDesc::class::<bar::Item>().build()));
    }

    #[cfg(feature = "std")]
    #[test]
    fn shared_registry_survives_a_poisoned_lock() {
        use std::sync::{Arc, RwLock};
        use std::thread;

        use super::TypeRegistryArc;
        use crate::access::Introspect;
        use crate::fixtures::{self, GrandChild};

        let arc = TypeRegistryArc {
            internal: Arc::new(RwLock::new(TypeRegistry::empty())),
        };
        *arc.write() = fixtures::registry();

        let props = arc.read().list_accessors(TypeId::of::<GrandChild>()).unwrap();
        assert_eq!(props.len(), 3);

        let shared = arc.clone();
        let poisoned = thread::spawn(move || {
            let _guard = shared.write();
            panic!("poison the registry lock");
        })
        .join();
        assert!(poisoned.is_err());
        assert!(arc.internal.is_poisoned());

        let registry = arc.read();
        let method = registry.find_zero_arg_method(TypeId::of::<GrandChild>(), "getB").unwrap();
        assert_eq!(method.owner().name(), "ChildBean");
    }
}
