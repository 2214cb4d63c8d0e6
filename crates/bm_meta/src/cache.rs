//! Caller-owned memoization of accessor listings.
//!
//! Resolution is a pure function of the registry, so its results can be
//! reused for as long as the registry is not changed. The cache is keyed by
//! start type only: use one cache per registry, and [`clear`](AccessorCache::clear)
//! it after registering more types.

use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use bm_utils::TypeIdMap;

use crate::MetaError;
use crate::access::{Introspect, PropertyDescriptor};
use crate::registry::TypeSource;

type Listing = Result<Arc<[PropertyDescriptor]>, MetaError>;

/// A thread-safe cache of [`Introspect::list_accessors`] results.
///
/// Each type is resolved at most once, even when several threads ask for it
/// at the same time: latecomers block until the first resolution completes and
/// then share its result. Failures are cached like successes.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use bm_meta::cache::AccessorCache;
/// use bm_meta::info::TypeDesc;
/// use bm_meta::registry::TypeRegistry;
///
/// struct User { name: String }
///
/// let mut registry = TypeRegistry::new();
/// registry.insert(
///     TypeDesc::class::<User>()
///         .getter("getName", |u: &User| u.name.clone())
///         .build(),
/// );
///
/// let cache = AccessorCache::new();
/// let first = cache.list_accessors(&registry, TypeId::of::<User>()).unwrap();
/// let again = cache.list_accessors(&registry, TypeId::of::<User>()).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &again));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Default)]
pub struct AccessorCache {
    entries: RwLock<TypeIdMap<Arc<OnceLock<Listing>>>>,
}

impl AccessorCache {
    pub const fn new() -> Self {
        Self {
            entries: RwLock::new(TypeIdMap::new()),
        }
    }

    fn slot(&self, ty: TypeId) -> Arc<OnceLock<Listing>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = entries.get(&ty) {
            return slot.clone();
        }
        drop(entries);

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(ty, || Arc::new(OnceLock::new()))
            .clone()
    }

    /// Lists the accessors of `ty`, resolving them against `source` on first use.
    pub fn list_accessors<S: TypeSource + ?Sized>(&self, source: &S, ty: TypeId) -> Listing {
        self.slot(ty)
            .get_or_init(|| {
                let listing: Listing = source.list_accessors(ty).map(Arc::from);
                match &listing {
                    Ok(props) => log::debug!("cached {} accessor(s) of {ty:?}", props.len()),
                    Err(err) => log::debug!("cached failure for {ty:?}: {err}"),
                }
                listing
            })
            .clone()
    }

    /// Finds the accessor `name` of `ty`.
    ///
    /// Plain names are answered from the cached listing; dotted names are
    /// resolved as deep paths on every call.
    pub fn find_accessor<S: TypeSource + ?Sized>(
        &self,
        source: &S,
        ty: TypeId,
        name: &str,
        map_id: Option<&str>,
    ) -> Result<Option<PropertyDescriptor>, MetaError> {
        if name.contains('.') {
            return source.find_accessor(ty, name, map_id);
        }
        let props = self.list_accessors(source, ty)?;
        Ok(props.iter().find(|prop| prop.name() == name).cloned())
    }

    /// Returns the number of cached types, failures included.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every cached listing.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for AccessorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::any::TypeId;
    use std::thread;

    use super::AccessorCache;
    use crate::ErrorKind;
    use crate::fixtures::{self, GrandChild, Person, TestClass};

    #[test]
    fn caches_successes_and_failures() {
        let registry = fixtures::registry();
        let cache = AccessorCache::new();
        assert!(cache.is_empty());

        let first = cache.list_accessors(&registry, TypeId::of::<TestClass>()).unwrap();
        let second = cache.list_accessors(&registry, TypeId::of::<TestClass>()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 3);

        let err = cache.list_accessors(&registry, TypeId::of::<Vec<u8>>()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn find_plain_and_dotted() {
        let registry = fixtures::registry();
        let cache = AccessorCache::new();

        let prop = cache
            .find_accessor(&registry, TypeId::of::<GrandChild>(), "b", None)
            .unwrap()
            .unwrap();
        assert_eq!(prop.declared_on().name(), "ChildBean");

        let prop = cache
            .find_accessor(&registry, TypeId::of::<Person>(), "address.city", Some("map"))
            .unwrap()
            .unwrap();
        assert_eq!(prop.name(), "city");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_callers_share_one_listing() {
        let registry = fixtures::registry();
        let cache = AccessorCache::new();

        let listings: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| cache.list_accessors(&registry, TypeId::of::<GrandChild>()))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap().unwrap())
                .collect()
        });

        assert!(listings.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        assert_eq!(cache.len(), 1);
    }
}
