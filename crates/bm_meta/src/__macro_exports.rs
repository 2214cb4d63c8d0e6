//! Items used by exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::TypeRegistry;

    /// A registration function submitted by [`auto_register!`](crate::auto_register).
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}

/// Submits [`Described`](crate::registry::Described) types for
/// [`TypeRegistry::auto_register`](crate::registry::TypeRegistry::auto_register).
///
/// Expands to nothing without the `auto_register` feature.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use bm_meta::info::TypeDesc;
/// use bm_meta::registry::{Described, TypeRegistry};
///
/// pub struct Invoice;
///
/// impl Described for Invoice {
///     fn describe() -> TypeDesc {
///         TypeDesc::class::<Invoice>().build()
///     }
/// }
///
/// bm_meta::auto_register!(Invoice);
///
/// let mut registry = TypeRegistry::empty();
/// if registry.auto_register() {
///     assert!(registry.contains(TypeId::of::<Invoice>()));
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::__macro_exports::auto_register::inventory::submit! {
                $crate::__macro_exports::auto_register::__AutoRegisterFunc(
                    <$ty as $crate::registry::Described>::__register
                )
            }
        )+
    };
}

#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {};
}
