//! Provide the type registry the resolvers read metadata from.
//!
//! ## Menu
//!
//! - [`TypeSource`]: the one capability the resolvers consume, "give me the
//!   [`TypeDesc`] of this `TypeId`".
//! - [`Described`]: implemented by types that can describe themselves.
//! - [`TypeRegistry`]: the default [`TypeSource`], a table of registered descriptors.
//! - [`TypeRegistryArc`]: a shared, lock-protected registry (`std` only).
//!
//! ## auto_register
//!
//! With the `auto_register` feature, [`auto_register!`](crate::auto_register)
//! submits a type to a link-time list through the [`inventory`] crate, and
//! [`TypeRegistry::auto_register`] registers every submitted type at once.
//!
//! [`TypeDesc`]: crate::info::TypeDesc
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod builtin;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_registry::{Described, TypeRegistry, TypeSource};

#[cfg(feature = "std")]
pub use type_registry::TypeRegistryArc;
