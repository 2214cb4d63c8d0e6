//! Descriptors of registered types.
//!
//! ## Menu
//!
//! - [`TypeRef`]: a `TypeId` with its path and short name.
//! - [`TypeDesc`]: the kind, superclass, interfaces, fields and methods of a type.
//! - [`TypeDescBuilder`]: typed construction of a [`TypeDesc`].
//! - [`FieldDesc`]: a declared field with its [`Visibility`].
//! - [`MethodDesc`]: a declared method, abstract or with a type-erased body.
//! - [`Upcast`]: projection from a type to its superclass part.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod field_desc;
mod method_desc;
mod type_desc;
mod type_ref;
mod upcast;

// -----------------------------------------------------------------------------
// Exports

pub use builder::TypeDescBuilder;
pub use field_desc::{FieldDesc, Visibility};
pub use method_desc::{CallError, MethodDesc};
pub use type_desc::{SuperLink, TypeDesc, TypeKind};
pub use type_ref::TypeRef;
pub use upcast::Upcast;

pub(crate) use upcast::{apply_chain, apply_chain_mut};
