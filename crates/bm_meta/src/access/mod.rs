//! Queries over registered types: accessor listing, deep paths, fields and
//! methods, and calling through the resolved handles.
//!
//! All queries are provided by [`Introspect`], implemented for every
//! [`TypeSource`]. A query never mutates the source; resolving the same request
//! twice against an unchanged registry gives equivalent results.
//!
//! ## Inheritance
//!
//! A type's members are looked up on the type itself, then on its superclasses
//! (most derived first), then on every interface reachable from any of them.
//! When a property is declared more than once, the most derived class
//! declaration wins and later declarations only fill in a missing read or
//! write method of the same value type.

mod field;
mod hierarchy;
mod invoke;
mod method;
mod path;
mod property;

pub use field::FieldHandle;
pub use invoke::invoke;
pub use method::{Method, MethodSpec};
pub use path::{DeepPath, PathElement, Segment, SlotHandle};
pub use property::PropertyDescriptor;

use alloc::vec::Vec;
use core::any::TypeId;

use crate::MetaError;
use crate::registry::TypeSource;

/// Metadata queries, available on every [`TypeSource`].
///
/// Every query takes the [`TypeId`] of the start type. An unregistered start
/// type fails with [`MetaError::UnknownType`].
pub trait Introspect: TypeSource {
    /// Lists the properties of `ty`, including inherited and interface ones.
    ///
    /// Each name appears once; order is unspecified.
    fn list_accessors(&self, ty: TypeId) -> Result<Vec<PropertyDescriptor>, MetaError> {
        property::list_accessors(self, ty)
    }

    /// Finds the property `name` of `ty`, `Ok(None)` if there is none.
    ///
    /// A dotted `name` is resolved as a deep path and yields its last property.
    /// `map_id` identifies the calling mapping in log records only.
    fn find_accessor(
        &self,
        ty: TypeId,
        name: &str,
        map_id: Option<&str>,
    ) -> Result<Option<PropertyDescriptor>, MetaError> {
        property::find_accessor(self, ty, name, map_id)
    }

    /// Resolves a dotted path such as `address.city` or `contacts[0].city`
    /// into one element per segment.
    ///
    /// A segment names a property, or failing that a field declared on the
    /// current type or its superclasses. An indexed segment must reach a
    /// registered sequence; the next segment then applies to its element type.
    ///
    /// # Errors
    ///
    /// - [`MetaError::NotDeepField`] if `path` has a single segment.
    /// - [`MetaError::MalformedPath`] if a segment is empty or badly indexed.
    /// - [`MetaError::FieldHierarchyNotFound`] if a segment cannot be resolved.
    fn resolve_deep_path(
        &self,
        ty: TypeId,
        path: &str,
        map_id: Option<&str>,
    ) -> Result<Vec<PathElement>, MetaError> {
        path::resolve_deep_path(self, ty, path, map_id)
    }

    /// Finds the field `name` declared on `ty` or one of its superclasses.
    ///
    /// The returned handle is accessible regardless of the field's visibility.
    fn get_field(&self, ty: TypeId, name: &str) -> Result<FieldHandle, MetaError> {
        field::get_field(self, ty, name)
    }

    /// Finds a method without parameters, referenced as `name` or `name()`.
    fn find_zero_arg_method(&self, ty: TypeId, spec: &str) -> Result<Method, MetaError> {
        method::find_zero_arg_method(self, ty, spec)
    }

    /// Finds a method by reference, see [`MethodSpec`].
    ///
    /// Without a parameter list the first method of that name is returned.
    fn find_method(&self, ty: TypeId, spec: &str) -> Result<Method, MetaError> {
        method::find_method(self, ty, spec)
    }

    /// Finds the first method called exactly `name`, whatever its parameters.
    fn find_method_by_name(&self, ty: TypeId, name: &str) -> Result<Method, MetaError> {
        method::find_method_by_name(self, ty, name)
    }
}

impl<S: TypeSource + ?Sized> Introspect for S {}
