//! Metadata resolution for object-to-object mapping.
//!
//! A mapping engine knows *what* to copy between two unrelated type hierarchies;
//! this crate answers *where the slot is*: given a type and a name or dotted path,
//! which accessor pair, field or method reads or writes it.
//!
//! Rust has no runtime reflection, so types describe themselves once through a
//! [`TypeDesc`](info::TypeDesc) stored in a [`TypeRegistry`](registry::TypeRegistry).
//! Every query then goes through the [`Introspect`](access::Introspect) extension
//! trait, implemented for any [`TypeSource`](registry::TypeSource).
//!
//! ## Menu
//!
//! - [`info`]: type, field and method descriptors, and their builders.
//! - [`registry`]: the [`TypeRegistry`](registry::TypeRegistry) and the
//!   [`Described`](registry::Described) trait.
//! - [`access`]: accessor directory, deep paths, fields, method lookup and invocation.
//! - [`cache`]: caller-owned memoization of accessor listings (`std` only).
//!
//! # Examples
//!
//! ```
//! use core::any::TypeId;
//! use bm_meta::access::Introspect;
//! use bm_meta::info::TypeDesc;
//! use bm_meta::registry::TypeRegistry;
//! use bm_meta::Value;
//!
//! #[derive(Default)]
//! struct Point { x: i32 }
//!
//! let mut registry = TypeRegistry::new();
//! registry.insert(
//!     TypeDesc::class::<Point>()
//!         .getter("getX", |p: &Point| p.x)
//!         .setter("setX", |p: &mut Point, x: i32| p.x = x)
//!         .build(),
//! );
//!
//! let prop = registry.find_accessor(TypeId::of::<Point>(), "x", None).unwrap().unwrap();
//! let mut point = Point::default();
//! prop.write(&mut point, Value::new(7_i32)).unwrap();
//! assert_eq!(point.x, 7);
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod value;

pub mod access;
pub mod info;
pub mod registry;

#[cfg(feature = "std")]
pub mod cache;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::{ErrorKind, MetaError};
pub use value::Value;
