//! Shared containers for the `bm` workspace.
//!
//! - [`hash`]: `hashbrown` maps and sets driven by a fixed `foldhash` seed.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) that skips rehashing.
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
