//! Metadata resolution for object-to-object mapping.
//!
//! - [`meta`]: type descriptors, the registry and every resolution query.
//! - [`utils`]: hash containers and the `TypeId` keyed map.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use bm_meta as meta;
pub use bm_utils as utils;
