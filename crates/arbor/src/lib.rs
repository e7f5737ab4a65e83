//! Umbrella crate that re-exports the `arbor-*` building blocks.
//!
//! This crate is intended as a convenient entrypoint for hosts embedding the
//! interpreter.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use arbor_core as core;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use arbor_bt as bt;

#[cfg(feature = "nodes")]
#[cfg_attr(docsrs, doc(cfg(feature = "nodes")))]
pub use arbor_nodes as nodes;
