//! Feature slices, leaves first
//!
//! owner_resolution → module_descriptor → boundary → policy → cache → filter,
//! with transform as an independent post-filter over difference reports.

pub mod boundary;
pub mod cache;
pub mod filter;
pub mod module_descriptor;
pub mod owner_resolution;
pub mod policy;
pub mod transform;
