//! Boundary cache: one resolved boundary per archive for the whole run

pub mod boundary_cache;
pub mod metrics;

pub use boundary_cache::BoundaryCache;
pub use metrics::BoundaryCacheMetrics;
