//! API boundary family: platform, proprietary and the memoizing decorator

pub mod cached;
pub mod platform;
pub mod ports;
pub mod proprietary;

pub use cached::CachedApiBoundary;
pub use platform::PlatformApiBoundary;
pub use ports::{ApiBoundary, ApiBoundaryExt, BoundaryKind};
pub use proprietary::ProprietaryApiBoundary;
