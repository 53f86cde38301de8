//! Core type definitions using newtype patterns for type safety.
//!
//! These types prevent common logic errors by making invalid states unrepresentable.

mod port;
mod scan_id;
mod target;

pub use port::{Port, PortError, PortRange};
pub use scan_id::ScanId;
pub use target::Target;
