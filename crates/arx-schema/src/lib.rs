//! Shared vocabulary for arx: artifact coordinates, dotted-integer versions,
//! and the constraint intervals that select among them.
//!
//! This crate is pure data and parsing; nothing here touches the
//! filesystem.

pub mod spec;
pub mod version;

// Re-exports
pub use spec::*;
pub use version::*;
