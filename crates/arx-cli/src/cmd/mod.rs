//! Command implementations

pub mod completions;
pub mod export;
pub mod resolve;
pub mod stamp;
pub mod verify;
