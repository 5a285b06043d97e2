pub mod assemble;
pub mod descriptor;
pub mod manifest;
pub mod pattern;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod select;
pub mod stamp;

pub mod reporter;

pub use report::{ResolutionEntry, ResolutionReport};
pub use reporter::{NullReporter, Reporter};
pub use resolve::{BuildConfig, ResolveError, resolve_all, resolve_spec};
pub use select::Strategy;

/// Default archive extension for resolved artifacts
pub const DEFAULT_ARCHIVE_EXT: &str = "jar";
