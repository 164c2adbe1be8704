//! dfpatch Core - shared error and configuration types
//!
//! Used by the `dfpatch` crate and by callers that need to match on its
//! errors or build its configuration without pulling in the model.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{ContinuationPolicy, ParserConfig, RenderConfig, DEFAULT_ESCAPE};
pub use error::{DfError, Result};

/// dfpatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
