//! dfpatch - round-trip Dockerfile model.
//!
//! Parses a Dockerfile into structured commands, rewrites the tag of the
//! base image, and writes the document back with its original line layout.
//!
//! ```text
//! let mut df = Dockerfile::parse(&text)?;
//! df.set_base_image_tag("1.2.4")?;
//! df.write_contents(&mut std::io::stdout())?;
//! ```

pub mod command;
pub mod document;
pub mod parser;
pub mod reference;
mod serializer;

// Re-export common types
pub use command::{render_command, Command, InstructionKind};
pub use document::Dockerfile;
pub use parser::{InstructionNode, InstructionParser, LineParser};
pub use reference::ImageReference;

pub use dfpatch_core::{ContinuationPolicy, DfError, ParserConfig, RenderConfig, Result};

/// dfpatch version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
