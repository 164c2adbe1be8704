//! Instruction-tree parsing.
//!
//! The document model only needs a flat list of instruction nodes, so any
//! tokenizer that can produce [`InstructionNode`]s can feed it. The crate
//! ships a line-oriented implementation, [`LineParser`].

pub mod line;

pub use line::LineParser;

use dfpatch_core::error::Result;

/// One parsed instruction as produced by an [`InstructionParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionNode {
    /// Instruction keyword as written
    pub name: String,
    /// Leading `--flag` tokens
    pub flags: Vec<String>,
    /// Positional arguments in order
    pub values: Vec<String>,
    /// Logical source line (continuations joined)
    pub original: String,
    /// First physical line, 1-based
    pub start_line: usize,
    /// Last physical line consumed, inclusive
    pub end_line: usize,
}

/// Turns Dockerfile text into instruction nodes in source order.
pub trait InstructionParser {
    fn parse(&self, content: &str) -> Result<Vec<InstructionNode>>;
}
