//! Dockerfile document model.
//!
//! Holds the commands of a Dockerfile in source order and exposes the
//! base-image retagging operation.

use std::io::Read;

use dfpatch_core::error::{DfError, Result};

use crate::command::{Command, InstructionKind};
use crate::parser::{InstructionNode, InstructionParser, LineParser};
use crate::reference::ImageReference;

/// Parsed Dockerfile: its commands in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dockerfile {
    pub commands: Vec<Command>,
}

impl Dockerfile {
    /// Wrap commands that are already in source order.
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// Parse Dockerfile text with the default line parser.
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_with(&LineParser::new(), content)
    }

    /// Parse Dockerfile text with any instruction parser.
    pub fn parse_with<P: InstructionParser + ?Sized>(parser: &P, content: &str) -> Result<Self> {
        let nodes = parser.parse(content)?;
        Ok(Self::from_nodes(nodes))
    }

    /// Read a Dockerfile from a reader and parse it with the default parser.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Build commands from parsed instruction nodes, keeping their order.
    pub fn from_nodes(nodes: Vec<InstructionNode>) -> Self {
        let commands = nodes
            .into_iter()
            .map(|node| Command {
                name: node.name,
                flags: node.flags,
                values: node.values,
                start_line: node.start_line,
                end_line: node.end_line,
                original: node.original,
            })
            .collect();
        Self { commands }
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when the document holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Index of the base image declaration: the last FROM, scanning back
    /// from the end. The first command is never considered.
    fn base_image_index(&self) -> Result<usize> {
        (1..self.commands.len())
            .rev()
            .find(|&i| self.commands[i].is(InstructionKind::From))
            .ok_or_else(|| DfError::NotFound("no FROM statements found".to_string()))
    }

    fn base_image_value(&self, index: usize) -> Result<&str> {
        let command = &self.commands[index];
        command.values.first().map(String::as_str).ok_or_else(|| {
            DfError::MissingValue(format!(
                "no values supplied to last FROM statement (line {})",
                command.start_line
            ))
        })
    }

    /// Parse the image of the base image declaration without changing it.
    pub fn base_image(&self) -> Result<ImageReference> {
        let index = self.base_image_index()?;
        ImageReference::parse(self.base_image_value(index)?)
    }

    /// Set the tag of the image in the last FROM statement.
    ///
    /// Only the first value of that command is rewritten. On error the
    /// document is left untouched.
    pub fn set_base_image_tag(&mut self, tag: &str) -> Result<()> {
        let index = self.base_image_index()?;
        let mut image = ImageReference::parse(self.base_image_value(index)?)?;
        image.tag = Some(tag.to_string());
        let path = image.render();

        let command = &mut self.commands[index];
        tracing::debug!(
            line = command.start_line,
            from = command.values[0].as_str(),
            to = path.as_str(),
            "Rewriting base image tag"
        );
        command.values[0] = path;
        Ok(())
    }
}
