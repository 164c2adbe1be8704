//! Dockerfile text reconstruction.
//!
//! Commands are written one per output line, placed at their original
//! start line: the gaps left by blank lines and comments become empty
//! lines. Continued commands are written collapsed onto one line; heredoc
//! bodies keep their own lines.

use std::io::Write;

use dfpatch_core::config::{ContinuationPolicy, RenderConfig};
use dfpatch_core::error::Result;

use crate::document::Dockerfile;

impl Dockerfile {
    /// Render the document with the default configuration.
    pub fn render(&self) -> String {
        self.render_with(&RenderConfig::default())
    }

    /// Render the document. No trailing newline is added after the last
    /// command.
    pub fn render_with(&self, config: &RenderConfig) -> String {
        let mut out = String::new();
        let mut line = 1;

        for command in &self.commands {
            while line < command.start_line {
                out.push('\n');
                line += 1;
            }
            let rendered = command.render();
            out.push_str(&rendered);

            // Heredoc bodies are written on their own lines
            let written = rendered.matches('\n').count();
            line += written;

            let span = command
                .end_line
                .saturating_sub(command.start_line)
                .saturating_sub(written);
            match config.continuation {
                ContinuationPolicy::SkipSpan => {
                    if span > 1 {
                        line += span + 1;
                    }
                }
                ContinuationPolicy::CollapseToEnd => {
                    line = line.max(command.end_line);
                }
            }
        }

        tracing::trace!(
            commands = self.commands.len(),
            bytes = out.len(),
            "Rendered Dockerfile"
        );
        out
    }

    /// Write the rendered document to `w`.
    pub fn write_contents<W: Write + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.write_contents_with(w, &RenderConfig::default())
    }

    pub fn write_contents_with<W: Write + ?Sized>(
        &self,
        w: &mut W,
        config: &RenderConfig,
    ) -> Result<()> {
        w.write_all(self.render_with(config).as_bytes())?;
        Ok(())
    }
}

impl std::fmt::Display for Dockerfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
