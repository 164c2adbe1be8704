//! Dockerfile commands.
//!
//! A [`Command`] is one logical instruction: its keyword, flags, positional
//! values and the source lines it came from. Rendering is driven only by
//! the keyword, flags and values.

use serde::{Deserialize, Serialize};

/// Known instruction keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    From,
    Workdir,
    Arg,
    Maintainer,
    Run,
    Cmd,
    Label,
    Expose,
    Env,
    Add,
    Copy,
    Entrypoint,
    Healthcheck,
    Shell,
    Stopsignal,
    Onbuild,
    User,
    Volume,
    /// Any keyword not listed above
    Other,
}

impl InstructionKind {
    const KNOWN: [InstructionKind; 18] = [
        InstructionKind::From,
        InstructionKind::Workdir,
        InstructionKind::Arg,
        InstructionKind::Maintainer,
        InstructionKind::Run,
        InstructionKind::Cmd,
        InstructionKind::Label,
        InstructionKind::Expose,
        InstructionKind::Env,
        InstructionKind::Add,
        InstructionKind::Copy,
        InstructionKind::Entrypoint,
        InstructionKind::Healthcheck,
        InstructionKind::Shell,
        InstructionKind::Stopsignal,
        InstructionKind::Onbuild,
        InstructionKind::User,
        InstructionKind::Volume,
    ];

    /// Classify a keyword, ignoring case.
    pub fn from_name(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(InstructionKind::Other)
    }

    /// Canonical upper-case keyword. Empty for [`InstructionKind::Other`].
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionKind::From => "FROM",
            InstructionKind::Workdir => "WORKDIR",
            InstructionKind::Arg => "ARG",
            InstructionKind::Maintainer => "MAINTAINER",
            InstructionKind::Run => "RUN",
            InstructionKind::Cmd => "CMD",
            InstructionKind::Label => "LABEL",
            InstructionKind::Expose => "EXPOSE",
            InstructionKind::Env => "ENV",
            InstructionKind::Add => "ADD",
            InstructionKind::Copy => "COPY",
            InstructionKind::Entrypoint => "ENTRYPOINT",
            InstructionKind::Healthcheck => "HEALTHCHECK",
            InstructionKind::Shell => "SHELL",
            InstructionKind::Stopsignal => "STOPSIGNAL",
            InstructionKind::Onbuild => "ONBUILD",
            InstructionKind::User => "USER",
            InstructionKind::Volume => "VOLUME",
            InstructionKind::Other => "",
        }
    }
}

/// A single instruction in a Dockerfile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Instruction keyword as written (e.g. `FROM`, `copy`)
    pub name: String,
    /// Flags in source order, verbatim (e.g. `--from=builder`)
    pub flags: Vec<String>,
    /// Positional arguments following the flags
    pub values: Vec<String>,
    /// First source line, 1-based
    pub start_line: usize,
    /// Last source line, inclusive
    pub end_line: usize,
    /// Logical source text the command was parsed from
    pub original: String,
}

impl Command {
    /// Create a command with no source span.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for flags.
    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style setter for values.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style setter for the source span.
    pub fn with_lines(mut self, start_line: usize, end_line: usize) -> Self {
        self.start_line = start_line;
        self.end_line = end_line;
        self
    }

    /// Classify the keyword; unknown keywords give [`InstructionKind::Other`].
    pub fn kind(&self) -> InstructionKind {
        InstructionKind::from_name(&self.name)
    }

    /// Case-insensitive keyword comparison.
    pub fn is(&self, kind: InstructionKind) -> bool {
        kind != InstructionKind::Other && self.name.eq_ignore_ascii_case(kind.as_str())
    }

    /// Render the command as one line of Dockerfile text. A heredoc body
    /// carried in the last value is written on the lines that follow.
    ///
    /// ENTRYPOINT values are written in exec form, each one wrapped in
    /// double quotes as-is; quotes inside a value are not escaped.
    pub fn render(&self) -> String {
        let mut line = self.name.to_uppercase();

        if !self.flags.is_empty() {
            line.push(' ');
            line.push_str(&self.flags.join(" "));
        }

        if !self.values.is_empty() {
            line.push(' ');
            match self.kind() {
                InstructionKind::Entrypoint => {
                    let args: Vec<String> =
                        self.values.iter().map(|v| format!("\"{}\"", v)).collect();
                    line.push('[');
                    line.push_str(&args.join(", "));
                    line.push(']');
                }
                _ => line.push_str(&self.values.join(" ")),
            }
        }

        line
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render an optional command; `None` renders as an empty string.
pub fn render_command(command: Option<&Command>) -> String {
    command.map(Command::render).unwrap_or_default()
}
