use serde::{Deserialize, Serialize};

/// Default continuation escape character.
pub const DEFAULT_ESCAPE: char = '\\';

/// Instruction parser configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Line continuation character (`\` or `` ` ``).
    /// A leading `# escape=` directive in the document overrides it.
    pub escape: char,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            escape: DEFAULT_ESCAPE,
        }
    }
}

impl ParserConfig {
    /// Characters accepted as a continuation escape.
    pub fn is_valid_escape(c: char) -> bool {
        c == '\\' || c == '`'
    }
}

/// Document rendering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// How the line cursor moves past a command that spanned several lines
    pub continuation: ContinuationPolicy,
}

/// Line cursor adjustment after a multi-line command
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationPolicy {
    /// When a command spans more than two lines, advance the cursor by
    /// the full span. Spans of exactly two lines are not adjusted.
    #[default]
    SkipSpan,

    /// Move the cursor to the command's last line, so the collapsed
    /// command occupies one output line and the gaps around it are kept.
    CollapseToEnd,
}
