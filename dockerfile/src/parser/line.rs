//! Line-oriented Dockerfile parser.
//!
//! Joins continuation lines while remembering which physical lines each
//! instruction covered, skips blank lines and comments, and splits every
//! instruction into keyword, flags and values. No instruction semantics
//! are checked.

use dfpatch_core::config::ParserConfig;
use dfpatch_core::error::{DfError, Result};

use super::{InstructionNode, InstructionParser};
use crate::command::InstructionKind;

/// Default [`InstructionParser`].
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    config: ParserConfig,
}

/// A logical line with the physical span it was joined from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogicalLine {
    text: String,
    /// Heredoc body lines, terminators included
    heredoc: Option<String>,
    start_line: usize,
    end_line: usize,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read leading parser directives. Only `escape` changes behavior;
    /// other directives (e.g. `syntax`) are accepted and ignored.
    fn escape_char(&self, lines: &[&str]) -> Result<char> {
        let mut escape = self.config.escape;

        for (idx, line) in lines.iter().enumerate() {
            let Some((key, value)) = parse_directive(line) else {
                break;
            };
            if !key.eq_ignore_ascii_case("escape") {
                continue;
            }

            let mut chars = value.chars();
            escape = match (chars.next(), chars.next()) {
                (Some(c), None) if ParserConfig::is_valid_escape(c) => c,
                _ => {
                    return Err(DfError::Syntax {
                        line: idx + 1,
                        message: format!("invalid escape '{}': must be ` or \\", value),
                    })
                }
            };
        }

        Ok(escape)
    }
}

impl InstructionParser for LineParser {
    fn parse(&self, content: &str) -> Result<Vec<InstructionNode>> {
        let lines: Vec<&str> = content.lines().collect();
        let escape = self.escape_char(&lines)?;

        let nodes = join_continuation_lines(&lines, escape)?
            .iter()
            .map(parse_instruction)
            .collect::<Result<Vec<_>>>()?;

        if nodes.is_empty() {
            return Err(DfError::Syntax {
                line: lines.len().max(1),
                message: "file with no instructions".to_string(),
            });
        }

        tracing::debug!(
            instructions = nodes.len(),
            lines = lines.len(),
            escape = %escape,
            "Parsed Dockerfile"
        );
        Ok(nodes)
    }
}

/// Match `# key=value`. The key must be alphanumeric.
fn parse_directive(line: &str) -> Option<(&str, &str)> {
    let body = line.trim().strip_prefix('#')?;
    let (key, value) = body.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some((key, value.trim()))
}

fn is_skippable(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Join lines ending with the escape character into logical lines.
///
/// RUN, COPY and ADD lines that open heredocs also take the following
/// physical lines, up to each terminator, as their verbatim body.
fn join_continuation_lines(lines: &[&str], escape: char) -> Result<Vec<LogicalLine>> {
    let mut logical_lines = Vec::new();
    let mut current: Option<LogicalLine> = None;
    let mut idx = 0;

    while idx < lines.len() {
        let line_num = idx + 1;
        let trimmed = lines[idx].trim();
        idx += 1;

        if is_skippable(trimmed) {
            // Comments and empty lines inside a continuation are dropped
            if let Some(cur) = current.as_mut() {
                cur.end_line = line_num;
            }
            continue;
        }

        let (piece, continues) = match trimmed.strip_suffix(escape) {
            Some(before) => (before.trim_end(), true),
            None => (trimmed, false),
        };

        let cur = current.get_or_insert_with(|| LogicalLine {
            text: String::new(),
            heredoc: None,
            start_line: line_num,
            end_line: line_num,
        });
        if !piece.is_empty() {
            if !cur.text.is_empty() {
                cur.text.push(' ');
            }
            cur.text.push_str(piece);
        }
        cur.end_line = line_num;

        if !continues {
            if let Some(mut done) = current.take() {
                let markers = heredoc_markers(&done.text);
                if !markers.is_empty() {
                    idx = read_heredoc_bodies(lines, idx, &markers, &mut done)?;
                }
                logical_lines.push(done);
            }
        }
    }

    // Trailing continuation without a final line
    if let Some(done) = current.take() {
        logical_lines.push(done);
    }

    logical_lines.retain(|l| !l.text.is_empty());
    Ok(logical_lines)
}

/// Heredoc opened with `<<WORD`, `<<-WORD` or a quoted word.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Heredoc {
    word: String,
    strip_tabs: bool,
}

/// Find the heredocs a RUN, COPY or ADD line opens, in order.
fn heredoc_markers(text: &str) -> Vec<Heredoc> {
    let (keyword, _) = split_first_word(text);
    if !matches!(
        InstructionKind::from_name(keyword),
        InstructionKind::Run | InstructionKind::Copy | InstructionKind::Add
    ) {
        return Vec::new();
    }

    let mut markers = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("<<") {
        let mut after = &rest[pos + 2..];
        let strip_tabs = after.starts_with('-');
        if strip_tabs {
            after = &after[1..];
        }
        let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'');
        if quote.is_some() {
            after = &after[1..];
        }

        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let word = &after[..len];
        rest = &after[len..];

        if let Some(q) = quote {
            match rest.strip_prefix(q) {
                Some(next) => rest = next,
                None => continue,
            }
        }
        if !word.is_empty() {
            markers.push(Heredoc {
                word: word.to_string(),
                strip_tabs,
            });
        }
    }
    markers
}

/// Consume heredoc bodies starting at `idx`; returns the next unread index.
fn read_heredoc_bodies(
    lines: &[&str],
    mut idx: usize,
    markers: &[Heredoc],
    line: &mut LogicalLine,
) -> Result<usize> {
    let mut body = Vec::new();

    for marker in markers {
        loop {
            let Some(raw) = lines.get(idx) else {
                return Err(DfError::Syntax {
                    line: line.start_line,
                    message: format!("unterminated heredoc '{}'", marker.word),
                });
            };
            idx += 1;
            body.push(*raw);

            let candidate = if marker.strip_tabs {
                raw.trim_start_matches('\t')
            } else {
                *raw
            };
            if candidate == marker.word {
                break;
            }
        }
    }

    line.end_line = idx;
    line.heredoc = Some(body.join("\n"));
    Ok(idx)
}

/// Split a logical line into keyword, flags and values.
fn parse_instruction(line: &LogicalLine) -> Result<InstructionNode> {
    let (keyword, rest) = split_first_word(&line.text);

    if keyword.is_empty() || !keyword.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DfError::Syntax {
            line: line.start_line,
            message: format!("invalid instruction '{}'", keyword),
        });
    }

    let kind = InstructionKind::from_name(keyword);
    if kind == InstructionKind::Other {
        tracing::warn!(
            line = line.start_line,
            instruction = keyword,
            "Unknown Dockerfile instruction, keeping as-is"
        );
    }

    let (flags, rest) = split_flags(rest);
    let mut values = split_values(kind, rest, line.start_line);
    let mut original = line.text.clone();

    if let Some(body) = &line.heredoc {
        match values.last_mut() {
            Some(last) => {
                last.push('\n');
                last.push_str(body);
            }
            None => values.push(body.clone()),
        }
        original.push('\n');
        original.push_str(body);
    }

    Ok(InstructionNode {
        name: keyword.to_string(),
        flags,
        values,
        original,
        start_line: line.start_line,
        end_line: line.end_line,
    })
}

/// Split a string into the first word and the rest.
fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], s[pos..].trim_start()),
        None => (s, ""),
    }
}

/// Split off the first token, returned verbatim.
///
/// Whitespace inside `"..."` or `'...'` does not end a token, and a
/// backslash (outside single quotes) escapes the next character.
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some('\'') if c == '\'' => quote = None,
            Some('\'') => {}
            _ if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => return (&s[..i], s[i..].trim_start()),
            None => {}
        }
    }
    (s, "")
}

fn split_tokens(mut rest: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    while !rest.is_empty() {
        let (token, after) = split_token(rest);
        if token.is_empty() {
            break;
        }
        tokens.push(token.to_string());
        rest = after;
    }
    tokens
}

/// Take leading `--flag` tokens.
fn split_flags(mut rest: &str) -> (Vec<String>, &str) {
    let mut flags = Vec::new();
    loop {
        let (word, after) = split_token(rest);
        if word.len() > 2 && word.starts_with("--") {
            flags.push(word.to_string());
            rest = after;
        } else {
            return (flags, rest);
        }
    }
}

fn split_values(kind: InstructionKind, rest: &str, line_num: usize) -> Vec<String> {
    if rest.is_empty() {
        return Vec::new();
    }

    match kind {
        InstructionKind::Entrypoint if rest.starts_with('[') => {
            match serde_json::from_str::<Vec<String>>(rest) {
                Ok(exec) => exec,
                Err(e) => {
                    tracing::debug!(
                        line = line_num,
                        error = %e,
                        "ENTRYPOINT is not a JSON array, using shell form"
                    );
                    vec![rest.to_string()]
                }
            }
        }
        InstructionKind::Entrypoint
        | InstructionKind::Run
        | InstructionKind::Cmd
        | InstructionKind::Shell
        | InstructionKind::Healthcheck
        | InstructionKind::Onbuild
        | InstructionKind::Maintainer
        | InstructionKind::Workdir
        | InstructionKind::User
        | InstructionKind::Stopsignal => vec![rest.to_string()],
        _ => split_tokens(rest),
    }
}
