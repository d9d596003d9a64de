//! Tool-call protocol parsing
//!
//! The model asks for a tool by writing one line of plain text:
//!
//! ```text
//! TOOL_CALL: write_file("notes.txt", "hello\nworld")
//! ```
//!
//! Arguments are double- or single-quoted strings or bare fragments. Commas
//! only separate arguments outside quotes, a backslash keeps the next quote
//! character from closing a quoted span, and parentheses outside quotes nest.
//! Each argument is trimmed and loses one pair of matching outer quotes.

use crate::error::ToolError;

/// Prefix that marks a tool-call line
pub const TOOL_CALL_MARKER: &str = "TOOL_CALL:";

/// A parsed tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub name: String,
    pub args: Vec<String>,
}

/// First line of `text` that starts with `marker`, trimmed.
///
/// Later tool-call lines are never looked at: one call per reply.
pub fn find_tool_call_line<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.lines().map(str::trim).find(|line| line.starts_with(marker))
}

/// Parse `MARKER name(arg, ...)` into a [`ToolCall`]
pub fn parse_tool_call(line: &str, marker: &str) -> Result<ToolCall, ToolError> {
    let body = line
        .trim()
        .strip_prefix(marker)
        .ok_or_else(|| ToolError::malformed(format!("line does not start with '{}'", marker)))?
        .trim_start();

    let open = body
        .find('(')
        .ok_or_else(|| ToolError::malformed("expected '(' after the tool name"))?;
    let name = body[..open].trim();
    validate_name(name)?;

    let (args, trailing) = split_arguments(&body[open + 1..])?;
    if !trailing.trim().is_empty() {
        tracing::debug!(tool = name, trailing = trailing.trim(), "ignoring text after tool call");
    }

    Ok(ToolCall {
        name: name.to_string(),
        args,
    })
}

fn validate_name(name: &str) -> Result<(), ToolError> {
    let Some(first) = name.chars().next() else {
        return Err(ToolError::malformed("empty tool name"));
    };
    let valid = (first.is_ascii_alphabetic() || first == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ToolError::malformed(format!("invalid tool name '{}'", name)))
    }
}

/// Scan the text after `(` up to the matching `)`.
///
/// Returns the arguments and whatever follows the closing parenthesis.
fn split_arguments(inner: &str) -> Result<(Vec<String>, &str), ToolError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escape = false;
    let mut depth = 0usize;

    for (i, ch) in inner.char_indices() {
        if let Some(q) = quote {
            current.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' if opens_quote(&current) => {
                quote = Some(ch);
                current.push(ch);
            }
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' if depth > 0 => {
                depth -= 1;
                current.push(ch);
            }
            ')' => {
                if !current.trim().is_empty() {
                    args.push(finish_argument(&current));
                }
                return Ok((args, &inner[i + 1..]));
            }
            ',' if depth == 0 => {
                args.push(finish_argument(&current));
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if quote.is_some() {
        Err(ToolError::malformed("unterminated quoted argument"))
    } else {
        Err(ToolError::malformed("missing closing ')'"))
    }
}

/// A quote opens a span unless it sits inside a word, as in `don't`
fn opens_quote(current: &str) -> bool {
    current
        .chars()
        .last()
        .map_or(true, |prev| !prev.is_alphanumeric())
}

fn finish_argument(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '"' || first == '\'') => {
            trimmed[1..trimmed.len() - 1].to_string()
        }
        _ => trimmed.to_string(),
    }
}
