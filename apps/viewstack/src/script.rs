//! # Navigation Scripts
//!
//! Line-oriented scripts replayed against a navigator:
//!
//! ```text
//! # comments and blank lines are ignored
//! start                      # push the graph's start destination
//! navigate 2 title=Inbox     # by id, with key=value arguments
//! navigate @message id=7     # by label
//! pop
//! complete                   # deliver the completion of the effect in flight
//! detach                     # surface left the window
//! attach                     # surface came back
//! ```

use crate::error::CliError;
use serde::Serialize;
use viewstack_core::{ArgValue, Args};

/// How a `navigate` line names its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Id(u64),
    Label(String),
}

/// One script instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Start,
    Navigate { target: Target, args: Args },
    Pop,
    Complete,
    Detach,
    Attach,
}

/// A command with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, CliError> {
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = strip_comment(raw).trim();
        if content.is_empty() {
            continue;
        }
        let command = parse_command(line, content)?;
        lines.push(ScriptLine { line, command });
    }
    Ok(lines)
}

/// Cut a `#` comment that starts the line or follows whitespace; a `#`
/// inside a word (`title=Issue#4`) is kept.
fn strip_comment(raw: &str) -> &str {
    let mut previous = None;
    for (index, ch) in raw.char_indices() {
        if ch == '#' && previous.is_none_or(char::is_whitespace) {
            return &raw[..index];
        }
        previous = Some(ch);
    }
    raw
}

fn parse_command(line: usize, content: &str) -> Result<Command, CliError> {
    let mut words = content.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();

    let no_operands = |command: Command| {
        if rest.is_empty() {
            Ok(command)
        } else {
            Err(CliError::script(line, format!("`{}` takes no operands", verb)))
        }
    };

    match verb {
        "start" => no_operands(Command::Start),
        "pop" | "back" => no_operands(Command::Pop),
        "complete" => no_operands(Command::Complete),
        "detach" => no_operands(Command::Detach),
        "attach" => no_operands(Command::Attach),
        "navigate" | "nav" => {
            let (target, pairs) = rest
                .split_first()
                .ok_or_else(|| CliError::script(line, "`navigate` needs a destination"))?;
            let target = parse_target(line, target)?;
            let args = pairs
                .iter()
                .map(|pair| parse_pair(line, pair))
                .collect::<Result<Args, _>>()?;
            Ok(Command::Navigate { target, args })
        }
        other => Err(CliError::script(line, format!("unknown command `{}`", other))),
    }
}

fn parse_target(line: usize, raw: &str) -> Result<Target, CliError> {
    if let Some(label) = raw.strip_prefix('@') {
        if label.is_empty() {
            return Err(CliError::script(line, "empty destination label"));
        }
        return Ok(Target::Label(label.to_string()));
    }
    raw.parse::<u64>()
        .map(Target::Id)
        .map_err(|_| CliError::script(line, format!("`{}` is not a destination id or @label", raw)))
}

/// `key=value`; a value containing `,` becomes a list.
fn parse_pair(line: usize, raw: &str) -> Result<(String, ArgValue), CliError> {
    let (key, value) = raw
        .split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| CliError::script(line, format!("expected key=value, got `{}`", raw)))?;
    let value = if value.contains(',') {
        ArgValue::List(value.split(',').map(ArgValue::parse).collect())
    } else {
        ArgValue::parse(value)
    };
    Ok((key.to_string(), value))
}

// =============================================================================
// TESTS
// =============================================================================
