//! Classification of `pdd` command input.

use console::style;

use crate::error::Result;

/// Prefix every handled command starts with.
pub const COMMAND_PREFIX: &str = "pdd";

/// Message printed when the bootstrap scripts did not define the entry point.
pub const MISSING_ENTRY_MESSAGE: &str = "Fatal error. Cannot use R2_HOME_DATADIR.";

/// Output format requested from the decompiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// A decompile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub mode: OutputMode,

    /// Whitespace separated tokens passed to the entry point.
    pub args: Vec<String>,
}

/// What a command asks for once its prefix is stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Decompile(Request),
    Help,
}

impl Action {
    /// Classifies the input that followed the command prefix.
    pub fn classify(rest: &str) -> Self {
        let trimmed = rest.trim_start();
        let mode = match trimmed.chars().next() {
            None => OutputMode::Text,
            Some('j') => OutputMode::Json,
            Some(_) => return Action::Help,
        };

        Action::Decompile(Request {
            mode,
            args: trimmed.split_whitespace().map(str::to_string).collect(),
        })
    }
}

/// Builds the script that calls `entry_point` with `args`, or prints
/// [`MISSING_ENTRY_MESSAGE`] if the function does not exist.
pub fn entry_invocation(entry_point: &str, args: &[String]) -> Result<String> {
    let args = serde_json::to_string(args)?;
    let message = serde_json::to_string(MISSING_ENTRY_MESSAGE)?;

    Ok(format!(
        "if (typeof {entry_point} === 'function') {{ {entry_point}({args}); }} \
         else {{ console.log({message}); }}"
    ))
}

/// One row of the usage help.
#[derive(Debug, Clone, Copy)]
pub struct HelpEntry {
    pub command: &'static str,
    pub args: &'static str,
    pub description: &'static str,
}

/// Usage help; the first row is the header.
pub const USAGE: [HelpEntry; 3] = [
    HelpEntry {
        command: "Usage: pdd[j]",
        args: "",
        description: "# Decompile current function",
    },
    HelpEntry {
        command: "pdd",
        args: "",
        description: "decompile current function",
    },
    HelpEntry {
        command: "pddj",
        args: "",
        description: "decompile to json",
    },
];

/// Renders help rows the way radare2 prints command help.
pub fn render_help(entries: &[HelpEntry], color: bool) -> Vec<String> {
    let Some((header, rows)) = entries.split_first() else {
        return Vec::new();
    };

    let width = rows
        .iter()
        .map(|e| e.command.len() + e.args.len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "{}{}  {}",
        style(header.command).force_styling(color).yellow(),
        header.args,
        header.description
    )];

    for entry in rows {
        let pad = width - (entry.command.len() + entry.args.len());
        lines.push(format!(
            "| {}{}{}  {}",
            style(entry.command).force_styling(color).yellow(),
            style(entry.args).force_styling(color).cyan(),
            " ".repeat(pad),
            style(entry.description).force_styling(color).dim()
        ));
    }

    lines
}
