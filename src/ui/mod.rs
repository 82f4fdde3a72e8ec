//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `scripted` - Canned-answer prompter for non-interactive runs and tests
//! - This module - The [`Prompter`] capability and its terminal implementation

use std::io::{self, BufRead, Write};

use console::style;

use crate::error::{ReleaseError, Result};

pub mod formatter;
pub mod scripted;

pub use formatter::{
    display_banner, display_boundary_warning, display_commit_analysis, display_error,
    display_manual_push_instruction, display_status, display_step, display_success,
    display_summary, display_warning,
};
pub use scripted::{Answer, ScriptedPrompter};

/// One entry of a numbered choice list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub recommended: bool,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, recommended: bool) -> Self {
        ChoiceOption {
            label: label.into(),
            recommended,
        }
    }
}

/// Blocking request/response exchange with the operator.
///
/// Prompts wait indefinitely; nothing remote has been mutated while one is open.
pub trait Prompter {
    /// Ask the operator to pick one option; returns its 0-based index
    fn prompt_choice(&mut self, question: &str, options: &[ChoiceOption]) -> Result<usize>;

    /// Yes/no question, defaulting to no
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Free-text answer, trimmed
    fn prompt_text(&mut self, question: &str) -> Result<String>;
}

/// Prompter reading from stdin and writing to stdout
pub struct TerminalPrompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        TerminalPrompter {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalPrompter { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(ReleaseError::prompt("input closed before an answer was given"));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn prompt_choice(&mut self, question: &str, options: &[ChoiceOption]) -> Result<usize> {
        if options.is_empty() {
            return Err(ReleaseError::prompt(format!("no options for '{}'", question)));
        }

        writeln!(self.output, "\n{}", style(question).bold())?;
        for (i, option) in options.iter().enumerate() {
            let marker = if option.recommended { " (Recommended)" } else { "" };
            writeln!(self.output, "  {}) {}{}", i + 1, option.label, marker)?;
        }

        loop {
            write!(self.output, "\nEnter choice (1-{}): ", options.len())?;
            self.output.flush()?;

            let answer = self.read_line()?;
            match answer.parse::<usize>() {
                Ok(n) if n >= 1 && n <= options.len() => return Ok(n - 1),
                _ => writeln!(
                    self.output,
                    "{} Invalid choice. Please try again.",
                    style("⚠").yellow()
                )?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "\n{} (y/N): ", question)?;
        self.output.flush()?;

        let response = self.read_line()?.to_lowercase();
        Ok(response == "y" || response == "yes")
    }

    fn prompt_text(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;
        self.read_line()
    }
}
