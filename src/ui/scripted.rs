use std::collections::VecDeque;

use crate::error::{ReleaseError, Result};
use crate::ui::{ChoiceOption, Prompter};

/// A canned answer for [`ScriptedPrompter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// 0-based option index
    Choice(usize),
    Confirm(bool),
    Text(String),
}

/// Non-interactive prompter fed with canned answers, consumed in order.
///
/// Records every question it was asked. Running out of answers, or receiving a
/// question of the wrong kind, is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
    offered: Vec<Vec<ChoiceOption>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        ScriptedPrompter {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
            offered: Vec::new(),
        }
    }

    /// Questions asked so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Option lists presented by `prompt_choice`, in order
    pub fn offered(&self) -> &[Vec<ChoiceOption>] {
        &self.offered
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, question: &str) -> Result<Answer> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| ReleaseError::prompt(format!("no scripted answer for '{}'", question)))
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt_choice(&mut self, question: &str, options: &[ChoiceOption]) -> Result<usize> {
        self.offered.push(options.to_vec());
        match self.next(question)? {
            Answer::Choice(i) if i < options.len() => Ok(i),
            Answer::Choice(i) => Err(ReleaseError::prompt(format!(
                "scripted choice {} out of range for '{}'",
                i, question
            ))),
            other => Err(ReleaseError::prompt(format!(
                "expected a choice for '{}', got {:?}",
                question, other
            ))),
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        match self.next(question)? {
            Answer::Confirm(yes) => Ok(yes),
            other => Err(ReleaseError::prompt(format!(
                "expected a confirmation for '{}', got {:?}",
                question, other
            ))),
        }
    }

    fn prompt_text(&mut self, question: &str) -> Result<String> {
        match self.next(question)? {
            Answer::Text(text) => Ok(text.trim().to_string()),
            other => Err(ReleaseError::prompt(format!(
                "expected text for '{}', got {:?}",
                question, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_consumed_in_order() {
        let mut prompter = ScriptedPrompter::new([
            Answer::Confirm(true),
            Answer::Choice(0),
            Answer::Text(" 654321 ".to_string()),
        ]);

        assert!(prompter.confirm("Proceed?").unwrap());
        assert_eq!(
            prompter
                .prompt_choice("Pick", &[ChoiceOption::new("a", false)])
                .unwrap(),
            0
        );
        assert_eq!(prompter.prompt_text("Code:").unwrap(), "654321");
        assert_eq!(prompter.asked(), ["Proceed?", "Pick", "Code:"]);
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_exhausted_or_mismatched_answers_fail() {
        let mut prompter = ScriptedPrompter::new([Answer::Text("x".to_string())]);
        assert!(prompter.confirm("Proceed?").is_err());
        assert!(prompter.confirm("Again?").is_err());
    }

    #[test]
    fn test_out_of_range_choice_fails() {
        let mut prompter = ScriptedPrompter::new([Answer::Choice(5)]);
        assert!(prompter
            .prompt_choice("Pick", &[ChoiceOption::new("a", false)])
            .is_err());
    }
}
