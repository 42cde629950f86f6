//! User input and interaction handling.
//! The question flow talks to a [`Prompter`] so it can run against a
//! scripted implementation in tests; the terminal implementation reads
//! answers through dialoguer and validates them with the pure parsing
//! functions below.

use std::io;

use dialoguer::Input;

use crate::error::{Error, Result};

/// Interactive question surface used by the elicitation flow.
pub trait Prompter {
    /// Asks a question offering more possibilities than simply yes or no.
    /// Returns the index of the selected option.
    fn ask_choice(&self, question: &str, options: &[&str], default: Option<usize>) -> Result<usize>;

    /// Asks a closed yes/no question.
    fn ask_yes_no(&self, question: &str, default: Option<bool>) -> Result<bool>;
}

/// Outcome of reading a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNoAnswer {
    Yes,
    No,
    /// Both a `y` and an `n` were present.
    Ambiguous,
    /// Neither a `y` nor an `n` was present.
    Neither,
}

/// Classifies a yes/no answer. Matching is case insensitive and based on
/// containment, so "yes", "Y" and "yep" all count as yes.
pub fn parse_yes_no(input: &str) -> YesNoAnswer {
    let lowered = input.to_lowercase();
    match (lowered.contains('y'), lowered.contains('n')) {
        (true, false) => YesNoAnswer::Yes,
        (false, true) => YesNoAnswer::No,
        (true, true) => YesNoAnswer::Ambiguous,
        (false, false) => YesNoAnswer::Neither,
    }
}

/// Parses a numbered-choice answer against a list of `option_count`
/// options. Returns the zero-based index, or None for non-numeric or
/// out-of-range input.
pub fn parse_choice(input: &str, option_count: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|choice| (1..=option_count).contains(choice))
        .map(|choice| choice - 1)
}

/// Terminal-backed prompter.
pub struct TermPrompter;

impl TermPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_answer(&self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|err| match err {
                dialoguer::Error::IO(io_err) if io_err.kind() == io::ErrorKind::Interrupted => {
                    Error::Cancelled
                }
                other => Error::PromptError(other.to_string()),
            })
    }
}

impl Default for TermPrompter {
    fn default() -> Self {
        TermPrompter::new()
    }
}

impl Prompter for TermPrompter {
    fn ask_choice(&self, question: &str, options: &[&str], default: Option<usize>) -> Result<usize> {
        println!();
        println!("{}", question);

        for (index, option) in options.iter().enumerate() {
            match default {
                None => println!("  {}. {}", index + 1, option),
                Some(position) if position == index => {
                    println!("  [Default] {}. {}", index + 1, option)
                }
                Some(_) => println!("            {}. {}", index + 1, option),
            }
        }

        let prompt = if default.is_some() {
            "Enter the number of your choice (empty for default)"
        } else {
            "Enter the number of your choice"
        };

        // No iteration bound: the loop only ends on valid input or cancel.
        loop {
            let answer = self.read_answer(prompt)?;
            if answer.is_empty() {
                if let Some(position) = default {
                    return Ok(position);
                }
            }
            match parse_choice(&answer, options.len()) {
                Some(index) => return Ok(index),
                None => {
                    log::error!("Invalid input. Please enter a number in 1-{}.", options.len())
                }
            }
        }
    }

    fn ask_yes_no(&self, question: &str, default: Option<bool>) -> Result<bool> {
        println!();
        let instructions = match default {
            None => "[y/n]",
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
        };
        println!("{} {}", question, instructions);

        let prompt = match default {
            None => "Choice".to_string(),
            Some(value) => {
                format!("Choice (empty for default: {})", if value { "yes" } else { "no" })
            }
        };

        loop {
            let answer = self.read_answer(&prompt)?;
            match parse_yes_no(&answer) {
                YesNoAnswer::Yes => return Ok(true),
                YesNoAnswer::No => return Ok(false),
                YesNoAnswer::Ambiguous => {
                    log::error!("Ambiguous input. Please specify either \"y\" or \"n\".")
                }
                YesNoAnswer::Neither => match default {
                    Some(value) => return Ok(value),
                    None => log::error!("Invalid input. Please specify either \"y\" or \"n\"."),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("y"), YesNoAnswer::Yes);
        assert_eq!(parse_yes_no("YES"), YesNoAnswer::Yes);
        assert_eq!(parse_yes_no("yep"), YesNoAnswer::Yes);
        assert_eq!(parse_yes_no("n"), YesNoAnswer::No);
        assert_eq!(parse_yes_no("nope"), YesNoAnswer::No);
        assert_eq!(parse_yes_no("N"), YesNoAnswer::No);
    }

    #[test]
    fn test_parse_yes_no_ambiguous() {
        // Both letters present cannot be resolved, even via a default.
        assert_eq!(parse_yes_no("yn"), YesNoAnswer::Ambiguous);
        assert_eq!(parse_yes_no("yes and no"), YesNoAnswer::Ambiguous);
        assert_eq!(parse_yes_no("nay"), YesNoAnswer::Ambiguous);
    }

    #[test]
    fn test_parse_yes_no_neither() {
        assert_eq!(parse_yes_no(""), YesNoAnswer::Neither);
        assert_eq!(parse_yes_no("maybe?"), YesNoAnswer::Neither);
        assert_eq!(parse_yes_no("ok"), YesNoAnswer::Neither);
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1", 3), Some(0));
        assert_eq!(parse_choice("3", 3), Some(2));
        assert_eq!(parse_choice(" 2 ", 3), Some(1));
    }

    #[test]
    fn test_parse_choice_rejects_invalid_input() {
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("x", 3), None);
        assert_eq!(parse_choice("", 3), None);
        assert_eq!(parse_choice("-1", 3), None);
    }
}
