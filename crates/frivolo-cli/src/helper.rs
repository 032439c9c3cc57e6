use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::COMMANDS;

/// Completion source for the prompt currently shown.
#[derive(Clone, Debug, PartialEq)]
pub enum Completions {
    /// Calculator prompt: slash commands.
    Commands,
    /// Free-text field with suggested values, e.g. job titles.
    Choices(Vec<String>),
    None,
}

/// rustyline helper providing completion, highlighting and hints.
#[derive(Clone)]
pub struct CliHelper {
    completions: Completions,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            completions: Completions::Commands,
        }
    }

    pub fn set_completions(&mut self, completions: Completions) {
        self.completions = completions;
    }

    fn candidates(&self, line: &str) -> Vec<String> {
        match &self.completions {
            Completions::Commands if line.starts_with('/') => COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| cmd.to_string())
                .collect(),
            Completions::Choices(choices) => {
                let needle = line.to_lowercase();
                choices
                    .iter()
                    .filter(|choice| choice.to_lowercase().starts_with(&needle))
                    .cloned()
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .candidates(&line[..pos])
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.completions == Completions::Commands && line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || (self.completions == Completions::Commands && line.contains(' ')) {
            return None;
        }

        self.candidates(line)
            .into_iter()
            .find(|candidate| candidate.len() > line.len())
            // candidates share the prefix modulo case; hint only exact prefixes
            .filter(|candidate| candidate.starts_with(line))
            .map(|candidate| candidate[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}
