//! rustyline helper: completion, hints and highlighting for slash commands.

use crate::command::COMMANDS;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

const SELECT_PREFIX: &str = "/select ";

#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
    planet_ids: Vec<String>,
}

impl CliHelper {
    pub fn new(planet_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            planet_ids: planet_ids.into_iter().map(Into::into).collect(),
        }
    }

    fn candidates(&self, line: &str) -> (usize, Vec<&String>) {
        if let Some(partial) = line.strip_prefix(SELECT_PREFIX) {
            let matches = self
                .planet_ids
                .iter()
                .filter(|id| id.starts_with(partial))
                .collect();
            return (SELECT_PREFIX.len(), matches);
        }
        if line.starts_with('/') && !line.contains(' ') {
            let matches = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .collect();
            return (0, matches);
        }
        (0, Vec::new())
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
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, matches) = self.candidates(line);
        let typed = line.len() - start;
        matches
            .into_iter()
            .find(|candidate| candidate.len() > typed)
            .map(|candidate| candidate[typed..].to_string())
    }
}

impl Validator for CliHelper {}
