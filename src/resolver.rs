// Resolve a free-text name to exactly one row before a dependent write.
//
// The needle is matched case-insensitively as a substring of one field of
// each candidate. One hit is taken as-is; zero or several hits hand the
// decision to the operator through a `Chooser`.

use std::io;

use tracing::debug;

use crate::error::{CodaError, Result};
use crate::model::Row;

/// Single-choice prompt. Returns the index of the picked option.
pub trait Chooser {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize>;
}

/// Outcome of matching a needle against the candidate set.
#[derive(Debug)]
pub enum Resolution<'a> {
    Unique(&'a Row),
    NoMatch,
    Ambiguous(Vec<&'a Row>),
}

/// Candidates whose `field` contains `needle`, ignoring case. Rows without
/// the field never match.
pub fn find_matches<'a>(candidates: &'a [Row], field: &str, needle: &str) -> Vec<&'a Row> {
    let needle = needle.to_lowercase();
    candidates
        .iter()
        .filter(|row| {
            row.value_text(field)
                .map(|value| value.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .collect()
}

pub fn classify<'a>(candidates: &'a [Row], field: &str, needle: &str) -> Resolution<'a> {
    let mut matches = find_matches(candidates, field, needle);
    match matches.len() {
        0 => Resolution::NoMatch,
        1 => Resolution::Unique(matches.remove(0)),
        _ => Resolution::Ambiguous(matches),
    }
}

/// Messages shown for each prompting branch.
#[derive(Debug, Clone)]
pub struct Prompts {
    pub no_match: String,
    pub ambiguous: String,
    pub unspecified: String,
}

impl Prompts {
    pub fn buildings() -> Self {
        Prompts {
            no_match: "There were no valid matches to your building name, please choose from the list of all buildings, or re-initiate the command".into(),
            ambiguous: "There were multiple matches to the provided building name, which would you like to choose?".into(),
            unspecified: "Which building would you like to add the project to?".into(),
        }
    }
}

/// Resolves names against one field of one table.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: String,
    field: String,
    prompts: Prompts,
}

impl Resolver {
    pub fn new(table: impl Into<String>, field: impl Into<String>, prompts: Prompts) -> Self {
        Resolver {
            table: table.into(),
            field: field.into(),
            prompts,
        }
    }

    /// Return the display name of the chosen candidate.
    ///
    /// A missing or blank `needle` always prompts over the full set. An
    /// empty candidate set fails with `NoCandidates` instead of showing an
    /// empty prompt.
    pub fn resolve<C: Chooser + ?Sized>(
        &self,
        candidates: &[Row],
        needle: Option<&str>,
        chooser: &mut C,
    ) -> Result<String> {
        if candidates.is_empty() {
            return Err(CodaError::NoCandidates {
                table: self.table.clone(),
            });
        }

        // Blank only decides whether to search; the needle is matched as typed.
        let needle = match needle.filter(|n| !n.trim().is_empty()) {
            Some(n) => n,
            None => {
                let all: Vec<&Row> = candidates.iter().collect();
                return prompt(chooser, &self.prompts.unspecified, &all);
            }
        };

        match classify(candidates, &self.field, needle) {
            Resolution::Unique(row) => {
                debug!(table = %self.table, needle, name = %row.name, "unique match");
                Ok(row.name.clone())
            }
            Resolution::NoMatch => {
                debug!(table = %self.table, needle, "no match, offering all candidates");
                let all: Vec<&Row> = candidates.iter().collect();
                prompt(chooser, &self.prompts.no_match, &all)
            }
            Resolution::Ambiguous(matches) => {
                debug!(table = %self.table, needle, count = matches.len(), "ambiguous match");
                prompt(chooser, &self.prompts.ambiguous, &matches)
            }
        }
    }
}

fn prompt<C: Chooser + ?Sized>(chooser: &mut C, message: &str, rows: &[&Row]) -> Result<String> {
    let names: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();
    let index = chooser.choose(message, &names)?;
    names.into_iter().nth(index).ok_or_else(|| {
        CodaError::Prompt(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("choice {} is out of range", index),
        ))
    })
}
