//! Character-level well-formedness checks run before any parsing.
//!
//! Validation has no notion of tokens: `sans(x)` passes as long as every letter
//! also appears in some keyword or variable name. Misspelled names are reported
//! later by the evaluator as undefined.

use crate::config::DEFAULT_VARIABLE_LETTERS;
use crate::error::WellFormednessError;
use crate::normalize::keywords;
use std::collections::HashSet;

const SYMBOLS: &str = ".+-*/(),";

/// `false` on a `)` without a matching `(`, or on any `(` left open.
pub fn check_parentheses(text: &str) -> bool {
    let mut open: usize = 0;

    for c in text.chars() {
        match c {
            '(' => open += 1,
            ')' => {
                if open == 0 {
                    return false;
                }
                open -= 1;
            }
            _ => {}
        }
    }

    open == 0
}

/// Deepest parenthesis nesting in `text`.
pub fn nesting_depth(text: &str) -> usize {
    let mut depth: usize = 0;
    let mut deepest = 0;

    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

/// Characters a formula may contain.
#[derive(Debug, Clone)]
pub struct AllowList {
    letters: HashSet<char>,
}

impl AllowList {
    pub fn new<'a>(extra_letters: &str, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut letters: HashSet<char> = keywords().flat_map(str::chars).collect();
        letters.extend(extra_letters.chars());
        for name in names {
            letters.extend(name.chars());
        }
        Self { letters }
    }

    pub fn allows_char(&self, c: char) -> bool {
        c.is_ascii_digit() || c.is_whitespace() || SYMBOLS.contains(c) || self.letters.contains(&c)
    }

    /// Every character of a non-empty `formula` is allowed.
    pub fn allows(&self, formula: &str) -> bool {
        !formula.is_empty() && formula.chars().all(|c| self.allows_char(c))
    }
}

/// Checks `formula` with the default variable letters.
pub fn is_well_formed<'a>(
    formula: &str,
    known_names: impl IntoIterator<Item = &'a str>,
) -> Result<bool, WellFormednessError> {
    is_well_formed_with(formula, known_names, DEFAULT_VARIABLE_LETTERS)
}

pub fn is_well_formed_with<'a>(
    formula: &str,
    known_names: impl IntoIterator<Item = &'a str>,
    variable_letters: &str,
) -> Result<bool, WellFormednessError> {
    if !check_parentheses(formula) {
        return Err(WellFormednessError::MismatchedParentheses);
    }

    if formula.trim().is_empty() {
        return Err(WellFormednessError::EmptyFormula);
    }

    Ok(AllowList::new(variable_letters, known_names).allows(formula))
}
