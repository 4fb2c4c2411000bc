//! Best-effort detection of square roots of negative numbers.
//!
//! Each `math.sqrt(` argument is evaluated on its own. Arguments that cannot be
//! evaluated in isolation are skipped, so this only guards the cases where the
//! argument stands on its own.

use crate::error::EvalError;
use log::{debug, trace};

/// Qualified name of the square root in the function table.
pub const SQRT: &str = "math.sqrt";

const SQRT_CALL: &str = "math.sqrt(";

/// Text between `(` and its matching `)`, given the text right after the `(`.
fn balanced_argument(rest: &str) -> Option<&str> {
    let mut depth: usize = 0;

    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Some(&rest[..i]);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    None
}

/// Argument text of every `math.sqrt(` call in order of appearance, nested
/// calls included. Calls left open are skipped.
pub fn sqrt_arguments(text: &str) -> Vec<&str> {
    text.match_indices(SQRT_CALL)
        .filter_map(|(start, _)| balanced_argument(&text[start + SQRT_CALL.len()..]))
        .collect()
}

pub fn first_sqrt_argument(text: &str) -> Option<&str> {
    sqrt_arguments(text).into_iter().next()
}

/// The first sqrt argument that evaluates to a negative number, paired with
/// the whole formula. Evaluation failures are swallowed.
pub fn find_negative_sqrt<F>(text: &str, evaluate: F) -> Option<(f64, String)>
where
    F: Fn(&str) -> Result<f64, EvalError>,
{
    for argument in sqrt_arguments(text) {
        match evaluate(argument) {
            Ok(value) if value < 0.0 => {
                debug!("Negative sqrt argument {} = {} in {}", argument, value, text);
                return Some((value, text.to_string()));
            }
            Ok(_) => {}
            Err(e) => trace!("Skipping sqrt argument {}: {}", argument, e),
        }
    }

    None
}

/// Value to report once evaluation failed inside `math.sqrt`: a negative
/// argument if one can be found, otherwise the first argument that evaluates.
pub fn sqrt_failure_value<F>(text: &str, evaluate: F) -> Option<f64>
where
    F: Fn(&str) -> Result<f64, EvalError>,
{
    if let Some((value, _)) = find_negative_sqrt(text, &evaluate) {
        return Some(value);
    }

    first_sqrt_argument(text).and_then(|argument| evaluate(argument).ok())
}
