pub mod ast;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod functions;
pub mod normalize;
pub mod validate;

use std::collections::HashMap;

pub use ast::{Evaluator, MathTables};
pub use config::{BindingMode, Config};
pub use engine::{compute_formula, Evaluation, FormulaEngine, Rejection};
pub use error::{ArgumentError, EvalError, FormulaError, MathError, NameKind, WellFormednessError};
pub use validate::is_well_formed;

/// Variable name to value.
pub type Bindings = HashMap<String, f64>;

/// Evaluates a formula written with qualified names (`math.sqrt(2) * x`),
/// skipping validation and keyword rewriting.
///
/// ```
/// use formula_rs::{evaluate_expression, Bindings};
///
/// let context = Bindings::from([("x".to_string(), 4.0)]);
/// assert_eq!(evaluate_expression("math.sqrt(x) * 3", &context), Ok(6.0));
/// ```
pub fn evaluate_expression(expression: &str, context: &Bindings) -> Result<f64, EvalError> {
    Evaluator::standard().evaluate_with(expression, context)
}
