use crate::ast::{Evaluator, MathTables, ParsedFormula};
use crate::config::Config;
use crate::domain::{find_negative_sqrt, sqrt_failure_value};
use crate::error::{EvalError, FormulaError, WellFormednessError};
use crate::functions::DOMAIN;
use crate::normalize::{normalize, Normalized};
use crate::validate::is_well_formed_with;
use crate::Bindings;
use log::{debug, trace, warn};
use lru::LruCache;
use rayon::prelude::*;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// A formula defect reported back to the caller instead of raised.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("Formula is empty")]
    EmptyFormula,
    #[error("Parentheses are not matched")]
    UnmatchedParentheses,
    #[error("Formula is not well formed")]
    NotWellFormed,
    #[error("Can't sqrt with value ({value}) in {formula}")]
    NegativeSqrt { value: f64, formula: String },
}

impl From<WellFormednessError> for Rejection {
    fn from(error: WellFormednessError) -> Self {
        match error {
            WellFormednessError::MismatchedParentheses => Rejection::UnmatchedParentheses,
            WellFormednessError::EmptyFormula => Rejection::EmptyFormula,
        }
    }
}

/// Outcome of a computation that did not raise.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Value(f64),
    Rejected(Rejection),
}

impl Evaluation {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Evaluation::Value(value) => Some(*value),
            Evaluation::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Evaluation::Value(_) => None,
            Evaluation::Rejected(rejection) => Some(rejection),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Value(value) => write!(f, "{}", value),
            Evaluation::Rejected(rejection) => write!(f, "{}", rejection),
        }
    }
}

/// Validates, normalizes, checks and evaluates formulas.
///
/// The engine is `Sync`: one instance can serve many threads. With a non-zero
/// `cache_capacity` parsed formulas are kept in an LRU cache keyed by their
/// normalized text.
pub struct FormulaEngine {
    config: Config,
    tables: &'static MathTables,
    cache: Option<Mutex<LruCache<String, Arc<ParsedFormula>>>>,
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl FormulaEngine {
    pub fn new(config: Config) -> Self {
        Self::with_tables(config, MathTables::standard())
    }

    pub fn with_tables(config: Config, tables: &'static MathTables) -> Self {
        let cache = NonZeroUsize::new(config.cache_capacity)
            .map(|capacity| Mutex::new(LruCache::new(capacity)));

        Self {
            config,
            tables,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn evaluator(&self) -> Evaluator<'static> {
        Evaluator::new(self.tables, self.config.max_depth)
    }

    fn parse(&self, text: &str) -> Result<Arc<ParsedFormula>, EvalError> {
        let Some(cache) = &self.cache else {
            return self.evaluator().parse(text).map(Arc::new);
        };

        if let Some(parsed) = cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
        {
            trace!("Parse cache hit: {}", text);
            return Ok(Arc::clone(parsed));
        }

        let parsed = Arc::new(self.evaluator().parse(text)?);
        cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(text.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    /// Computes `formula` with the given variable bindings.
    ///
    /// Malformed formulas and detectable negative square roots come back as
    /// [`Evaluation::Rejected`]. Bad bindings, division by zero, undefined
    /// names and other evaluation failures are raised as [`FormulaError`].
    pub fn compute(
        &self,
        formula: &str,
        bindings: Option<&Bindings>,
    ) -> Result<Evaluation, FormulaError> {
        let empty = Bindings::new();
        let bindings = bindings.unwrap_or(&empty);
        debug!("Computing {} with {:?}", formula, bindings);

        let names = bindings.keys().map(String::as_str);
        match is_well_formed_with(formula, names, &self.config.variable_letters) {
            Ok(true) => {}
            Ok(false) => {
                warn!("Formula is not well formed: {:?}", formula);
                return Ok(Evaluation::Rejected(Rejection::NotWellFormed));
            }
            Err(e) => {
                warn!("{}: {:?}", e, formula);
                return Ok(Evaluation::Rejected(e.into()));
            }
        }

        let Normalized { text, environment } =
            normalize(formula, bindings, self.config.binding_mode)?;

        let evaluator = self.evaluator();
        let evaluate_argument =
            |argument: &str| evaluator.evaluate_with(argument, &environment);

        if let Some((value, formula)) = find_negative_sqrt(&text, &evaluate_argument) {
            warn!("Negative square root argument {} in {}", value, formula);
            return Ok(Evaluation::Rejected(Rejection::NegativeSqrt { value, formula }));
        }

        let result = self
            .parse(&text)
            .and_then(|parsed| evaluator.evaluate_parsed(&parsed, &environment));

        match result {
            Ok(value) => Ok(Evaluation::Value(value)),
            Err(error) => classify_failure(text, error, &evaluate_argument),
        }
    }

    /// Computes one formula against many binding sets in parallel, results in
    /// the order of `bindings`.
    pub fn compute_batch(
        &self,
        formula: &str,
        bindings: &[Bindings],
    ) -> Vec<Result<Evaluation, FormulaError>> {
        bindings
            .par_iter()
            .map(|bindings| self.compute(formula, Some(bindings)))
            .collect()
    }
}

fn is_domain_error(error: &EvalError) -> bool {
    matches!(error, EvalError::DomainError { detail, .. } if detail == DOMAIN)
}

/// Turns an evaluation failure of the normalized `text` into what `compute`
/// reports. A math domain error from any function becomes a square root
/// rejection when a value for a `math.sqrt` argument can be recovered.
fn classify_failure<F>(text: String, error: EvalError, evaluate: F) -> Result<Evaluation, FormulaError>
where
    F: Fn(&str) -> Result<f64, EvalError>,
{
    match error {
        EvalError::DivisionByZero { .. } => Err(FormulaError::DivisionByZero { formula: text }),
        EvalError::UndefinedName { kind, name } => Err(FormulaError::UndefinedName { kind, name }),
        error if is_domain_error(&error) => match sqrt_failure_value(&text, evaluate) {
            Some(value) => {
                warn!("Square root failed with value {} in {}", value, text);
                Ok(Evaluation::Rejected(Rejection::NegativeSqrt {
                    value,
                    formula: text,
                }))
            }
            None => Err(FormulaError::Value {
                formula: text,
                source: error,
            }),
        },
        error => Err(FormulaError::Value {
            formula: text,
            source: error,
        }),
    }
}

/// Computes `formula` with a default, uncached engine.
///
/// # Examples
///
/// ```
/// use formula_rs::{compute_formula, Bindings, Evaluation};
///
/// let bindings = Bindings::from([("x".to_string(), 7.0)]);
/// let result = compute_formula("x * 2", Some(&bindings)).unwrap();
/// assert_eq!(result, Evaluation::Value(14.0));
/// ```
pub fn compute_formula(
    formula: &str,
    bindings: Option<&Bindings>,
) -> Result<Evaluation, FormulaError> {
    FormulaEngine::default().compute(formula, bindings)
}
