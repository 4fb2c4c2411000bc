use std::fmt;
use thiserror::Error;

/// What a table entry (operator or function) can report on its own. The
/// evaluator lifts it into an [`EvalError`] once it knows which operation and
/// which expression were involved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("{0}")]
    Domain(&'static str),
    #[error("math range error")]
    Overflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },
}

impl MathError {
    pub fn in_context(self, operation: &str, expression: &str) -> EvalError {
        match self {
            MathError::Domain(detail) => EvalError::DomainError {
                function: operation.to_string(),
                detail: detail.to_string(),
            },
            MathError::Overflow => EvalError::Overflow {
                operation: operation.to_string(),
            },
            MathError::DivisionByZero => EvalError::DivisionByZero {
                expression: expression.to_string(),
            },
            MathError::Arity { expected, found } => EvalError::ArgumentCount {
                function: operation.to_string(),
                expected,
                found,
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NameKind {
    Variable,
    Function,
    Constant,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Variable => write!(f, "name"),
            NameKind::Function => write!(f, "function"),
            NameKind::Constant => write!(f, "constant"),
        }
    }
}

/// Failures of the safe evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Invalid expression: {expression} - {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Can't divide by 0 in {expression}")]
    DivisionByZero { expression: String },

    #[error("{kind} '{name}' is not defined")]
    UndefinedName { kind: NameKind, name: String },

    #[error("Unsupported expression type: {construct}")]
    UnsupportedConstruct { construct: String },

    #[error("{function}: {detail}")]
    DomainError { function: String, detail: String },

    #[error("{operation}: math range error")]
    Overflow { operation: String },

    #[error("{function}() expected {expected} argument(s), got {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("expression nesting depth {depth} exceeds the limit of {limit}")]
    NestingTooDeep { depth: usize, limit: usize },
}

/// Raised by the validator before any parsing happens.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum WellFormednessError {
    #[error("Parentheses are not matched")]
    MismatchedParentheses,
    #[error("Formula is empty")]
    EmptyFormula,
}

/// Caller misuse of the bindings map.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgumentError {
    #[error("Unknown key '{0}' is not a valid variable name")]
    InvalidVariableName(String),
    #[error("Value of '{name}' = {value} is not a number")]
    InvalidVariableValue { name: String, value: String },
}

/// Errors raised by [`crate::compute_formula`]. Recoverable formula defects are
/// returned as [`crate::Rejection`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),

    #[error("Can't divide by 0 in {formula}")]
    DivisionByZero { formula: String },

    #[error("{kind} '{name}' is not defined")]
    UndefinedName { kind: NameKind, name: String },

    #[error("Value Error occurred in {formula}: {source}")]
    Value {
        formula: String,
        #[source]
        source: EvalError,
    },
}
