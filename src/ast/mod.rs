mod evaluator;
mod parser;
mod tables;

pub use evaluator::Evaluator;
pub use parser::FormulaParser as Parser;
pub use tables::{BinaryFn, Function, MathTables, UnaryFn};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    BinaryOperation {
        left: Box<ASTNode>,
        operator: BinaryOperator,
        right: Box<ASTNode>,
    },
    UnaryOperation {
        operator: UnaryOperator,
        operand: Box<ASTNode>,
    },
    /// `name` is the callee as written, dotted segments included (`math.sqrt`).
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
    },
    /// A dotted name used as a value (`math.pi`).
    QualifiedConstant(String),
    /// A bare name used as a value.
    Identifier(String),
    /// Comma-separated values outside a call. Parsed, never evaluated.
    Tuple(Vec<ASTNode>),
}

/// A formula parsed once, kept with its source text for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFormula {
    pub source: String,
    pub root: ASTNode,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "**",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<&str> for BinaryOperator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(BinaryOperator::Add),
            "-" => Ok(BinaryOperator::Subtract),
            "*" => Ok(BinaryOperator::Multiply),
            "/" => Ok(BinaryOperator::Divide),
            "**" => Ok(BinaryOperator::Power),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Plus,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<&str> for UnaryOperator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "-" => Ok(UnaryOperator::Negate),
            "+" => Ok(UnaryOperator::Plus),
            _ => Err(format!("Unknown unary operator: {}", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip_through_symbols() {
        for op in [
            BinaryOperator::Add,
            BinaryOperator::Subtract,
            BinaryOperator::Multiply,
            BinaryOperator::Divide,
            BinaryOperator::Power,
        ] {
            assert_eq!(BinaryOperator::try_from(op.symbol()), Ok(op));
        }
        assert!(BinaryOperator::try_from("%").is_err());
        assert_eq!(UnaryOperator::try_from("-"), Ok(UnaryOperator::Negate));
        assert!(UnaryOperator::try_from("!").is_err());
    }
}
