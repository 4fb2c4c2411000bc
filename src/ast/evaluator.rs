use crate::ast::{ASTNode, MathTables, ParsedFormula, Parser};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{EvalError, NameKind};
use crate::Bindings;
use log::trace;

/// Recursion bound for evaluation. The parser caps nesting and collapses sign
/// runs, so only trees built by hand or under a raised nesting limit reach it.
pub const MAX_EVAL_DEPTH: usize = 1_000;

/// Walks a parsed formula against a fixed set of tables.
///
/// Nothing outside the tables is reachable: a name is either an operator,
/// a function, a constant or a binding, or it is reported as undefined.
#[derive(Clone, Copy)]
pub struct Evaluator<'t> {
    tables: &'t MathTables,
    max_depth: usize,
}

impl Evaluator<'static> {
    /// An evaluator over [`MathTables::standard`] with the default nesting limit.
    pub fn standard() -> Self {
        Self::new(MathTables::standard(), DEFAULT_MAX_DEPTH)
    }
}

impl<'t> Evaluator<'t> {
    pub fn new(tables: &'t MathTables, max_depth: usize) -> Self {
        Self { tables, max_depth }
    }

    /// Parse an expression string into an AST.
    pub fn parse(&self, expression: &str) -> Result<ParsedFormula, EvalError> {
        Parser::parse_formula(expression, self.max_depth)
    }

    /// Evaluates an expression with no variables in scope.
    pub fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        self.evaluate_with(expression, &Bindings::new())
    }

    /// Evaluates an expression, resolving bare identifiers against `environment`.
    ///
    /// # Errors
    ///
    /// * `InvalidExpression` if the text does not parse.
    /// * `DivisionByZero` when a divisor (or a base raised to a negative power) is zero.
    /// * `UndefinedName` for identifiers, functions or constants that resolve to nothing.
    /// * `DomainError`, `Overflow`, `ArgumentCount` from the function called.
    /// * `UnsupportedConstruct` for tuples.
    pub fn evaluate_with(&self, expression: &str, environment: &Bindings) -> Result<f64, EvalError> {
        let parsed = self.parse(expression)?;
        self.evaluate_parsed(&parsed, environment)
    }

    pub fn evaluate_parsed(
        &self,
        parsed: &ParsedFormula,
        environment: &Bindings,
    ) -> Result<f64, EvalError> {
        let result = self.evaluate_node(&parsed.root, &parsed.source, environment, 0);
        trace!("Evaluated {} to {:?}", parsed.source, result);
        result
    }

    fn evaluate_node(
        &self,
        node: &ASTNode,
        source: &str,
        environment: &Bindings,
        depth: usize,
    ) -> Result<f64, EvalError> {
        if depth > MAX_EVAL_DEPTH {
            return Err(EvalError::NestingTooDeep {
                depth,
                limit: MAX_EVAL_DEPTH,
            });
        }

        match node {
            ASTNode::Number(n) => Ok(*n),

            ASTNode::Identifier(name) => {
                environment
                    .get(name)
                    .copied()
                    .ok_or_else(|| EvalError::UndefinedName {
                        kind: NameKind::Variable,
                        name: name.clone(),
                    })
            }

            ASTNode::QualifiedConstant(name) => {
                self.tables
                    .constant(name)
                    .ok_or_else(|| EvalError::UndefinedName {
                        kind: NameKind::Constant,
                        name: name.clone(),
                    })
            }

            ASTNode::UnaryOperation { operator, operand } => {
                let function =
                    self.tables
                        .unary(*operator)
                        .ok_or_else(|| EvalError::UnsupportedConstruct {
                            construct: format!("unary operator {}", operator),
                        })?;
                let value = self.evaluate_node(operand, source, environment, depth + 1)?;
                function(value).map_err(|e| e.in_context(operator.symbol(), source))
            }

            ASTNode::BinaryOperation { .. } => {
                // The left spine is walked iteratively so long flat sums cost no depth.
                let mut spine = Vec::new();
                let mut current = node;
                while let ASTNode::BinaryOperation {
                    left,
                    operator,
                    right,
                } = current
                {
                    let function =
                        self.tables
                            .binary(*operator)
                            .ok_or_else(|| EvalError::UnsupportedConstruct {
                                construct: format!("binary operator {}", operator),
                            })?;
                    spine.push((*operator, function, right.as_ref()));
                    current = left.as_ref();
                }

                let mut value = self.evaluate_node(current, source, environment, depth + 1)?;
                for (operator, function, right) in spine.into_iter().rev() {
                    let right_value = self.evaluate_node(right, source, environment, depth + 1)?;
                    value = function(value, right_value)
                        .map_err(|e| e.in_context(operator.symbol(), source))?;
                }
                Ok(value)
            }

            ASTNode::FunctionCall { name, args } => {
                let function =
                    self.tables
                        .function(name)
                        .ok_or_else(|| EvalError::UndefinedName {
                            kind: NameKind::Function,
                            name: name.clone(),
                        })?;

                let values = args
                    .iter()
                    .map(|arg| self.evaluate_node(arg, source, environment, depth + 1))
                    .collect::<Result<Vec<f64>, EvalError>>()?;

                function(&values).map_err(|e| e.in_context(name, source))
            }

            ASTNode::Tuple(_) => Err(EvalError::UnsupportedConstruct {
                construct: "tuple".to_string(),
            }),
        }
    }
}
