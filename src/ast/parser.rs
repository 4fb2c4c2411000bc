use crate::ast::{ASTNode, BinaryOperator, ParsedFormula, UnaryOperator};
use crate::error::EvalError;
use crate::validate::nesting_depth;
use log::debug;
use pest::error::LineColLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "./expression.pest"]
pub struct FormulaParser;

type BuildResult = Result<ASTNode, String>;

impl FormulaParser {
    pub fn parse_expression(input: &str) -> Result<ASTNode, EvalError> {
        debug!("Parsing expression: {}", input);
        let invalid = |reason: String| EvalError::InvalidExpression {
            expression: input.to_string(),
            reason,
        };

        let parse_result = FormulaParser::parse(Rule::formula, input)
            .map_err(|e| {
                let column = match e.line_col {
                    LineColLocation::Pos((_, column)) => column,
                    LineColLocation::Span((_, column), _) => column,
                };
                invalid(format!("{} at column {}", e.variant.message(), column))
            })?
            .next()
            .ok_or_else(|| invalid("Failed to parse expression".to_string()))?;

        Self::build_formula(parse_result).map_err(invalid)
    }

    /// Parses `input`, refusing parenthesis nesting deeper than `max_depth`
    /// before the recursive grammar ever sees it. `**` chains recurse like
    /// parentheses, so more than `max_depth` of them are refused as well.
    pub fn parse_formula(input: &str, max_depth: usize) -> Result<ParsedFormula, EvalError> {
        let depth = nesting_depth(input);
        if depth > max_depth {
            return Err(EvalError::NestingTooDeep {
                depth,
                limit: max_depth,
            });
        }

        let powers = input.matches("**").count();
        if powers > max_depth {
            return Err(EvalError::NestingTooDeep {
                depth: powers,
                limit: max_depth,
            });
        }

        let root = Self::parse_expression(input)?;
        Ok(ParsedFormula {
            source: input.to_string(),
            root,
        })
    }

    fn expect<'i>(pairs: &mut Pairs<'i, Rule>, context: &str) -> Result<Pair<'i, Rule>, String> {
        pairs
            .next()
            .ok_or_else(|| format!("Missing operand in {}", context))
    }

    fn build_formula(pair: Pair<Rule>) -> BuildResult {
        let list = pair.into_inner().next().ok_or("Empty formula")?;
        Self::build_expression_list(list)
    }

    fn build_expression_list(pair: Pair<Rule>) -> BuildResult {
        let trailing_comma = pair.as_str().trim_end().ends_with(',');
        let mut items = pair
            .into_inner()
            .map(Self::build_sum)
            .collect::<Result<Vec<_>, _>>()?;

        if !trailing_comma && items.len() == 1 {
            if let Some(item) = items.pop() {
                return Ok(item);
            }
        }
        Ok(ASTNode::Tuple(items))
    }

    fn build_left_associative(
        pair: Pair<Rule>,
        operand: fn(Pair<Rule>) -> BuildResult,
    ) -> BuildResult {
        debug!("Building {:?} expression: {}", pair.as_rule(), pair.as_str());
        let context = format!("{:?}", pair.as_rule());
        let mut pairs = pair.into_inner();
        let mut node = operand(Self::expect(&mut pairs, &context)?)?;

        while let Some(operator_pair) = pairs.next() {
            let operator = BinaryOperator::try_from(operator_pair.as_str())?;
            let right = operand(Self::expect(&mut pairs, &context)?)?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn build_sum(pair: Pair<Rule>) -> BuildResult {
        Self::build_left_associative(pair, Self::build_product)
    }

    fn build_product(pair: Pair<Rule>) -> BuildResult {
        Self::build_left_associative(pair, Self::build_unary)
    }

    fn build_unary(pair: Pair<Rule>) -> BuildResult {
        let mut signs = 0usize;
        let mut negations = 0usize;
        let mut operand = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::PLUS | Rule::MINUS => {
                    signs += 1;
                    if UnaryOperator::try_from(inner.as_str())? == UnaryOperator::Negate {
                        negations += 1;
                    }
                }
                Rule::power => operand = Some(Self::build_power(inner)?),
                rule => return Err(format!("Unexpected rule in unary expression: {:?}", rule)),
            }
        }

        // A run of signs collapses to one by parity, keeping the tree shallow.
        let operand = operand.ok_or("Missing operand in unary expression")?;
        let operator = match (signs, negations % 2) {
            (0, _) => return Ok(operand),
            (_, 1) => UnaryOperator::Negate,
            _ => UnaryOperator::Plus,
        };

        Ok(ASTNode::UnaryOperation {
            operator,
            operand: Box::new(operand),
        })
    }

    fn build_power(pair: Pair<Rule>) -> BuildResult {
        let mut pairs = pair.into_inner();
        let base = Self::build_primary(Self::expect(&mut pairs, "power")?)?;

        match pairs.next() {
            Some(_pow) => {
                let exponent = Self::build_unary(Self::expect(&mut pairs, "power")?)?;
                Ok(ASTNode::BinaryOperation {
                    left: Box::new(base),
                    operator: BinaryOperator::Power,
                    right: Box::new(exponent),
                })
            }
            None => Ok(base),
        }
    }

    fn build_primary(pair: Pair<Rule>) -> BuildResult {
        match pair.as_rule() {
            Rule::number => pair
                .as_str()
                .parse::<f64>()
                .map(ASTNode::Number)
                .map_err(|e| format!("Invalid number {}: {}", pair.as_str(), e)),
            Rule::call => Self::build_call(pair),
            Rule::qualified_name => Ok(Self::build_name(pair.as_str())),
            Rule::group => Self::build_expression_list(Self::expect(&mut pair.into_inner(), "group")?),
            rule => {
                debug!("Unexpected rule in primary expression: {:?}", pair);
                Err(format!("Unexpected rule in primary expression: {:?}", rule))
            }
        }
    }

    fn build_name(name: &str) -> ASTNode {
        if name.contains('.') {
            ASTNode::QualifiedConstant(name.to_string())
        } else {
            ASTNode::Identifier(name.to_string())
        }
    }

    fn build_call(pair: Pair<Rule>) -> BuildResult {
        let mut inner = pair.into_inner();
        let name = Self::expect(&mut inner, "call")?.as_str().to_string();
        let args = match inner.next() {
            Some(arguments) => arguments
                .into_inner()
                .map(Self::build_sum)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(ASTNode::FunctionCall { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: f64) -> Box<ASTNode> {
        Box::new(ASTNode::Number(value))
    }

    fn binary(left: Box<ASTNode>, operator: BinaryOperator, right: Box<ASTNode>) -> Box<ASTNode> {
        Box::new(ASTNode::BinaryOperation {
            left,
            operator,
            right,
        })
    }

    fn negate(operand: Box<ASTNode>) -> Box<ASTNode> {
        Box::new(ASTNode::UnaryOperation {
            operator: UnaryOperator::Negate,
            operand,
        })
    }

    #[test]
    fn test_precedence() {
        let ast = FormulaParser::parse_expression("1 + 2 * 3").unwrap();
        let expected = binary(
            number(1.0),
            BinaryOperator::Add,
            binary(number(2.0), BinaryOperator::Multiply, number(3.0)),
        );
        assert_eq!(ast, *expected);
    }

    #[test]
    fn test_left_associativity() {
        let ast = FormulaParser::parse_expression("8 - 3 - 2").unwrap();
        let expected = binary(
            binary(number(8.0), BinaryOperator::Subtract, number(3.0)),
            BinaryOperator::Subtract,
            number(2.0),
        );
        assert_eq!(ast, *expected);

        let ast = FormulaParser::parse_expression("8 / 4 / 2").unwrap();
        let expected = binary(
            binary(number(8.0), BinaryOperator::Divide, number(4.0)),
            BinaryOperator::Divide,
            number(2.0),
        );
        assert_eq!(ast, *expected);
    }

    #[test]
    fn test_power_is_right_associative() {
        let ast = FormulaParser::parse_expression("2 ** 3 ** 2").unwrap();
        let expected = binary(
            number(2.0),
            BinaryOperator::Power,
            binary(number(3.0), BinaryOperator::Power, number(2.0)),
        );
        assert_eq!(ast, *expected);
    }

    #[test]
    fn test_sign_around_power() {
        let ast = FormulaParser::parse_expression("-2 ** 2").unwrap();
        let expected = negate(binary(number(2.0), BinaryOperator::Power, number(2.0)));
        assert_eq!(ast, *expected);

        let ast = FormulaParser::parse_expression("2 ** -1").unwrap();
        let expected = binary(number(2.0), BinaryOperator::Power, negate(number(1.0)));
        assert_eq!(ast, *expected);
    }

    #[test]
    fn test_sign_chain() {
        let ast = FormulaParser::parse_expression("- + -1").unwrap();
        let expected = ASTNode::UnaryOperation {
            operator: UnaryOperator::Plus,
            operand: number(1.0),
        };
        assert_eq!(ast, expected);

        let ast = FormulaParser::parse_expression("- - -x").unwrap();
        assert_eq!(ast, *negate(Box::new(ASTNode::Identifier("x".to_string()))));
    }

    #[test]
    fn test_long_sign_run_stays_shallow() {
        let odd = format!("{}1", "-".repeat(1_000_001));
        assert_eq!(FormulaParser::parse_expression(&odd).unwrap(), *negate(number(1.0)));

        let even = format!("{}1", "-".repeat(1_000_000));
        assert_eq!(
            FormulaParser::parse_expression(&even).unwrap(),
            ASTNode::UnaryOperation {
                operator: UnaryOperator::Plus,
                operand: number(1.0),
            }
        );
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let ast = FormulaParser::parse_expression("(1 + 2) * 3").unwrap();
        let expected = binary(
            binary(number(1.0), BinaryOperator::Add, number(2.0)),
            BinaryOperator::Multiply,
            number(3.0),
        );
        assert_eq!(ast, *expected);
    }

    #[test]
    fn test_qualified_call() {
        let ast = FormulaParser::parse_expression("math.fmod(x, 2)").unwrap();
        let expected = ASTNode::FunctionCall {
            name: "math.fmod".to_string(),
            args: vec![ASTNode::Identifier("x".to_string()), ASTNode::Number(2.0)],
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_call_without_arguments() {
        let ast = FormulaParser::parse_expression("math.pi()").unwrap();
        let expected = ASTNode::FunctionCall {
            name: "math.pi".to_string(),
            args: vec![],
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_names() {
        assert_eq!(
            FormulaParser::parse_expression("math.pi").unwrap(),
            ASTNode::QualifiedConstant("math.pi".to_string())
        );
        assert_eq!(
            FormulaParser::parse_expression("velocity").unwrap(),
            ASTNode::Identifier("velocity".to_string())
        );
        assert_eq!(
            FormulaParser::parse_expression("tamath.sin").unwrap(),
            ASTNode::QualifiedConstant("tamath.sin".to_string())
        );
    }

    #[test]
    fn test_number_spellings() {
        for (input, value) in [
            ("7", 7.0),
            ("3.25", 3.25),
            (".5", 0.5),
            ("5.", 5.0),
            ("1e3", 1000.0),
            ("2.5E-2", 0.025),
        ] {
            assert_eq!(
                FormulaParser::parse_expression(input).unwrap(),
                ASTNode::Number(value),
                "{input}"
            );
        }
    }

    #[test]
    fn test_tuples() {
        assert_eq!(
            FormulaParser::parse_expression("1, 2").unwrap(),
            ASTNode::Tuple(vec![ASTNode::Number(1.0), ASTNode::Number(2.0)])
        );
        assert_eq!(
            FormulaParser::parse_expression("(1,)").unwrap(),
            ASTNode::Tuple(vec![ASTNode::Number(1.0)])
        );
    }

    #[test]
    fn test_excess_whitespace() {
        let ast = FormulaParser::parse_expression("   (   7  +  1  )   ").unwrap();
        let expected = binary(number(7.0), BinaryOperator::Add, number(1.0));
        assert_eq!(ast, *expected);
    }

    #[test]
    fn test_invalid_syntax() {
        let inputs = vec![
            "", "1 +", "2 3", "math.sqrt(", "()", "1 % 2", "x..y", "2x", "1 // 2", "* 3", "x.",
        ];

        for input in inputs {
            let result = FormulaParser::parse_expression(input);
            assert!(
                matches!(result, Err(EvalError::InvalidExpression { .. })),
                "Input '{}' should fail to parse, but got {:?}",
                input,
                result
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert!(FormulaParser::parse_formula(&deep, 100).is_ok());
        assert_eq!(
            FormulaParser::parse_formula(&deep, 10),
            Err(EvalError::NestingTooDeep {
                depth: 50,
                limit: 10
            })
        );
    }

    #[test]
    fn test_power_chain_limit() {
        let chain = |n: usize| format!("1{}", " ** 1".repeat(n));
        assert!(FormulaParser::parse_formula(&chain(20), 100).is_ok());
        assert_eq!(
            FormulaParser::parse_formula(&chain(100_000), 100),
            Err(EvalError::NestingTooDeep {
                depth: 100_000,
                limit: 100
            })
        );
    }

    #[test]
    fn test_parsed_formula_keeps_source() {
        let parsed = FormulaParser::parse_formula("x + 1", 100).unwrap();
        assert_eq!(parsed.source, "x + 1");
    }
}
