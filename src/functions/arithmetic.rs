use crate::ast::{BinaryOperator, MathTables, UnaryOperator};
use crate::error::MathError;

pub fn register(tables: &mut MathTables) {
    tables.register_binary(BinaryOperator::Add, add);
    tables.register_binary(BinaryOperator::Subtract, subtract);
    tables.register_binary(BinaryOperator::Multiply, multiply);
    tables.register_binary(BinaryOperator::Divide, divide);
    tables.register_binary(BinaryOperator::Power, power);
    tables.register_unary(UnaryOperator::Negate, negate);
    tables.register_unary(UnaryOperator::Plus, plus);
}

pub fn add(a: f64, b: f64) -> Result<f64, MathError> {
    Ok(a + b)
}

pub fn subtract(a: f64, b: f64) -> Result<f64, MathError> {
    Ok(a - b)
}

pub fn multiply(a: f64, b: f64) -> Result<f64, MathError> {
    Ok(a * b)
}

pub fn divide(a: f64, b: f64) -> Result<f64, MathError> {
    if b == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(a / b)
}

/// The `**` operator.
///
/// Zero raised to a negative power divides by zero, a negative base with a
/// fractional exponent has no real result, and finite operands whose result
/// does not fit an `f64` overflow. Infinite and NaN operands follow IEEE `pow`.
pub fn power(base: f64, exponent: f64) -> Result<f64, MathError> {
    if base.is_finite() && exponent.is_finite() {
        if base == 0.0 && exponent < 0.0 {
            return Err(MathError::DivisionByZero);
        }
        if base < 0.0 && exponent.fract() != 0.0 {
            return Err(MathError::Domain(
                "negative number cannot be raised to a fractional power",
            ));
        }
    }

    let result = base.powf(exponent);
    if result.is_infinite() && base.is_finite() && exponent.is_finite() {
        return Err(MathError::Overflow);
    }
    Ok(result)
}

pub fn negate(x: f64) -> Result<f64, MathError> {
    Ok(-x)
}

pub fn plus(x: f64) -> Result<f64, MathError> {
    Ok(x)
}
