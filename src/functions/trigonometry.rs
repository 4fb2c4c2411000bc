use crate::ast::MathTables;
use crate::error::MathError;
use crate::functions::DOMAIN;
use formula_macros::math_fn;

pub fn register(tables: &mut MathTables) {
    tables.register_function("math.sin", sin);
    tables.register_function("math.cos", cos);
    tables.register_function("math.tan", tan);
}

/// Infinite angles have no defined value; NaN passes through.
fn checked(x: f64, result: f64) -> Result<f64, MathError> {
    if result.is_nan() && !x.is_nan() {
        Err(MathError::Domain(DOMAIN))
    } else {
        Ok(result)
    }
}

#[math_fn]
pub fn sin(x: f64) -> Result<f64, MathError> {
    checked(x, x.sin())
}

#[math_fn]
pub fn cos(x: f64) -> Result<f64, MathError> {
    checked(x, x.cos())
}

#[math_fn]
pub fn tan(x: f64) -> Result<f64, MathError> {
    checked(x, x.tan())
}
