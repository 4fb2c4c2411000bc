use crate::ast::MathTables;
use crate::error::MathError;
use formula_macros::math_fn;

/// Largest `n` whose factorial is a finite `f64`.
pub const MAX_FACTORIAL: f64 = 170.0;

pub fn register(tables: &mut MathTables) {
    tables.register_function("math.factorial", factorial);
}

#[math_fn]
pub fn factorial(n: f64) -> Result<f64, MathError> {
    if n.is_nan() {
        return Err(MathError::Domain("cannot convert float NaN to integer"));
    }
    if n.is_infinite() && n > 0.0 {
        return Err(MathError::Overflow);
    }
    if n.fract() != 0.0 {
        return Err(MathError::Domain("factorial() only accepts integral values"));
    }
    if n < 0.0 {
        return Err(MathError::Domain("factorial() not defined for negative values"));
    }
    if n > MAX_FACTORIAL {
        return Err(MathError::Overflow);
    }

    let mut product = 1.0;
    let mut k = 2.0;
    while k <= n {
        product *= k;
        k += 1.0;
    }
    Ok(product)
}
