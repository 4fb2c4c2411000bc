use crate::ast::MathTables;
use crate::error::MathError;
use crate::functions::DOMAIN;
use formula_macros::math_fn;

pub fn register(tables: &mut MathTables) {
    tables.register_function("math.floor", floor);
    tables.register_function("math.ceil", ceil);
    tables.register_function("math.fmod", fmod);
}

// Rounding yields an integer, so NaN and infinities have nothing to round to.
// Adding 0.0 turns -0.0 into 0.0.
fn integral(x: f64, rounded: f64) -> Result<f64, MathError> {
    if x.is_nan() {
        return Err(MathError::Domain("cannot convert float NaN to integer"));
    }
    if x.is_infinite() {
        return Err(MathError::Overflow);
    }
    Ok(rounded + 0.0)
}

#[math_fn]
pub fn floor(x: f64) -> Result<f64, MathError> {
    integral(x, x.floor())
}

#[math_fn]
pub fn ceil(x: f64) -> Result<f64, MathError> {
    integral(x, x.ceil())
}

/// Remainder of `x / y` carrying the sign of `x`.
#[math_fn]
pub fn fmod(x: f64, y: f64) -> Result<f64, MathError> {
    let result = x % y;
    if result.is_nan() && !x.is_nan() && !y.is_nan() {
        return Err(MathError::Domain(DOMAIN));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_and_ceil() {
        assert_eq!(floor(&[2.7]), Ok(2.0));
        assert_eq!(floor(&[-2.2]), Ok(-3.0));
        assert_eq!(ceil(&[2.2]), Ok(3.0));
        assert_eq!(ceil(&[-2.7]), Ok(-2.0));

        let zero = ceil(&[-0.5]).unwrap();
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_positive());

        assert!(matches!(floor(&[f64::NAN]), Err(MathError::Domain(_))));
        assert_eq!(ceil(&[f64::INFINITY]), Err(MathError::Overflow));
    }

    #[test]
    fn test_fmod() {
        assert_eq!(fmod(&[7.0, 3.0]), Ok(1.0));
        assert_eq!(fmod(&[-7.0, 3.0]), Ok(-1.0));
        assert_eq!(fmod(&[7.5, 2.0]), Ok(1.5));
        assert_eq!(fmod(&[5.0, f64::INFINITY]), Ok(5.0));
        assert_eq!(fmod(&[5.0, 0.0]), Err(MathError::Domain(DOMAIN)));
        assert_eq!(fmod(&[f64::INFINITY, 2.0]), Err(MathError::Domain(DOMAIN)));
    }
}
