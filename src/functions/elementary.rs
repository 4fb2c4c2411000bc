use crate::ast::MathTables;
use crate::error::MathError;
use crate::functions::DOMAIN;
use formula_macros::math_fn;

pub fn register(tables: &mut MathTables) {
    tables.register_function("math.sqrt", sqrt);
    tables.register_function("math.log", log);
    tables.register_function("math.pow", pow);
    tables.register_function("math.fabs", fabs);
}

#[math_fn]
pub fn sqrt(x: f64) -> Result<f64, MathError> {
    if x < 0.0 {
        return Err(MathError::Domain(DOMAIN));
    }
    Ok(x.sqrt())
}

fn natural_log(x: f64) -> Result<f64, MathError> {
    if x.is_nan() || x > 0.0 {
        Ok(x.ln())
    } else {
        Err(MathError::Domain(DOMAIN))
    }
}

/// `log(x)` is the natural logarithm, `log(x, base)` divides it by `ln(base)`.
pub fn log(args: &[f64]) -> Result<f64, MathError> {
    match *args {
        [x] => natural_log(x),
        [x, base] => {
            let numerator = natural_log(x)?;
            let denominator = natural_log(base)?;
            if denominator == 0.0 {
                return Err(MathError::DivisionByZero);
            }
            Ok(numerator / denominator)
        }
        _ => Err(MathError::Arity {
            expected: if args.is_empty() { 1 } else { 2 },
            found: args.len(),
        }),
    }
}

/// Floating-point power. Unlike `**`, a zero base with a negative exponent is
/// a domain error rather than a division by zero.
#[math_fn]
pub fn pow(x: f64, y: f64) -> Result<f64, MathError> {
    let result = x.powf(y);

    if x.is_finite() && y.is_finite() {
        if result.is_nan() {
            return Err(MathError::Domain(DOMAIN));
        }
        if result.is_infinite() {
            return Err(if x == 0.0 {
                MathError::Domain(DOMAIN)
            } else {
                MathError::Overflow
            });
        }
    }
    Ok(result)
}

#[math_fn]
pub fn fabs(x: f64) -> Result<f64, MathError> {
    Ok(x.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt(&[16.0]), Ok(4.0));
        assert_eq!(sqrt(&[0.0]), Ok(0.0));
        assert_eq!(sqrt(&[f64::INFINITY]), Ok(f64::INFINITY));
        assert_eq!(sqrt(&[-1.0]), Err(MathError::Domain(DOMAIN)));
        assert_eq!(sqrt(&[-f64::INFINITY]), Err(MathError::Domain(DOMAIN)));
        assert!(sqrt(&[f64::NAN]).unwrap().is_nan());
        assert_eq!(
            sqrt(&[1.0, 2.0]),
            Err(MathError::Arity {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_log() {
        assert_eq!(log(&[1.0]), Ok(0.0));
        assert_eq!(log(&[std::f64::consts::E]), Ok(1.0));
        assert_eq!(log(&[100.0, 10.0]), Ok(2.0));
        assert_eq!(log(&[0.0]), Err(MathError::Domain(DOMAIN)));
        assert_eq!(log(&[-3.0]), Err(MathError::Domain(DOMAIN)));
        assert_eq!(log(&[8.0, -2.0]), Err(MathError::Domain(DOMAIN)));
        assert_eq!(log(&[8.0, 1.0]), Err(MathError::DivisionByZero));
        assert_eq!(log(&[f64::INFINITY]), Ok(f64::INFINITY));
        assert!(matches!(log(&[]), Err(MathError::Arity { expected: 1, found: 0 })));
        assert!(matches!(
            log(&[1.0, 2.0, 3.0]),
            Err(MathError::Arity { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_pow() {
        assert_eq!(pow(&[2.0, 3.0]), Ok(8.0));
        assert_eq!(pow(&[-2.0, 2.0]), Ok(4.0));
        assert_eq!(pow(&[1.0, f64::NAN]), Ok(1.0));
        assert_eq!(pow(&[0.0, -1.0]), Err(MathError::Domain(DOMAIN)));
        assert_eq!(pow(&[-8.0, 0.5]), Err(MathError::Domain(DOMAIN)));
        assert_eq!(pow(&[10.0, 400.0]), Err(MathError::Overflow));
        assert_eq!(pow(&[f64::INFINITY, 2.0]), Ok(f64::INFINITY));
    }

    #[test]
    fn test_fabs() {
        assert_eq!(fabs(&[-2.5]), Ok(2.5));
        assert_eq!(fabs(&[3.0]), Ok(3.0));
    }
}
