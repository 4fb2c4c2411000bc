pub mod arithmetic;
pub mod combinatorics;
pub mod elementary;
pub mod rounding;
pub mod trigonometry;

use crate::ast::MathTables;

/// Message carried by every input outside a function's domain.
pub(crate) const DOMAIN: &str = "math domain error";

pub fn register_functions(tables: &mut MathTables) {
    arithmetic::register(tables);
    elementary::register(tables);
    trigonometry::register(tables);
    rounding::register(tables);
    combinatorics::register(tables);
}
