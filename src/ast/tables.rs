use crate::ast::{BinaryOperator, UnaryOperator};
use crate::error::MathError;
use crate::functions::register_functions;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::LazyLock;

pub type BinaryFn = fn(f64, f64) -> Result<f64, MathError>;
pub type UnaryFn = fn(f64) -> Result<f64, MathError>;
pub type Function = fn(&[f64]) -> Result<f64, MathError>;

/// Operator, function and constant lookup tables used by the evaluator.
///
/// Functions and constants are keyed by their qualified name (`math.sqrt`).
#[derive(Clone, Default)]
pub struct MathTables {
    binary: HashMap<BinaryOperator, BinaryFn>,
    unary: HashMap<UnaryOperator, UnaryFn>,
    functions: HashMap<String, Function>,
    constants: HashMap<String, f64>,
}

static STANDARD: LazyLock<MathTables> = LazyLock::new(|| {
    let mut tables = MathTables::default();
    register_functions(&mut tables);
    tables.register_constant("math.pi", PI);
    tables
});

impl MathTables {
    /// The shared tables holding every supported operator, function and constant.
    pub fn standard() -> &'static MathTables {
        &STANDARD
    }

    pub(crate) fn register_binary(&mut self, operator: BinaryOperator, function: BinaryFn) {
        self.binary.insert(operator, function);
    }

    pub(crate) fn register_unary(&mut self, operator: UnaryOperator, function: UnaryFn) {
        self.unary.insert(operator, function);
    }

    pub(crate) fn register_function(&mut self, name: &str, function: Function) {
        self.functions.insert(name.to_string(), function);
    }

    pub(crate) fn register_constant(&mut self, name: &str, value: f64) {
        self.constants.insert(name.to_string(), value);
    }

    pub fn binary(&self, operator: BinaryOperator) -> Option<BinaryFn> {
        self.binary.get(&operator).copied()
    }

    pub fn unary(&self, operator: UnaryOperator) -> Option<UnaryFn> {
        self.unary.get(&operator).copied()
    }

    pub fn function(&self, name: &str) -> Option<Function> {
        self.functions.get(name).copied()
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}
