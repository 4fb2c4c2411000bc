/// How bound variables reach the evaluator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BindingMode {
    /// Bare identifiers are looked up in the bindings at evaluation time.
    #[default]
    Environment,
    /// Every occurrence of a variable name in the formula text is replaced by
    /// `(<value>)` before parsing. A name that is a substring of a keyword or of
    /// another variable name gets replaced inside it too.
    Textual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub binding_mode: BindingMode,
    /// Deepest parenthesis nesting accepted before parsing.
    pub max_depth: usize,
    /// Number of parsed formulas kept by the engine; 0 disables the cache.
    pub cache_capacity: usize,
    /// Letters the validator always admits on top of keyword and variable letters.
    pub variable_letters: String,
}

pub const DEFAULT_MAX_DEPTH: usize = 100;
pub const DEFAULT_VARIABLE_LETTERS: &str = "xyz";

impl Default for Config {
    fn default() -> Self {
        Self {
            binding_mode: BindingMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            cache_capacity: 0,
            variable_letters: DEFAULT_VARIABLE_LETTERS.to_string(),
        }
    }
}

impl Config {
    pub fn with_binding_mode(mut self, binding_mode: BindingMode) -> Self {
        self.binding_mode = binding_mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_variable_letters(mut self, letters: &str) -> Self {
        self.variable_letters = letters.to_string();
        self
    }
}
