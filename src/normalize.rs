use crate::config::BindingMode;
use crate::error::ArgumentError;
use crate::Bindings;
use log::debug;

/// Short spellings accepted in formulas and the qualified names the evaluator
/// resolves. Each entry targets a distinct opening token, so the order in which
/// they are applied does not matter.
pub const KEYWORD_REWRITES: [(&str, &str); 12] = [
    ("PI", "math.pi"),
    ("sqrt(", "math.sqrt("),
    ("log(", "math.log("),
    ("sin(", "math.sin("),
    ("cos(", "math.cos("),
    ("tan(", "math.tan("),
    ("mod(", "math.fmod("),
    ("pow(", "math.pow("),
    ("factorial(", "math.factorial("),
    ("abs(", "math.fabs("),
    ("floor(", "math.floor("),
    ("ceil(", "math.ceil("),
];

/// The bare keyword spellings (`sqrt`, `PI`, ...).
pub fn keywords() -> impl Iterator<Item = &'static str> {
    KEYWORD_REWRITES
        .iter()
        .map(|(short, _)| short.trim_end_matches('('))
}

/// Formula text ready for parsing, plus the bindings the evaluator resolves
/// bare identifiers against (empty when values were substituted textually).
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub text: String,
    pub environment: Bindings,
}

/// `true` for non-empty, ASCII-letters-only names.
pub fn is_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn rewrite_keywords(formula: &str) -> String {
    KEYWORD_REWRITES
        .iter()
        .fold(formula.to_string(), |text, (short, qualified)| {
            text.replace(short, qualified)
        })
}

pub fn check_binding(name: &str, value: f64) -> Result<(), ArgumentError> {
    if !is_word(name) {
        return Err(ArgumentError::InvalidVariableName(name.to_string()));
    }
    if !value.is_finite() {
        return Err(ArgumentError::InvalidVariableValue {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Reads a binding value typed by a user.
pub fn parse_binding_value(name: &str, text: &str) -> Result<f64, ArgumentError> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|_| ArgumentError::InvalidVariableValue {
            name: name.to_string(),
            value: text.to_string(),
        })?;
    check_binding(name, value)?;
    Ok(value)
}

pub fn normalize(
    formula: &str,
    bindings: &Bindings,
    mode: BindingMode,
) -> Result<Normalized, ArgumentError> {
    let mut text = rewrite_keywords(formula);
    let mut environment = Bindings::new();

    // Sorted so textual substitution is reproducible across runs.
    let mut entries: Vec<(&String, &f64)> = bindings.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (name, value) in entries {
        check_binding(name, *value)?;

        match mode {
            BindingMode::Environment => {
                environment.insert(name.clone(), *value);
            }
            BindingMode::Textual => {
                // Presence is checked against the caller's text, replacement
                // happens in the rewritten one.
                if formula.contains(name.as_str()) {
                    text = text.replace(name.as_str(), &format!("({})", value));
                }
            }
        }
    }

    debug!("Transformed formula: {}", text);
    Ok(Normalized { text, environment })
}
