use formula_rs::normalize::{is_word, parse_binding_value};
use formula_rs::{compute_formula, Bindings};
use std::io::{self, BufRead, Write};

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn describe(bindings: &Bindings) -> String {
    let mut entries: Vec<_> = bindings.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let entries: Vec<String> = entries
        .into_iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn main() -> io::Result<()> {
    pretty_env_logger::init();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let formula = prompt(&mut input, "Enter a formula: ")?;

    let answer = prompt(&mut input, "Enter the number of unknowns: ")?;
    let count = match answer.parse::<usize>() {
        Ok(count) if answer.chars().all(|c| c.is_ascii_digit()) => count,
        _ => {
            println!("Error: Number of unknowns must be a positive integer");
            return Ok(());
        }
    };

    let mut bindings = Bindings::new();
    for i in 1..=count {
        let name = prompt(&mut input, &format!("Enter the name of the unknown {}: ", i))?;
        if !is_word(&name) {
            println!("Error: Unknown name must contain only letters");
            return Ok(());
        }

        let text = prompt(&mut input, &format!("Enter the value of {}: ", name))?;
        let Ok(value) = parse_binding_value(&name, &text) else {
            println!("Error: Unknown value must be a number (e.g., 5, -3, 3.14, -2.5)");
            return Ok(());
        };

        bindings.insert(name, value);
    }

    match compute_formula(&formula, Some(&bindings)) {
        Ok(result) => println!("{} with {} = {}", formula, describe(&bindings), result),
        Err(e) => println!("Error: {}", e),
    }

    Ok(())
}
