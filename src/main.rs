use rationalist::{Config, Number, Problem, RaisePolicy, Rational};
use std::io;

fn options() -> Config {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("Usage: rationalist [options]");
        println!("Reads lines like `1/3 + 0.25` and prints the exact answer");
        println!("Options:");
        println!("  -h, --help: Print this help message");
        println!("  --demote: Integral answers become plain integers");
        std::process::exit(0);
    }
    Config {
        auto_demote_integral: args.contains("--demote"),
    }
}

fn operand(text: &str, cfg: &Config) -> Result<Number, Problem> {
    match Rational::parse(text, cfg, RaisePolicy::Raise)? {
        Some(n) => Ok(n),
        None => Err(Problem::InvalidLiteral(text.to_owned())),
    }
}

fn evaluate(line: &str, cfg: &Config) -> Result<Number, Problem> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words[..] {
        [value] => operand(value, cfg),
        [left, op, right] => {
            let left = operand(left, cfg)?;
            let right = operand(right, cfg)?;
            match op {
                "+" => left.add(&right, cfg),
                "-" => left.sub(&right, cfg),
                "*" => left.mul(&right, cfg),
                "/" => left.div(&right, cfg),
                "**" | "^" => left.pow(&right, cfg),
                "div" => left.idiv(&right, cfg),
                "%" | "mod" => left.modulo(&right, cfg),
                "rem" => left.remainder(&right, cfg),
                _ => Err(Problem::InvalidLiteral(op.to_owned())),
            }
        }
        _ => Err(Problem::InvalidLiteral(line.to_owned())),
    }
}

pub fn main() {
    env_logger::init();
    let cfg = options();

    loop {
        let mut input = String::new();

        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => (),
            Err(e) => {
                eprintln!("Failed to read calculator input: {e}");
                break;
            }
        }

        let line = input.trim();
        if line.is_empty() {
            break;
        }

        match evaluate(line, &cfg) {
            Ok(Number::Rational(ans)) if !ans.is_integer() => {
                println!("{ans} ~= {ans:#.20}");
            }
            Ok(ans) => println!("{ans}"),
            Err(Problem::DivideByZero) => println!("Attempted division by zero"),
            Err(problem) => println!("Calculation failed: {problem}"),
        }
    }
}
