//! Interactive expression tester
//!
//! Reads an expression, then evaluates integers against it until `end`.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use expression_parser_core::{ExpressionParser, ParserConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "expr-repl", about = "Parse an integer condition and test values against it")]
struct Args {
    /// Expression to use for the first round instead of prompting
    #[arg(long)]
    expr: Option<String>,

    /// Reject expressions that end with unclosed brackets
    #[arg(long)]
    strict_braces: bool,
}

const SENTINEL: &str = "end";

const BANNER: &str = "\
Expressions must be in the form \"COMP [LOGIC COMP]...\" where:
 - COMP is a comparison operator (<, <=, >, >=, =, !=) followed by an integer, no space between
 - LOGIC is 'and'/'&&' or 'or'/'||'
 - brackets may be used to change the order of operations

Examples:
 - \"<=100\"
 - \">=0 && <=100 && !=50\"
 - \">10 and <50 or >100\"   ('and' only passes if >10 and <50)
 - \">10 and (<50 or >100)\" ('and' passes if <50 OR >100 due to brackets)
";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = ParserConfig {
        reject_unclosed_braces: args.strict_braces,
    };

    println!("{}", BANNER);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut parser = ExpressionParser::with_config(config);
    let mut preset = args.expr;

    loop {
        parser.reset();

        let expression = match preset.take() {
            Some(expr) => expr,
            None => match prompt(&mut lines, "Type an expression (or 'end' to quit): ")? {
                Some(line) => line,
                None => break,
            },
        };
        if expression == SENTINEL {
            break;
        }

        if let Err(err) = parser.parse(&expression) {
            println!("Expression failed: {}\n", err);
            continue;
        }

        if !test_values(&parser, &mut lines)? {
            break;
        }
    }

    Ok(())
}

/// Evaluate values until the sentinel; returns false when input is exhausted
fn test_values<B: BufRead>(parser: &ExpressionParser, lines: &mut io::Lines<B>) -> Result<bool> {
    loop {
        let Some(input) = prompt(lines, "\nType an input to evaluate (or 'end' to stop testing): ")?
        else {
            return Ok(false);
        };

        match input.as_str() {
            SENTINEL => return Ok(true),
            ":tree" => {
                println!("{}", parser.describe().unwrap_or_default());
            }
            _ => match input.parse::<i32>() {
                Ok(value) => {
                    let verdict = if parser.evaluate(value) { "TRUE" } else { "FALSE" };
                    println!("Evaluated result: {}", verdict);
                }
                Err(_) => println!("Invalid input."),
            },
        }
    }
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, message: &str) -> Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", message)?;
    stdout.flush()?;

    match lines.next() {
        Some(line) => Ok(Some(line?.trim_end_matches('\r').to_string())),
        None => Ok(None),
    }
}
