//! skein interpreter CLI

use clap::{Parser, Subcommand};
use serde::Serialize;
use skein::error::report_error;
use skein::interp::{Interner, Interpreter, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skein", version, about = "skein - a stack-oriented language")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a source file
    Run {
        /// Source file to run
        file: PathBuf,
    },
    /// Parse and dump the program tree (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Start an interactive session
    Repl,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { file } => run_file(&file),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Repl => repl(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let mut interp = Interpreter::new();
    let program = match interp.parse_source(&source) {
        Ok(program) => program,
        Err(err) => {
            report_error(&filename, &source, &err);
            std::process::exit(1);
        }
    };

    // The program file executes unscoped: its declarations land in the
    // outermost frame
    if let Err(err) = interp.exec_list(program, false) {
        eprintln!("Runtime error: {err}");
        std::process::exit(1);
    }

    // Leftover values are suspicious but not fatal
    if !interp.stack().is_empty() {
        let rendered: Vec<String> = interp
            .stack()
            .iter()
            .map(|v| v.repr(interp.interner()))
            .collect();
        eprintln!(
            "Warning: {} value(s) left on the stack: {}",
            interp.stack().len(),
            rendered.join(" ")
        );
    }

    Ok(())
}

fn parse_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let mut interner = Interner::new();
    let program = match skein::parser::parse(&source, &mut interner) {
        Ok(program) => program,
        Err(err) => {
            report_error(&filename, &source, &err);
            std::process::exit(1);
        }
    };

    let tree: Vec<serde_json::Value> = program.iter().map(|v| value_to_json(v, &interner)).collect();
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

fn tokenize_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    #[derive(Serialize)]
    struct Entry {
        token: skein::lexer::Token,
        span: skein::span::Span,
    }

    match skein::lexer::tokenize(&source) {
        Ok(tokens) => {
            for (token, span) in tokens {
                println!("{}", serde_json::to_string(&Entry { token, span })?);
            }
        }
        Err(err) => {
            report_error(&filename, &source, &err);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn repl() -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = skein::repl::Repl::new()?;
    repl.run()?;
    Ok(())
}

/// Render a value with symbol handles resolved back to their names
fn value_to_json(value: &Value, interner: &Interner) -> serde_json::Value {
    use serde_json::json;
    match value {
        Value::Number(n) => json!({ "number": n }),
        Value::Boolean(b) => json!({ "boolean": b }),
        Value::Character(c) => json!({ "character": *c }),
        Value::QuotedSymbol(sym) => json!({ "quoted_symbol": interner.name(*sym) }),
        Value::Symbol(sym) => json!({ "symbol": interner.name(*sym) }),
        Value::List(items) => {
            let children: Vec<serde_json::Value> =
                items.iter().map(|v| value_to_json(v, interner)).collect();
            json!({ "list": children })
        }
    }
}
