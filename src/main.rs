use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use quince::{
    builtins::builtins::new_context_and_environment,
    evaluator::evaluator::eval_program,
    lexer::lexer::tokenize,
    parser::parser::parse,
    repl,
};

/// The quince programming language.
#[derive(Parser)]
#[command(name = "quince", version)]
struct Cli {
    /// Source file to run; starts a REPL when omitted
    file: Option<PathBuf>,

    /// Force colorized diagnostics even when not writing to a terminal
    #[arg(long)]
    force_color: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.force_color {
        colored::control::set_override(true);
    }

    match &cli.file {
        Some(path) => run_file(path),
        None => repl::start(),
    }
}

fn run_file(path: &Path) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("{}: {}", path.display(), error);
            std::process::exit(1);
        }
    };

    let file_name = path.to_string_lossy().to_string();
    let (tokens, lexer_errors) = tokenize(source, Some(file_name));

    let (context, environment) = new_context_and_environment();
    let (program, errors) = parse(tokens, lexer_errors, &context);

    if !errors.is_empty() {
        let noun = if errors.len() > 1 { "errors" } else { "error" };
        println!("{}", format!("Encountered {} {}:", errors.len(), noun).red());
        for error in &errors {
            println!("{}", error.pretty_print(true));
        }
        std::process::exit(1);
    }

    if let Err(error) = eval_program(&program, &environment) {
        println!("{}", error.pretty_print(true));
    }
}
