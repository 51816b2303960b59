//! Interactive session.
//!
//! Each input line is lexed, parsed and checked against an extension of the
//! persistent context; only a successfully checked line commits that
//! extension and extends the environment, so a failed line leaves all prior
//! state untouched.

use std::io::{BufRead, Write};

use crate::{
    builtins::builtins::new_context_and_environment,
    evaluator::{environment::Environment, evaluator::eval_program, object::Value},
    lexer::lexer::tokenize,
    parser::parser::parse,
    types::context::Context,
};

const PROMPT: &str = "> ";

pub fn start() {
    let stdin = std::io::stdin();
    let (mut context, mut environment) = new_context_and_environment();

    loop {
        print!("{}", PROMPT);
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        let input = format!("{};", line.trim_end());
        let (tokens, lexer_errors) = tokenize(input, None);

        let new_context = Context::extend(&context);
        let (program, errors) = parse(tokens, lexer_errors, &new_context);

        if !errors.is_empty() {
            for error in &errors {
                println!("{}", error.pretty_print(false));
            }
            continue;
        }

        context = new_context;
        environment = Environment::extend(&environment, context.clone());

        match eval_program(&program, &environment) {
            Ok(Some(value)) => {
                if !matches!(value, Value::Void) {
                    println!("{}", value);
                }
            }
            Ok(None) => {}
            Err(error) => println!("{}", error),
        }
    }
}
