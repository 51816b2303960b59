//! Integration tests for the end-to-end pipeline.
//!
//! These tests verify that the complete pipeline works correctly from
//! source text through tokenization, parsing with inline type checking,
//! and evaluation, including the interactive session's state discipline.

use quince::builtins::builtins::new_context_and_environment;
use quince::errors::errors::ParseError;
use quince::evaluator::environment::Environment;
use quince::evaluator::evaluator::eval_program;
use quince::evaluator::object::Value;
use quince::lexer::lexer::tokenize;
use quince::parser::parser::parse;
use quince::types::context::Context;

fn check(input: &str) -> Vec<ParseError> {
    let (tokens, lexer_errors) = tokenize(input.to_string(), None);
    let (context, _environment) = new_context_and_environment();
    let (_, errors) = parse(tokens, lexer_errors, &context);
    errors
}

fn run(input: &str) -> Option<Value> {
    let (tokens, lexer_errors) = tokenize(input.to_string(), None);
    let (context, environment) = new_context_and_environment();
    let (program, errors) = parse(tokens, lexer_errors, &context);
    assert!(errors.is_empty(), "unexpected diagnostics");

    eval_program(&program, &environment).expect("unexpected runtime error")
}

#[test]
fn test_run_simple_program() {
    let result = run("let a := 5; a + 3;").unwrap();
    assert_eq!(result.as_int(), Some(8));
}

#[test]
fn test_run_string_program() {
    match run("\"a\" + \"b\";").unwrap() {
        Value::Str(value) => assert_eq!(value.as_str(), "ab"),
        other => panic!("expected a string, got {:?}", other),
    }
}

#[test]
fn test_run_function_program() {
    let source = "
        fn fib(n: int) int {
            if n < 2 {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }
        fib(10);
    ";
    assert_eq!(run(source).unwrap().as_int(), Some(55));
}

#[test]
fn test_run_type_member_program() {
    let source = "
        type Sized := iface { size: int; };
        fn (string)::size() int {
            return this.length();
        }
        let x: Sized = \"four\";
        x.size();
    ";
    assert_eq!(run(source).unwrap().as_int(), Some(4));
}

#[test]
fn test_missing_return_blocks_evaluation() {
    let errors = check("fn noReturn() string {}");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Missing return statement");
}

#[test]
fn test_single_diagnostic_for_bad_let() {
    let errors = check("let a: int = \"x\";");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Type 'string' is not assignable to 'int'");
}

#[test]
fn test_diagnostics_carry_positions() {
    let (tokens, lexer_errors) = tokenize("let a := 5;\nlet a := 6;".to_string(), Some("test.qn".to_string()));
    let (context, _environment) = new_context_and_environment();
    let (_, errors) = parse(tokens, lexer_errors, &context);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].position(), (2, 5));
    assert_eq!(errors[0].file().map(|file| file.as_str()), Some("test.qn"));
}

#[test]
fn test_repl_session_commits_only_checked_lines() {
    let (mut context, mut environment) = new_context_and_environment();
    let mut results = vec![];

    for line in ["let a := 5;", "let b: int = \"x\";", "a + 3;"] {
        let (tokens, lexer_errors) = tokenize(line.to_string(), None);
        let new_context = Context::extend(&context);
        let (program, errors) = parse(tokens, lexer_errors, &new_context);

        if !errors.is_empty() {
            // A failed line leaves prior state untouched
            continue;
        }

        context = new_context;
        environment = Environment::extend(&environment, context.clone());
        results.push(eval_program(&program, &environment).unwrap());
    }

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].as_ref().and_then(|value| value.as_int()), Some(8));
}

#[test]
fn test_runtime_error_stops_execution() {
    let (tokens, lexer_errors) = tokenize("let zero := 0; let x := 1 / zero; x;".to_string(), None);
    let (context, environment) = new_context_and_environment();
    let (program, errors) = parse(tokens, lexer_errors, &context);
    assert!(errors.is_empty());

    let error = eval_program(&program, &environment).unwrap_err();
    assert_eq!(error.message(), "Division by zero");
}

#[test]
fn test_increment_program() {
    let source = "let x := 5; let y := x++; let z := x; y * 10 + z;";
    assert_eq!(run(source).unwrap().as_int(), Some(56));
}

#[test]
fn test_shadowing_program() {
    let source = "
        let x := 1;
        fn f() int {
            let x := 2;
            { let x := 3; }
            return x;
        }
        f() * 10 + x;
    ";
    assert_eq!(run(source).unwrap().as_int(), Some(21));
}

#[test]
fn test_optional_program() {
    let source = "
        type maybeString := string?;
        let s: maybeString = null;
        s = \"present\";
        let t: maybeString = s;
    ";
    assert!(run(source).is_none());
}
