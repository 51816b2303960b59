//! Unit tests for the evaluator: value semantics, scope behavior, control
//! flow and runtime errors.

use crate::builtins::builtins::new_context_and_environment;
use crate::errors::errors::RuntimeError;
use crate::lexer::lexer::tokenize;
use crate::parser::parser::parse;

use super::evaluator::eval_program;
use super::object::{values_equal, Value};

fn run(input: &str) -> Result<Option<Value>, RuntimeError> {
    let (tokens, lexer_errors) = tokenize(input.to_string(), None);
    let (context, environment) = new_context_and_environment();
    let (program, errors) = parse(tokens, lexer_errors, &context);
    let messages: Vec<String> = errors.iter().map(|error| error.message()).collect();
    assert!(messages.is_empty(), "unexpected diagnostics: {:?}", messages);

    eval_program(&program, &environment)
}

fn run_int(input: &str) -> i64 {
    match run(input) {
        Ok(Some(value)) => value.as_int().expect("expected an int result"),
        other => panic!("expected an int result, got {:?}", other),
    }
}

fn run_string(input: &str) -> String {
    match run(input) {
        Ok(Some(Value::Str(value))) => value.to_string(),
        other => panic!("expected a string result, got {:?}", other),
    }
}

fn run_bool(input: &str) -> bool {
    match run(input) {
        Ok(Some(Value::Bool(value))) => value,
        other => panic!("expected a bool result, got {:?}", other),
    }
}

#[test]
fn test_arithmetic() {
    assert_eq!(run_int("let a := 5; a + 3;"), 8);
    assert_eq!(run_int("2 + 3 * 4;"), 14);
    assert_eq!(run_int("(2 + 3) * 4;"), 20);
    assert_eq!(run_int("10 - 2 - 3;"), 5);
}

#[test]
fn test_division_truncates_toward_zero() {
    assert_eq!(run_int("7 / 2;"), 3);
    assert_eq!(run_int("0 - 7 / 2;"), -3);
}

#[test]
fn test_division_by_zero_is_an_error() {
    let error = run("let zero := 0; 5 / zero;").unwrap_err();
    assert_eq!(error.message(), "Division by zero");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(run_string("\"a\" + \"b\";"), "ab");
    assert_eq!(run_string("\"n = \" + 42;"), "n = 42");
    assert_eq!(run_string("1 + \"!\";"), "1!");
}

#[test]
fn test_comparisons_and_equality() {
    assert!(run_bool("1 < 2;"));
    assert!(run_bool("2 >= 2;"));
    assert!(run_bool("1 == 1;"));
    assert!(run_bool("\"a\" == \"a\";"));
    assert!(run_bool("1 != 2;"));
    assert!(!run_bool("1 == 2;"));

    // Differing value kinds are never equal
    assert!(!run_bool("\"1\" == 1;"));
}

#[test]
fn test_logical_operators_coerce_truthiness() {
    assert!(run_bool("1 && \"x\";"));
    assert!(!run_bool("0 || \"\";"));
    assert!(run_bool("!0;"));
    assert!(!run_bool("!!0;"));
    assert!(!run_bool("!\"nonempty\";"));
}

#[test]
fn test_if_truthiness() {
    assert_eq!(run_int("let r := 0; if 5 r = 1; else r = 2; r;"), 1);
    assert_eq!(run_int("let r := 0; if \"\" r = 1; else r = 2; r;"), 2);
    assert_eq!(run_int("let r := 0; if false r = 1; r;"), 0);
}

#[test]
fn test_while_loop() {
    assert_eq!(
        run_int("let sum := 0; let i := 0; while i < 5 { sum = sum + i; i = i + 1; } sum;"),
        10
    );
}

#[test]
fn test_post_increment() {
    let (tokens, lexer_errors) = tokenize("let x := 5; let y := x++; let z := x; y + z * 100;".to_string(), None);
    let (context, environment) = new_context_and_environment();
    let (program, errors) = parse(tokens, lexer_errors, &context);
    assert!(errors.is_empty());

    // y keeps the pre-increment value, z sees the mutation
    let result = eval_program(&program, &environment).unwrap().unwrap();
    assert_eq!(result.as_int(), Some(5 + 6 * 100));
}

#[test]
fn test_pre_increment() {
    assert_eq!(run_int("let x := 5; let y := ++x; y;"), 6);
    assert_eq!(run_int("let x := 5; let y := ++x; x;"), 6);
    assert_eq!(run_int("let x := 5; x--; x;"), 4);
}

#[test]
fn test_increment_mutates_in_place_through_aliases() {
    // The binding copied with `:=` aliases the same storage cell
    assert_eq!(run_int("let x := 5; let y := x; x++; y;"), 6);
}

#[test]
fn test_assignment_rebinds_nearest_enclosing_frame() {
    assert_eq!(run_int("let x := 1; { x = 2; } x;"), 2);
    // Shadowing in a block leaves the outer binding alone
    assert_eq!(run_int("let x := 1; { let x := 9; x = 10; } x;"), 1);
}

#[test]
fn test_functions_and_returns() {
    assert_eq!(run_int("fn add(a: int, b: int) int { return a + b; } add(2, 3);"), 5);
    assert_eq!(
        run_int("fn fact(n: int) int { if n < 2 { return 1; } else { return n * fact(n - 1); } } fact(5);"),
        120
    );
}

#[test]
fn test_return_stops_at_call_boundary() {
    assert_eq!(
        run_int("fn f() int { return 1; } let a := f(); a + 1;"),
        2
    );
}

#[test]
fn test_closures_capture_defining_environment() {
    assert_eq!(
        run_int("let counter := 0; fn inc() { counter = counter + 1; } inc(); inc(); counter;"),
        2
    );
}

#[test]
fn test_block_scope_is_discarded() {
    assert_eq!(run_int("let x := 1; { let y := 10; x = x + y; } x;"), 11);
}

#[test]
fn test_builtins() {
    assert_eq!(run_int("min(3, 7);"), 3);
    assert_eq!(run_int("max(3, 7);"), 7);
    assert_eq!(run_int("\"hello\".length();"), 5);
    assert_eq!(run_string("\"hello\".uppercase();"), "HELLO");
    assert_eq!(run_string("\"HELLO\".lowercase();"), "hello");
    assert_eq!(run_string("5.toString();"), "5");
    assert_eq!(run_int("\"42\".parseInt();"), 42);
    assert_eq!(run_int("let n := 0 - 4; n.abs();"), 4);
}

#[test]
fn test_type_member_dispatch_binds_this() {
    assert_eq!(
        run_int("fn (int)::double() int { return this * 2; } let x := 21; x.double();"),
        42
    );
}

#[test]
fn test_interface_member_dispatches_on_dynamic_type() {
    assert_eq!(
        run_int(
            "type T := iface { len: int; }; \
             fn (int)::len() int { return 5; } \
             let x: T = 3; \
             x.len();"
        ),
        5
    );
}

#[test]
fn test_equality_falls_back_to_identity() {
    assert!(!run_bool("null == null;"));
    assert!(run_bool("fn f() {} f == f;"));
}

#[test]
fn test_void_call_produces_no_printable_result() {
    let result = run("fn nothing() {} nothing();").unwrap();
    assert!(matches!(result, Some(Value::Void)));
}

#[test]
fn test_values_equal_on_shared_cells() {
    let five = Value::int(5);
    assert!(values_equal(&five, &five.clone()));
    assert!(values_equal(&Value::int(5), &Value::int(5)));
    assert!(!values_equal(&Value::int(5), &Value::int(6)));
}
