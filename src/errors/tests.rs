//! Unit tests for diagnostics and their deduplication.

use super::errors::{dedup_errors, ParseError, ParseErrorKind};

fn error_at(line: usize, col: usize, message: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidExpression {
            message: message.to_string(),
        },
        line,
        col,
        None,
    )
}

#[test]
fn test_dedup_removes_repeats_at_same_position() {
    let errors = vec![
        error_at(1, 5, "Type mismatch: int + bool"),
        error_at(1, 5, "Type mismatch: int + bool"),
        error_at(1, 5, "Type mismatch: int + bool"),
    ];

    assert_eq!(dedup_errors(errors).len(), 1);
}

#[test]
fn test_dedup_keeps_distinct_positions_and_messages() {
    let errors = vec![
        error_at(1, 5, "Type mismatch: int + bool"),
        error_at(1, 9, "Type mismatch: int + bool"),
        error_at(1, 5, "Cannot resolve reference to 'a'"),
    ];

    assert_eq!(dedup_errors(errors).len(), 3);
}

#[test]
fn test_dedup_preserves_order() {
    let errors = vec![
        error_at(2, 1, "second"),
        error_at(1, 1, "first"),
        error_at(2, 1, "second"),
    ];

    let deduped = dedup_errors(errors);
    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].message(), "second");
    assert_eq!(deduped[1].message(), "first");
}

#[test]
fn test_pretty_print_without_source() {
    let error = error_at(3, 7, "Unclosed block");
    let printed = error.pretty_print(false);

    assert!(printed.contains("Error: Unclosed block"));
    assert!(!printed.contains("3:7"));
}

#[test]
fn test_pretty_print_with_source_location() {
    let error = ParseError::new(
        ParseErrorKind::Redefinition { name: "a".to_string() },
        3,
        7,
        Some(std::rc::Rc::new("main.qn".to_string())),
    );
    let printed = error.pretty_print(true);

    assert!(printed.contains("Error: Cannot redefine 'a'"));
    assert!(printed.contains("main.qn:3:7"));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ParseErrorKind::NotAssignable {
            from: "string".to_string(),
            to: "int".to_string(),
        }
        .to_string(),
        "Type 'string' is not assignable to 'int'"
    );
    assert_eq!(
        ParseErrorKind::ExpectedToken {
            expected: "';'".to_string(),
            got: "EOF".to_string(),
        }
        .to_string(),
        "Expected ';', got EOF instead"
    );
}
