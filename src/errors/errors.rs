use std::rc::Rc;

use colored::Colorize;
use thiserror::Error;

use crate::lexer::tokens::Token;

/// A diagnostic produced while lexing, parsing or type-checking.
///
/// Parse errors never abort the run; the parser records them and recovers,
/// so one input can surface several independent diagnostics.
#[derive(Debug, Clone)]
pub struct ParseError {
    kind: ParseErrorKind,
    line: usize,
    col: usize,
    file: Option<Rc<String>>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, col: usize, file: Option<Rc<String>>) -> Self {
        ParseError { kind, line, col, file }
    }

    pub fn from_token(kind: ParseErrorKind, token: &Token) -> Self {
        ParseError {
            kind,
            line: token.line,
            col: token.col,
            file: token.file.clone(),
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    pub fn file(&self) -> Option<&Rc<String>> {
        self.file.as_ref()
    }

    pub fn pretty_print(&self, with_source: bool) -> String {
        let mut result = format!("Error: {}", self.message()).red().to_string();
        if with_source {
            result += "\n\tin ";
            if let Some(file) = &self.file {
                result += file.as_str();
                result += ":";
            }
            result += &format!("{}:{}", self.line, self.col);
        }
        result
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("Illegal token")]
    IllegalToken,
    #[error("Unclosed string literal")]
    UnclosedStringLiteral,
    #[error("Invalid escape sequence")]
    InvalidEscapeSequence,
    #[error("Integer out of bounds")]
    IntegerOutOfBounds,
    #[error("Float out of bounds")]
    FloatOutOfBounds,
    #[error("Unexpected {token}")]
    UnexpectedToken { token: String },
    #[error("Expected {expected}, got {got} instead")]
    ExpectedToken { expected: String, got: String },
    #[error("Invalid identifier")]
    InvalidIdentifier,
    #[error("{message}")]
    InvalidExpression { message: String },
    #[error("Type '{from}' is not assignable to '{to}'")]
    NotAssignable { from: String, to: String },
    #[error("Cannot redefine '{name}'")]
    Redefinition { name: String },
    #[error("Unknown type '{name}'")]
    UnknownType { name: String },
    #[error("Illegal return statement")]
    IllegalReturn,
    #[error("Unreachable code")]
    UnreachableCode,
    #[error("Missing return statement")]
    MissingReturn,
    #[error("Unclosed block")]
    UnclosedBlock,
}

/// Drops diagnostics that repeat an earlier one at the same source position
/// with the same message. A single malformed token can otherwise flood the
/// output through repeated recovery attempts.
pub fn dedup_errors(errors: Vec<ParseError>) -> Vec<ParseError> {
    let mut seen: Vec<(usize, usize, Option<Rc<String>>, String)> = vec![];
    let mut result = vec![];

    for error in errors {
        let key = (error.line, error.col, error.file.clone(), error.message());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        result.push(error);
    }

    result
}

/// An error raised during evaluation.
///
/// Runtime errors propagate upward exactly like return values until they
/// reach the top level, where the run stops; there is no recovery.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    kind: RuntimeErrorKind,
    line: usize,
    col: usize,
    file: Option<Rc<String>>,
}

impl RuntimeError {
    pub fn from_token(kind: RuntimeErrorKind, token: &Token) -> Self {
        RuntimeError {
            kind,
            line: token.line,
            col: token.col,
            file: token.file.clone(),
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    pub fn pretty_print(&self, with_source: bool) -> String {
        let mut result = format!("ERROR: {}", self.message());
        if with_source {
            result += "\n\tin ";
            if let Some(file) = &self.file {
                result += file.as_str();
                result += ":";
            }
            result += &format!("{}:{}", self.line, self.col);
        }
        result
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ERROR: {}", self.message())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Cannot resolve identifier '{name}'")]
    UnresolvedIdentifier { name: String },
    #[error("Cannot resolve variable '{name}'")]
    UnresolvedAssignTarget { name: String },
    #[error("Cannot resolve member '{name}'")]
    UnresolvedMember { name: String },
    #[error("Mismatching number of arguments")]
    MismatchingArguments,
    #[error("Cannot call non-function")]
    NotCallable,
    #[error("Implicit conversion to int not possible")]
    IntConversion,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Unknown prefix operator")]
    UnknownPrefixOperator,
    #[error("Unknown infix operator")]
    UnknownInfixOperator,
    #[error("Cannot increment non-int")]
    IncrementNonInt,
    #[error("Cannot re-declare function '{name}'")]
    FunctionRedeclaration { name: String },
    #[error("Parameter '{name}' already exists")]
    DuplicateParameter { name: String },
    #[error("Missing receiver")]
    MissingReceiver,
    #[error("Failed to read input")]
    InputFailed,
}
