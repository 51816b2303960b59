//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed-text tokens
//!
//! These macros reduce boilerplate in the lexer's pattern table.

/// Creates a Token instance anchored at the given source position.
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $literal:expr, $line:expr, $col:expr, $file:expr) => {
        Token {
            kind: $kind,
            literal: $literal,
            line: $line,
            col: $col,
            file: $file,
        }
    };
}

/// Creates a lexer handler for tokens whose text is a fixed literal.
///
/// The generated handler emits a token of the given kind at the current
/// position and advances the lexer past the literal.
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let (line, col) = lexer.position();
            let file = lexer.file();
            lexer.push(MK_TOKEN!($kind, String::from($value), line, col, file));
            lexer.advance_str($value);
        }
    };
}
