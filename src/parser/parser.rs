//! Parser implementation for building the checked AST.
//!
//! This module contains the main Parser struct, the program entry point and
//! the return-reachability analysis. The parser uses a Pratt parser approach
//! with NUD/LED handlers for expression parsing and specialized functions
//! for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers

use crate::{
    ast::statements::{BlockStatement, Program, Statement},
    errors::errors::{dedup_errors, ParseError, ParseErrorKind},
    lexer::tokens::{Token, TokenKind},
    types::{
        context::Context,
        types::{is_assignable, Type},
    },
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    types::{
        create_token_type_lookups, TypeBPLookup, TypeBindingPower, TypeLEDHandler, TypeLEDLookup,
        TypeNUDHandler, TypeNUDLookup,
    },
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream, the collected diagnostics, and the
/// lookup tables for parsing statements, expressions, and types. It tracks
/// the current position in the token stream and provides methods for token
/// consumption and error recording.
pub struct Parser {
    /// The list of tokens to parse, terminated by an EOF token
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Diagnostics collected so far (seeded with the lexer's)
    errors: Vec<ParseError>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Lookup table for type left denotation handlers
    type_led_lookup: TypeLEDLookup,
    /// Lookup table for type binding powers
    type_binding_power_lookup: TypeBPLookup,
}

impl Parser {
    /// Creates a new Parser instance over `tokens`, seeding its diagnostic
    /// list with the lexer's errors.
    pub fn new(tokens: Vec<Token>, errors: Vec<ParseError>) -> Self {
        Parser {
            tokens,
            pos: 0,
            errors,
            stmt_lookup: StmtLookup::new(),
            nud_lookup: NUDLookup::new(),
            led_lookup: LEDLookup::new(),
            binding_power_lookup: BPLookup::new(),
            type_nud_lookup: TypeNUDLookup::new(),
            type_led_lookup: TypeLEDLookup::new(),
            type_binding_power_lookup: TypeBPLookup::new(),
        }
    }

    /// Returns the current token without advancing. Past the end of the
    /// stream this keeps returning the trailing EOF token.
    pub fn current_token(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().unwrap())
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Consumes and returns the current token. Never advances past EOF.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consumes a token of the expected kind, or records an
    /// "Expected X, got Y" diagnostic and returns `None` without advancing.
    pub fn expect(&mut self, expected: TokenKind) -> Option<Token> {
        let token = self.current_token();
        if token.kind == expected {
            Some(self.advance())
        } else {
            let kind = ParseErrorKind::ExpectedToken {
                expected: expected.human_readable().to_string(),
                got: token.kind.human_readable().to_string(),
            };
            self.error_at_current(kind);
            None
        }
    }

    /// Records a diagnostic anchored at `token`.
    pub fn error_at(&mut self, token: &Token, kind: ParseErrorKind) {
        self.errors.push(ParseError::from_token(kind, token));
    }

    /// Records a diagnostic anchored at the current token.
    pub fn error_at_current(&mut self, kind: ParseErrorKind) {
        let token = self.current_token().clone();
        self.error_at(&token, kind);
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn stmt_handler(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn nud_handler(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn led_handler(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    /// The binding power of an infix operator token; tokens that are no
    /// operator bind at `Default`, which ends the precedence-climbing loop.
    pub fn binding_power(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    pub fn type_nud_handler(&self, kind: TokenKind) -> Option<TypeNUDHandler> {
        self.type_nud_lookup.get(&kind).copied()
    }

    pub fn type_led_handler(&self, kind: TokenKind) -> Option<TypeLEDHandler> {
        self.type_led_lookup.get(&kind).copied()
    }

    pub fn type_binding_power(&self, kind: TokenKind) -> TypeBindingPower {
        self.type_binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(TypeBindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type left denotation handler.
    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: TypeBindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }
}

/// Parses a token stream into a checked program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses statements until EOF, binding
/// top-level names directly into the caller's `context` frame. The returned
/// diagnostics are ordered and deduplicated; a non-empty list means the
/// program must not be evaluated.
pub fn parse(
    tokens: Vec<Token>,
    errors: Vec<ParseError>,
    context: &Context,
) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(tokens, errors);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut statements = vec![];

    while parser.has_tokens() {
        let kind = parser.current_token_kind();
        if kind == TokenKind::Semicolon || kind == TokenKind::Illegal {
            parser.advance();
            continue;
        }

        let before = parser.position();
        match parse_stmt(&mut parser, context) {
            Some(statement) => statements.push(statement),
            None => {
                // Recovery: guarantee forward progress past the bad token
                if parser.position() == before {
                    parser.advance();
                }
            }
        }
    }

    let program = Program {
        statements,
        context: context.clone(),
    };

    for statement in &program.statements {
        does_return(&mut parser, statement, None, &program.context);
    }

    (program, dedup_errors(parser.errors))
}

/// Return-reachability analysis: whether every control path through
/// `statement` definitely returns.
///
/// The walk is read-only over the checked AST and the declared types; it
/// also surfaces "Unreachable code", "Illegal return statement" and
/// return-type mismatch diagnostics. A `return` satisfies reachability
/// unconditionally, a block iff its last live statement does, an `if` iff
/// both branches do.
pub fn does_return(
    parser: &mut Parser,
    statement: &Statement,
    return_type: Option<&Type>,
    context: &Context,
) -> bool {
    match statement {
        Statement::Return(return_statement) => match return_type {
            Some(declared) => {
                if !declared.is_never() {
                    let actual = return_statement.value.ty();
                    if !actual.is_never() && !is_assignable(&actual, declared, context) {
                        let token = return_statement.return_token.clone();
                        parser.error_at(
                            &token,
                            ParseErrorKind::NotAssignable {
                                from: actual.to_string(),
                                to: declared.to_string(),
                            },
                        );
                    }
                }
                true
            }
            None => {
                let token = return_statement.return_token.clone();
                parser.error_at(&token, ParseErrorKind::IllegalReturn);
                false
            }
        },
        Statement::Block(block) => does_return_block(parser, block, return_type, context),
        Statement::If(if_statement) => {
            let consequence = does_return(parser, &if_statement.consequence, return_type, context);
            match &if_statement.alternative {
                Some(alternative) => {
                    let alternative = does_return(parser, alternative, return_type, context);
                    consequence && alternative
                }
                // A missing else never satisfies reachability
                None => false,
            }
        }
        _ => false,
    }
}

/// Block form of [`does_return`]; statements after a definite return are
/// flagged as unreachable.
pub fn does_return_block(
    parser: &mut Parser,
    block: &BlockStatement,
    return_type: Option<&Type>,
    context: &Context,
) -> bool {
    let mut returned = false;
    for statement in &block.statements {
        if returned {
            if let Some(token) = statement.token() {
                let token = token.clone();
                parser.error_at(&token, ParseErrorKind::UnreachableCode);
            }
            return true;
        }
        returned = does_return(parser, statement, return_type, context);
    }
    returned
}
