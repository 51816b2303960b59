//! Type parsing implementation.
//!
//! This module handles parsing of type annotations and type expressions.
//! It supports:
//!
//! - Primitive type names, `null` and `void`
//! - Named (user-declared) types, resolved through the context
//! - Function types (`fn(int, string) bool`)
//! - Interface literals (`iface { length: int; }`)
//! - The optional suffix `?`, which normalizes degenerate cases
//!
//! Similar to expression parsing, it uses NUD/LED handlers with binding
//! powers; the optional suffix is the only infix production.

use std::collections::{BTreeMap, HashMap};

use crate::{
    errors::errors::ParseErrorKind,
    lexer::tokens::TokenKind,
    types::{context::Context, types::Type},
};

use super::parser::Parser;

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum TypeBindingPower {
    Default,
    Optional,
}

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser, &Context) -> Type;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, &Context, Type) -> Type;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, TypeBindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_type_literal);
    parser.type_nud(TokenKind::Null, parse_type_literal);
    parser.type_nud(TokenKind::Void, parse_type_literal);
    parser.type_nud(TokenKind::Fn, parse_function_type);
    parser.type_nud(TokenKind::Iface, parse_iface_type);

    parser.type_led(TokenKind::Question, TypeBindingPower::Optional, parse_optional_type);
}

pub fn parse_type(parser: &mut Parser, context: &Context, bp: TypeBindingPower) -> Type {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud_fn = match parser.type_nud_handler(token_kind) {
        Some(nud_fn) => nud_fn,
        None => {
            if token_kind != TokenKind::Illegal {
                parser.error_at_current(ParseErrorKind::UnexpectedToken {
                    token: token_kind.human_readable().to_string(),
                });
            }
            return Type::never();
        }
    };

    let mut left = nud_fn(parser, context);

    // While LED and current BP is greater than the caller's BP, keep
    // extending the left-hand side
    loop {
        let token_kind = parser.current_token_kind();
        if parser.type_binding_power(token_kind) <= bp {
            break;
        }
        let led_fn = match parser.type_led_handler(token_kind) {
            Some(led_fn) => led_fn,
            None => break,
        };
        left = led_fn(parser, context, left);
    }

    left
}

/** prefix types **/

pub fn parse_type_literal(parser: &mut Parser, context: &Context) -> Type {
    let token = parser.advance();

    match token.kind {
        TokenKind::Identifier => match token.literal.as_str() {
            "string" => Type::String,
            "bool" => Type::Bool,
            "int" => Type::Int,
            "float" => Type::Float,
            name => match context.get_type(name) {
                Some(resolved) => resolved,
                None => {
                    parser.error_at(
                        &token,
                        ParseErrorKind::UnknownType { name: name.to_string() },
                    );
                    Type::never()
                }
            },
        },
        TokenKind::Null => Type::Null,
        TokenKind::Void => Type::Void,
        _ => Type::never(),
    }
}

pub fn parse_function_type(parser: &mut Parser, context: &Context) -> Type {
    parser.advance();
    if parser.expect(TokenKind::OpenParen).is_none() {
        return Type::never();
    }

    let mut parameter_types = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            parameter_types.push(parse_type(parser, context, TypeBindingPower::Default));
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }
    if parser.expect(TokenKind::CloseParen).is_none() {
        return Type::never();
    }

    let return_type = parse_type(parser, context, TypeBindingPower::Default);
    Type::Function {
        parameter_types,
        return_type: Box::new(return_type),
    }
}

pub fn parse_iface_type(parser: &mut Parser, context: &Context) -> Type {
    parser.advance();
    if parser.expect(TokenKind::OpenCurly).is_none() {
        return Type::never();
    }

    let mut members = BTreeMap::new();
    while parser.current_token_kind() != TokenKind::CloseCurly
        && parser.current_token_kind() != TokenKind::EOF
    {
        let name_token = match parser.expect(TokenKind::Identifier) {
            Some(token) => token,
            None => return Type::never(),
        };
        if parser.expect(TokenKind::Colon).is_none() {
            return Type::never();
        }

        // A bare member type declares a nullary method of that return type;
        // type members are always functions
        let member_type = match parse_type(parser, context, TypeBindingPower::Default) {
            function_type @ Type::Function { .. } => function_type,
            other => Type::Function {
                parameter_types: vec![],
                return_type: Box::new(other),
            },
        };
        members.insert(name_token.literal, member_type);

        if parser.expect(TokenKind::Semicolon).is_none() {
            return Type::never();
        }
    }

    if parser.expect(TokenKind::CloseCurly).is_none() {
        return Type::never();
    }
    Type::Iface(members)
}

/** infix types **/

pub fn parse_optional_type(parser: &mut Parser, _context: &Context, left: Type) -> Type {
    parser.advance();
    Type::optional_of(left)
}
