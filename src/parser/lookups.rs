use std::collections::HashMap;

use crate::{
    ast::{expressions::Expression, statements::Statement},
    lexer::tokens::TokenKind,
    types::context::Context,
};

use super::{expr::*, parser::Parser, stmt::*};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
}

pub type StmtHandler = fn(&mut Parser, &Context) -> Option<Statement>;
pub type NUDHandler = fn(&mut Parser, &Context) -> Expression;
pub type LEDHandler = fn(&mut Parser, &Context, Expression) -> Expression;

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Assignment, BindingPower::Assignment, parse_assignment_expr);

    // Logical
    parser.led(TokenKind::Or, BindingPower::LogicalOr, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::LogicalAnd, parse_binary_expr);

    // Equality and relational
    parser.led(TokenKind::Equals, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);

    // Postfix: calls, increment forms, member access
    parser.led(TokenKind::OpenParen, BindingPower::Postfix, parse_call_expr);
    parser.led(TokenKind::PlusPlus, BindingPower::Postfix, parse_increment_infix_expr);
    parser.led(TokenKind::MinusMinus, BindingPower::Postfix, parse_increment_infix_expr);
    parser.led(TokenKind::Dot, BindingPower::Postfix, parse_member_expr);

    // Literals and symbols
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::IntLiteral, parse_integer_literal);
    parser.nud(TokenKind::FloatLiteral, parse_float_literal);
    parser.nud(TokenKind::StringLiteral, parse_string_literal);
    parser.nud(TokenKind::True, parse_boolean_literal);
    parser.nud(TokenKind::False, parse_boolean_literal);
    parser.nud(TokenKind::Null, parse_null_literal);
    parser.nud(TokenKind::Void, parse_void_literal);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::PlusPlus, parse_increment_prefix_expr);
    parser.nud(TokenKind::MinusMinus, parse_increment_prefix_expr);

    // Statements
    parser.stmt(TokenKind::Let, parse_let_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Fn, parse_fn_definition_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::TypeDef, parse_type_definition_stmt);
}
