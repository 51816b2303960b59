use crate::{
    ast::expressions::{
        AssignmentExpression, BooleanLiteral, CallExpression, Expression, FloatLiteral, Identifier,
        IncrementExpression, InfixExpression, IntegerLiteral, InvalidExpression,
        MemberAccessExpression, NullLiteral, PrefixExpression, StringLiteral, VoidLiteral,
    },
    errors::errors::ParseErrorKind,
    lexer::tokens::{Token, TokenKind},
    types::{context::Context, types::Type},
};

use super::{lookups::BindingPower, parser::Parser, typecheck};

/// Parses one expression with precedence climbing.
///
/// After the subtree is built, a resolved type of `never` with a non-empty
/// message is emitted once as a diagnostic at the expression's first token.
/// This is the single point where most semantic errors surface; propagated
/// `never`s with an empty message stay silent to avoid cascades.
pub fn parse_expr(parser: &mut Parser, context: &Context, bp: BindingPower) -> Expression {
    let start_token = parser.current_token().clone();

    // First parse NUD
    let nud_fn = match parser.nud_handler(start_token.kind) {
        Some(nud_fn) => nud_fn,
        None => {
            parser.error_at(
                &start_token,
                ParseErrorKind::UnexpectedToken {
                    token: start_token.kind.human_readable().to_string(),
                },
            );
            parser.advance();
            return Expression::Invalid(InvalidExpression { token: Some(start_token) });
        }
    };

    let mut left = nud_fn(parser, context);

    // While LED and current BP is greater than the caller's BP, keep
    // extending the left-hand side
    loop {
        let kind = parser.current_token_kind();
        if parser.binding_power(kind) <= bp {
            break;
        }
        let led_fn = match parser.led_handler(kind) {
            Some(led_fn) => led_fn,
            None => break,
        };
        left = led_fn(parser, context, left);
    }

    if let Type::Never(message) = left.ty() {
        if !message.is_empty() {
            parser.error_at(&start_token, ParseErrorKind::InvalidExpression { message });
        }
    }

    left
}

/** prefix expressions **/

pub fn parse_identifier_expr(parser: &mut Parser, context: &Context) -> Expression {
    let token = parser.advance();
    let resolved_type = typecheck::identifier_type(&token.literal, context);
    Expression::Identifier(Identifier {
        value: token.literal.clone(),
        token,
        resolved_type,
    })
}

pub fn parse_integer_literal(parser: &mut Parser, _context: &Context) -> Expression {
    let token = parser.advance();
    match token.literal.parse::<i64>() {
        Ok(value) => Expression::IntegerLiteral(IntegerLiteral { token, value }),
        Err(_) => {
            parser.error_at(&token, ParseErrorKind::IntegerOutOfBounds);
            Expression::Invalid(InvalidExpression { token: Some(token) })
        }
    }
}

pub fn parse_float_literal(parser: &mut Parser, _context: &Context) -> Expression {
    let token = parser.advance();
    match token.literal.parse::<f64>() {
        Ok(value) => Expression::FloatLiteral(FloatLiteral { token, value }),
        Err(_) => {
            parser.error_at(&token, ParseErrorKind::FloatOutOfBounds);
            Expression::Invalid(InvalidExpression { token: Some(token) })
        }
    }
}

pub fn parse_string_literal(parser: &mut Parser, _context: &Context) -> Expression {
    let token = parser.advance();
    Expression::StringLiteral(StringLiteral {
        value: token.literal.clone(),
        token,
    })
}

pub fn parse_boolean_literal(parser: &mut Parser, _context: &Context) -> Expression {
    let token = parser.advance();
    Expression::BooleanLiteral(BooleanLiteral {
        value: token.kind == TokenKind::True,
        token,
    })
}

pub fn parse_null_literal(parser: &mut Parser, _context: &Context) -> Expression {
    let token = parser.advance();
    Expression::NullLiteral(NullLiteral { token: Some(token) })
}

pub fn parse_void_literal(parser: &mut Parser, _context: &Context) -> Expression {
    let token = parser.advance();
    Expression::VoidLiteral(VoidLiteral { token: Some(token) })
}

pub fn parse_prefix_expr(parser: &mut Parser, context: &Context) -> Expression {
    let prefix_token = parser.advance();
    let operand = parse_expr(parser, context, BindingPower::Unary);
    let resolved_type = typecheck::prefix_type(prefix_token.kind, &operand.ty());

    Expression::Prefix(PrefixExpression {
        operator: prefix_token.kind,
        prefix_token,
        operand: Box::new(operand),
        resolved_type,
    })
}

pub fn parse_grouping_expr(parser: &mut Parser, context: &Context) -> Expression {
    parser.advance();
    let expression = parse_expr(parser, context, BindingPower::Default);
    if parser.expect(TokenKind::CloseParen).is_none() {
        let token = parser.current_token().clone();
        return Expression::Invalid(InvalidExpression { token: Some(token) });
    }
    expression
}

pub fn parse_increment_prefix_expr(parser: &mut Parser, context: &Context) -> Expression {
    let operator_token = parser.advance();
    let operand = parse_expr(parser, context, BindingPower::Unary);
    build_increment_expr(parser, operator_token, operand, true)
}

/** infix expressions **/

pub fn parse_binary_expr(parser: &mut Parser, context: &Context, left: Expression) -> Expression {
    let operator_token = parser.advance();
    let binding_power = parser.binding_power(operator_token.kind);

    let right = parse_expr(parser, context, binding_power);
    let resolved_type = typecheck::infix_type(operator_token.kind, &left.ty(), &right.ty());

    Expression::Infix(InfixExpression {
        operator: operator_token.kind,
        operator_token,
        left: Box::new(left),
        right: Box::new(right),
        resolved_type,
    })
}

pub fn parse_assignment_expr(parser: &mut Parser, context: &Context, left: Expression) -> Expression {
    let assign_token = parser.advance();
    let right = parse_expr(parser, context, BindingPower::Assignment);

    let name = match left {
        Expression::Identifier(identifier) => identifier,
        other => {
            let token = other.token().unwrap_or(&assign_token).clone();
            parser.error_at(&token, ParseErrorKind::InvalidIdentifier);
            return Expression::Invalid(InvalidExpression { token: Some(assign_token) });
        }
    };

    let resolved_type = typecheck::assignment_type(&name, &right.ty(), context);

    Expression::Assignment(AssignmentExpression {
        assign_token,
        name,
        value: Box::new(right),
        resolved_type,
    })
}

pub fn parse_call_expr(parser: &mut Parser, context: &Context, left: Expression) -> Expression {
    let paren_token = parser.advance();

    let arguments = match parse_argument_list(parser, context) {
        Some(arguments) => arguments,
        None => return Expression::Invalid(InvalidExpression { token: Some(paren_token) }),
    };

    for argument in &arguments {
        if argument.is_invalid() {
            return argument.clone();
        }
    }

    let resolved_type = typecheck::call_type(&left.ty(), &arguments, context);

    Expression::Call(CallExpression {
        paren_token,
        callee: Box::new(left),
        arguments,
        resolved_type,
    })
}

pub fn parse_increment_infix_expr(parser: &mut Parser, _context: &Context, left: Expression) -> Expression {
    let operator_token = parser.advance();
    build_increment_expr(parser, operator_token, left, false)
}

pub fn parse_member_expr(parser: &mut Parser, context: &Context, left: Expression) -> Expression {
    let dot_token = parser.advance();
    let parent_type = left.ty();

    // The right-hand identifier resolves in a detached scope holding only
    // the members of the left-hand expression's type
    let sub_context = context.sub_context(&parent_type);
    let right = parse_expr(parser, &sub_context, BindingPower::Postfix);

    let member = match right {
        Expression::Identifier(identifier) => identifier,
        other => {
            let token = other.token().unwrap_or(&dot_token).clone();
            parser.error_at(&token, ParseErrorKind::InvalidIdentifier);
            return Expression::Invalid(InvalidExpression { token: Some(dot_token) });
        }
    };

    let resolved_type = typecheck::member_type(&member.value, &parent_type, context);

    Expression::MemberAccess(MemberAccessExpression {
        dot_token,
        object: Box::new(left),
        member,
        parent_type,
        resolved_type,
    })
}

/** misc **/

fn build_increment_expr(
    parser: &mut Parser,
    operator_token: Token,
    operand: Expression,
    pre: bool,
) -> Expression {
    let name = match operand {
        Expression::Identifier(identifier) => identifier,
        other => {
            let token = other.token().unwrap_or(&operator_token).clone();
            parser.error_at(&token, ParseErrorKind::InvalidIdentifier);
            return Expression::Invalid(InvalidExpression { token: Some(operator_token) });
        }
    };

    let resolved_type = typecheck::increment_type(operator_token.kind, &name.resolved_type);

    Expression::Increment(IncrementExpression {
        operator: operator_token.kind,
        operator_token,
        name,
        pre,
        resolved_type,
    })
}

fn parse_argument_list(parser: &mut Parser, context: &Context) -> Option<Vec<Expression>> {
    let mut arguments = vec![];

    if parser.current_token_kind() == TokenKind::CloseParen {
        parser.advance();
        return Some(arguments);
    }

    loop {
        arguments.push(parse_expr(parser, context, BindingPower::Default));
        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Some(arguments)
}
