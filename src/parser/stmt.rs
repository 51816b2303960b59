use std::rc::Rc;

use crate::{
    ast::{
        expressions::{Expression, Identifier, NullLiteral, VoidLiteral},
        statements::{
            BlockStatement, ExpressionStatement, FunctionDefinitionStatement, IfStatement,
            LetStatement, Parameter, ReturnStatement, Statement, TypeDefinitionStatement,
            WhileStatement,
        },
    },
    errors::errors::ParseErrorKind,
    lexer::tokens::TokenKind,
    types::{
        context::Context,
        types::{is_assignable, Type},
    },
};

use super::{
    expr::parse_expr,
    lookups::BindingPower,
    parser::{does_return_block, Parser},
    types::{parse_type, TypeBindingPower},
};

pub fn parse_stmt(parser: &mut Parser, context: &Context) -> Option<Statement> {
    if let Some(handler) = parser.stmt_handler(parser.current_token_kind()) {
        return handler(parser, context);
    }

    let first_token = parser.current_token().clone();
    let expression = parse_expr(parser, context, BindingPower::Default);

    if !expression.is_invalid() {
        parser.expect(TokenKind::Semicolon);
    }

    Some(Statement::Expression(ExpressionStatement {
        first_token,
        expression,
    }))
}

pub fn parse_let_stmt(parser: &mut Parser, context: &Context) -> Option<Statement> {
    let let_token = parser.advance();
    let ident_token = parser.expect(TokenKind::Identifier)?;

    // `let x := value;` infers, `let x: T = value;` checks against T
    let mut explicit_type = None;
    let mut assignment_kind = TokenKind::Define;
    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        explicit_type = Some(parse_type(parser, context, TypeBindingPower::Default));
        assignment_kind = TokenKind::Assignment;
    }

    let value;
    if parser.current_token_kind() != TokenKind::Semicolon {
        parser.expect(assignment_kind)?;
        value = parse_expr(parser, context, BindingPower::Default);
    } else {
        value = Expression::NullLiteral(NullLiteral { token: None });
    }

    parser.expect(TokenKind::Semicolon)?;

    let inferred_type = value.ty();
    let declared_type = match explicit_type {
        None => inferred_type,
        Some(declared) => {
            if !declared.is_never()
                && !inferred_type.is_never()
                && !is_assignable(&inferred_type, &declared, context)
            {
                let kind = ParseErrorKind::NotAssignable {
                    from: inferred_type.to_string(),
                    to: declared.to_string(),
                };
                match value.token() {
                    Some(token) => {
                        let token = token.clone();
                        parser.error_at(&token, kind);
                    }
                    None => parser.error_at_current(kind),
                }
            }
            declared
        }
    };

    // The declared type wins even when the initializer mismatched, so later
    // uses of the name do not re-report
    if !context.define(&ident_token.literal, declared_type.clone(), None) {
        parser.error_at(
            &ident_token,
            ParseErrorKind::Redefinition {
                name: ident_token.literal.clone(),
            },
        );
    }

    Some(Statement::Let(LetStatement {
        let_token,
        name: Identifier {
            value: ident_token.literal.clone(),
            token: ident_token,
            resolved_type: declared_type.clone(),
        },
        declared_type,
        value,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser, context: &Context) -> Option<Statement> {
    let return_token = parser.advance();

    let value;
    if parser.current_token_kind() == TokenKind::Semicolon {
        value = Expression::VoidLiteral(VoidLiteral { token: None });
    } else {
        value = parse_expr(parser, context, BindingPower::Default);
        parser.expect(TokenKind::Semicolon)?;
    }

    Some(Statement::Return(ReturnStatement { return_token, value }))
}

/// Parses `{ ... }` into one child context frame shared by all statements in
/// the block, so siblings see each other's bindings but the enclosing scope
/// does not see in. Always yields a block; a missing closing brace is
/// reported as "Unclosed block".
pub fn parse_block(parser: &mut Parser, context: &Context) -> BlockStatement {
    let lbrace_token = parser.advance();
    let block_context = Context::extend(context);
    let mut statements = vec![];

    while parser.current_token_kind() != TokenKind::EOF
        && parser.current_token_kind() != TokenKind::CloseCurly
    {
        let kind = parser.current_token_kind();
        if kind == TokenKind::Semicolon || kind == TokenKind::Illegal {
            parser.advance();
            continue;
        }

        let before = parser.position();
        match parse_stmt(parser, &block_context) {
            Some(statement) => statements.push(statement),
            None => {
                if parser.position() == before {
                    parser.advance();
                }
            }
        }
    }

    let rbrace_token;
    if parser.current_token_kind() == TokenKind::CloseCurly {
        rbrace_token = Some(parser.advance());
    } else {
        parser.error_at(&lbrace_token, ParseErrorKind::UnclosedBlock);
        rbrace_token = None;
    }

    BlockStatement {
        lbrace_token,
        rbrace_token,
        statements,
    }
}

pub fn parse_block_stmt(parser: &mut Parser, context: &Context) -> Option<Statement> {
    Some(Statement::Block(parse_block(parser, context)))
}

pub fn parse_if_stmt(parser: &mut Parser, context: &Context) -> Option<Statement> {
    let if_token = parser.advance();

    let condition = parse_expr(parser, context, BindingPower::Default);
    let consequence = parse_stmt(parser, &Context::extend(context))?;

    let mut alternative = None;
    if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        alternative = Some(Box::new(parse_stmt(parser, &Context::extend(context))?));
    }

    Some(Statement::If(IfStatement {
        if_token,
        condition,
        consequence: Box::new(consequence),
        alternative,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser, context: &Context) -> Option<Statement> {
    let while_token = parser.advance();

    let condition = parse_expr(parser, context, BindingPower::Default);
    let body = parse_stmt(parser, &Context::extend(context))?;

    Some(Statement::While(WhileStatement {
        while_token,
        condition,
        body: Box::new(body),
    }))
}

pub fn parse_fn_definition_stmt(parser: &mut Parser, context: &Context) -> Option<Statement> {
    let fn_token = parser.advance();

    // Type-member form: fn (T) :: name(...)
    let mut this_type = None;
    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();
        this_type = Some(parse_type(parser, context, TypeBindingPower::Default));
        parser.expect(TokenKind::CloseParen)?;
        parser.expect(TokenKind::DoubleColon)?;
    }

    let ident_token = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;
    let parameters = parse_parameter_list(parser, context)?;

    let return_type;
    if parser.current_token_kind() == TokenKind::OpenCurly {
        return_type = Type::Void;
    } else {
        return_type = parse_type(parser, context, TypeBindingPower::Default);
    }

    if parser.current_token_kind() != TokenKind::OpenCurly {
        parser.expect(TokenKind::OpenCurly);
        return None;
    }

    let parameter_types: Vec<Type> = parameters.iter().map(|parameter| parameter.ty.clone()).collect();
    let fn_type = Type::Function {
        parameter_types,
        return_type: Box::new(return_type.clone()),
    };

    let function_context = Context::extend_with_return(context, return_type.clone());
    if let Some(this_type) = &this_type {
        function_context.define("this", this_type.clone(), None);
    }
    for parameter in &parameters {
        if !function_context.define(&parameter.name, parameter.ty.clone(), None) {
            let token = parameter.token.clone();
            parser.error_at(
                &token,
                ParseErrorKind::Redefinition {
                    name: parameter.name.clone(),
                },
            );
        }
    }

    // The function's own type is registered before its body parses, so the
    // body can recurse and type members can dispatch on the owner type
    if !context.define(&ident_token.literal, fn_type.clone(), this_type.as_ref()) {
        parser.error_at(
            &ident_token,
            ParseErrorKind::Redefinition {
                name: ident_token.literal.clone(),
            },
        );
    }

    let body = parse_block(parser, &function_context);

    if return_type != Type::Void
        && !does_return_block(parser, &body, Some(&return_type), &function_context)
    {
        let token = body
            .rbrace_token
            .clone()
            .unwrap_or_else(|| body.lbrace_token.clone());
        parser.error_at(&token, ParseErrorKind::MissingReturn);
    }

    Some(Statement::FunctionDefinition(Rc::new(
        FunctionDefinitionStatement {
            fn_token,
            name: Identifier {
                value: ident_token.literal.clone(),
                token: ident_token,
                resolved_type: fn_type.clone(),
            },
            parameters,
            this_type,
            return_type,
            fn_type,
            body,
            context: function_context.deep_clone(),
        },
    )))
}

fn parse_parameter_list(parser: &mut Parser, context: &Context) -> Option<Vec<Parameter>> {
    let mut parameters = vec![];

    if parser.current_token_kind() == TokenKind::CloseParen {
        parser.advance();
        return Some(parameters);
    }

    loop {
        let ident_token = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser, context, TypeBindingPower::Default);
        parameters.push(Parameter {
            name: ident_token.literal.clone(),
            token: ident_token,
            ty,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Some(parameters)
}

pub fn parse_type_definition_stmt(parser: &mut Parser, context: &Context) -> Option<Statement> {
    let type_token = parser.advance();

    let ident_token = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Define)?;
    let defined_type = parse_type(parser, context, TypeBindingPower::Default);
    parser.expect(TokenKind::Semicolon)?;

    if !context.define_type(&ident_token.literal, defined_type.clone()) {
        parser.error_at(
            &ident_token,
            ParseErrorKind::Redefinition {
                name: ident_token.literal.clone(),
            },
        );
    }

    Some(Statement::TypeDefinition(TypeDefinitionStatement {
        type_token,
        name: Identifier {
            value: ident_token.literal.clone(),
            token: ident_token,
            resolved_type: defined_type.clone(),
        },
        defined_type,
    }))
}
