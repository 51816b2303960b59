//! Inline type inference for expression nodes.
//!
//! Each function computes the resolved type of one expression form from its
//! children's resolved types and the live context, at the moment the parser
//! builds the node. Failed inference yields `never` carrying the diagnostic
//! message; a `never` with an empty message marks an error that was already
//! reported further down the tree.

use crate::{
    ast::expressions::{Expression, Identifier},
    lexer::tokens::TokenKind,
    types::{
        context::Context,
        types::{is_assignable, Type},
    },
};

pub fn identifier_type(name: &str, context: &Context) -> Type {
    match context.get(name, None) {
        Some(resolved) => resolved,
        None => match context.parent_type() {
            Some(parent_type) => {
                Type::Never(format!("'{}' is not a member of '{}'", name, parent_type))
            }
            None => Type::Never(format!("Cannot resolve reference to '{}'", name)),
        },
    }
}

pub fn prefix_type(operator: TokenKind, operand_type: &Type) -> Type {
    if operand_type.is_never() {
        return operand_type.clone();
    }

    match operator {
        TokenKind::Not => Type::Bool,
        TokenKind::Dash if *operand_type == Type::Int => Type::Int,
        _ => Type::Never(format!("Type mismatch: {}{}", operator.symbol(), operand_type)),
    }
}

pub fn infix_type(operator: TokenKind, left_type: &Type, right_type: &Type) -> Type {
    if left_type.is_never() {
        return left_type.clone();
    }
    if right_type.is_never() {
        return right_type.clone();
    }

    match operator {
        TokenKind::Equals | TokenKind::NotEquals | TokenKind::Or | TokenKind::And => {
            return Type::Bool;
        }
        TokenKind::Less | TokenKind::Greater | TokenKind::LessEquals | TokenKind::GreaterEquals => {
            if *left_type == Type::Int && *right_type == Type::Int {
                return Type::Bool;
            }
        }
        TokenKind::Plus => {
            if *left_type == Type::String || *right_type == Type::String {
                return Type::String;
            } else if *left_type == Type::Int && *right_type == Type::Int {
                return Type::Int;
            }
        }
        TokenKind::Dash | TokenKind::Slash | TokenKind::Star => {
            if *left_type == Type::Int && *right_type == Type::Int {
                return Type::Int;
            }
        }
        _ => {}
    }

    Type::Never(format!(
        "Type mismatch: {} {} {}",
        left_type,
        operator.symbol(),
        right_type
    ))
}

pub fn assignment_type(name: &Identifier, value_type: &Type, context: &Context) -> Type {
    let target_type = &name.resolved_type;
    if target_type.is_never() {
        return target_type.clone();
    }
    if value_type.is_never() {
        return value_type.clone();
    }

    if !is_assignable(value_type, target_type, context) {
        return Type::Never(format!(
            "Type '{}' is not assignable to '{}'",
            value_type, target_type
        ));
    }
    value_type.clone()
}

pub fn call_type(callee_type: &Type, arguments: &[Expression], context: &Context) -> Type {
    match callee_type {
        Type::Never(_) => callee_type.clone(),
        Type::Function { parameter_types, return_type } => {
            if parameter_types.len() != arguments.len() {
                return Type::Never(format!(
                    "Mismatching amount of arguments ({} vs {})",
                    arguments.len(),
                    parameter_types.len()
                ));
            }
            for (parameter_type, argument) in parameter_types.iter().zip(arguments) {
                if parameter_type.is_never() {
                    // The invalid parameter type was already reported at its
                    // declaration
                    return Type::never();
                }
                let argument_type = argument.ty();
                if argument_type.is_never() {
                    return argument_type;
                }
                if !is_assignable(&argument_type, parameter_type, context) {
                    return Type::Never(format!(
                        "Type '{}' is not assignable to '{}'",
                        argument_type, parameter_type
                    ));
                }
            }
            *return_type.clone()
        }
        other => Type::Never(format!("Cannot call {}", other)),
    }
}

pub fn increment_type(operator: TokenKind, operand_type: &Type) -> Type {
    match operand_type {
        Type::Never(_) | Type::Int => operand_type.clone(),
        other => Type::Never(format!("Unknown operator: {}{}", operator.symbol(), other)),
    }
}

pub fn member_type(name: &str, parent_type: &Type, context: &Context) -> Type {
    if parent_type.is_never() {
        return parent_type.clone();
    }
    match context.get(name, Some(parent_type)) {
        Some(resolved) => resolved,
        // The unresolved member was already reported while resolving the
        // identifier inside the member sub-context
        None => Type::never(),
    }
}
